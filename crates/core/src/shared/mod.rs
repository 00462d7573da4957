pub mod constants;
pub mod encoded_crop;
pub mod face_box;
pub mod frame;
pub mod identity;
