pub mod action_button;
pub mod frame_view;
