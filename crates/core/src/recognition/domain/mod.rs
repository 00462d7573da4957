pub mod enrollment_client;
pub mod recognition_client;
pub mod response_cache;
