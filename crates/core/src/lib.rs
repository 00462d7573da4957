//! Core of the webcam face client: frame capture, cascade face detection,
//! a content-addressed response cache, and the enroll/recognize flows that
//! talk to a remote recognition service.

pub mod capture;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod recognition;
pub mod shared;

pub use error::{CaptureError, NetworkError};
