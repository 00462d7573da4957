use crate::error::NetworkError;
use crate::shared::encoded_crop::EncodedCrop;

/// Registers a new identity with the remote service.
///
/// The returned JSON body is only logged; its shape is up to the service.
pub trait EnrollmentClient: Send {
    fn enroll(&self, name: &str, crops: &[EncodedCrop])
        -> Result<serde_json::Value, NetworkError>;
}
