use crate::error::NetworkError;
use crate::shared::encoded_crop::EncodedCrop;
use crate::shared::identity::IdentityLabel;

/// Asks the remote service who a single face crop belongs to.
///
/// `Ok(IdentityLabel::Unknown)` is a real answer from the service;
/// `Err` means no answer was obtained.
pub trait RecognitionClient: Send {
    fn recognize(&self, crop: &EncodedCrop) -> Result<IdentityLabel, NetworkError>;
}
