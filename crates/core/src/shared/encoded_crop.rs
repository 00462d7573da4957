use std::fmt;

use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};

use crate::error::CaptureError;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Hex SHA-256 digest of an encoded crop. Used as the response cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A face region of a frame, JPEG-encoded for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedCrop(Vec<u8>);

impl EncodedCrop {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Crops `face` out of an RGB frame and encodes it as JPEG.
    pub fn encode(frame: &Frame, face: &FaceBox) -> Result<Self, CaptureError> {
        if frame.channels() != 3 {
            return Err(CaptureError::Encode(format!(
                "expected an RGB frame, got {} channels",
                frame.channels()
            )));
        }
        let crop = frame.crop(face).ok_or_else(|| {
            CaptureError::Encode(format!("face box {face:?} lies outside the frame"))
        })?;
        let image = image::RgbImage::from_raw(crop.width(), crop.height(), crop.data().to_vec())
            .ok_or_else(|| CaptureError::Encode("crop buffer does not match its size".into()))?;

        let mut bytes = Vec::new();
        image
            .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(&self.0)
    }
}
