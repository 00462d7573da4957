use std::path::Path;

use log::info;
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::error::CaptureError;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Haar cascade face detector run on the grayscale frame.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    params: DetectionParams,
}

// Safety: the classifier is used from one thread at a time; it moves to
// the capture worker once at startup.
unsafe impl Send for CascadeFaceDetector {}

impl CascadeFaceDetector {
    /// Loads the cascade definition. Fails with `ModelLoad` if the file is
    /// missing or not a valid cascade.
    pub fn new(model_path: &Path, params: DetectionParams) -> Result<Self, CaptureError> {
        info!("Loading face cascade from {}", model_path.display());
        let path_str = model_path.to_str().ok_or_else(|| {
            CaptureError::ModelLoad(format!("non UTF-8 path {}", model_path.display()))
        })?;
        let classifier = CascadeClassifier::new(path_str)
            .map_err(|e| CaptureError::ModelLoad(format!("{}: {e}", model_path.display())))?;
        let empty = classifier
            .empty()
            .map_err(|e| CaptureError::ModelLoad(format!("{}: {e}", model_path.display())))?;
        if empty {
            return Err(CaptureError::ModelLoad(format!(
                "no cascade could be read from {}",
                model_path.display()
            )));
        }
        Ok(Self { classifier, params })
    }

    fn detect_rects(&mut self, frame: &Frame) -> Result<Vector<Rect>, opencv::Error> {
        let flat = Mat::from_slice(frame.data())?;
        let rgb = flat.reshape(frame.channels() as i32, frame.height() as i32)?;
        let mut gray = Mat::default();
        imgproc::cvt_color_def(&rgb, &mut gray, imgproc::COLOR_RGB2GRAY)?;

        let p = self.params;
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            p.scale_step,
            p.min_neighbors,
            0,
            Size::new(p.min_size.0, p.min_size.1),
            Size::new(p.max_size.0, p.max_size.1),
        )?;
        Ok(faces)
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, CaptureError> {
        if frame.channels() != 3 {
            return Err(CaptureError::Detection(format!(
                "expected an RGB frame, got {} channels",
                frame.channels()
            )));
        }
        let rects = self
            .detect_rects(frame)
            .map_err(|e| CaptureError::Detection(e.to_string()))?;
        Ok(rects
            .iter()
            .map(|r| FaceBox::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
