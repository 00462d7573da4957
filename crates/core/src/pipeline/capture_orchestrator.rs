use log::{debug, error, info, warn};

use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::error::CaptureError;
use crate::pipeline::overlay::{annotate, AnnotatedFrame, Annotation};
use crate::recognition::domain::enrollment_client::EnrollmentClient;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::recognition::domain::response_cache::{CachePolicy, ResponseCache};
use crate::shared::constants::SAMPLE_COUNT;
use crate::shared::encoded_crop::EncodedCrop;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::identity::IdentityLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Recognize every detected face.
    Idle,
    /// Collect face crops for a new user.
    Enrolling,
}

/// What one tick produced.
#[derive(Debug)]
pub struct TickReport {
    pub frame: AnnotatedFrame,
    /// Set on the tick that collected the final enrollment sample. The
    /// orchestrator is back in `Idle` by then and no longer holds them.
    pub completed_samples: Option<Vec<EncodedCrop>>,
}

/// Per-frame control loop: read, detect, then either collect enrollment
/// samples or recognize faces through the response cache.
///
/// Owns every collaborator, so a tick touches no shared state and
/// exactly one tick runs at a time.
pub struct CaptureOrchestrator {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    recognizer: Box<dyn RecognitionClient>,
    enroller: Box<dyn EnrollmentClient>,
    cache: ResponseCache,
    policy: CachePolicy,
    mode: CaptureMode,
    samples: Vec<EncodedCrop>,
}

impl CaptureOrchestrator {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        recognizer: Box<dyn RecognitionClient>,
        enroller: Box<dyn EnrollmentClient>,
        cache: ResponseCache,
        policy: CachePolicy,
    ) -> Self {
        Self {
            source,
            detector,
            recognizer,
            enroller,
            cache,
            policy,
            mode: CaptureMode::Idle,
            samples: Vec::with_capacity(SAMPLE_COUNT),
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Samples collected so far in the current enrollment session.
    pub fn collected_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResponseCache {
        &mut self.cache
    }

    /// Enters enrollment mode, discarding any unfinished session.
    pub fn start_enrollment(&mut self) {
        if !self.samples.is_empty() {
            info!("Discarding {} samples from an unfinished enrollment", self.samples.len());
        }
        self.samples.clear();
        self.mode = CaptureMode::Enrolling;
        info!("Enrollment started, collecting {SAMPLE_COUNT} samples");
    }

    pub fn cancel_enrollment(&mut self) {
        self.samples.clear();
        self.mode = CaptureMode::Idle;
    }

    /// Reads one frame and processes it.
    ///
    /// A `ReadTimeout` error means this tick had nothing to show; the
    /// next tick simply tries again.
    pub fn tick(&mut self) -> Result<TickReport, CaptureError> {
        let frame = self.source.read_frame()?;
        Ok(self.process_frame(&frame))
    }

    pub fn process_frame(&mut self, frame: &Frame) -> TickReport {
        let faces = match self.detector.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!("Face detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        let (annotations, completed_samples) = match self.mode {
            CaptureMode::Enrolling => self.collect_samples(frame, &faces),
            CaptureMode::Idle => (self.recognize_faces(frame, &faces), None),
        };

        TickReport {
            frame: annotate(frame, &annotations),
            completed_samples,
        }
    }

    /// Sends a finished session to the enrollment service.
    ///
    /// A missing or blank name is a `Validation` error and nothing is sent.
    /// The samples are consumed either way.
    pub fn complete_enrollment(
        &self,
        name: Option<&str>,
        samples: Vec<EncodedCrop>,
    ) -> Result<serde_json::Value, CaptureError> {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            warn!("No user name entered, discarding {} samples", samples.len());
            return Err(CaptureError::Validation(
                "No user name entered. User not added.".into(),
            ));
        };
        if samples.len() != SAMPLE_COUNT {
            return Err(CaptureError::Validation(format!(
                "expected {SAMPLE_COUNT} samples, got {}",
                samples.len()
            )));
        }

        match self.enroller.enroll(name, &samples) {
            Ok(body) => {
                info!("Enrolled {name:?}: {body}");
                Ok(body)
            }
            Err(e) => {
                error!("Error adding user {name:?}: {e}");
                Err(e.into())
            }
        }
    }

    /// Releases the frame source.
    pub fn shutdown(&mut self) {
        self.source.close();
    }

    fn collect_samples(
        &mut self,
        frame: &Frame,
        faces: &[FaceBox],
    ) -> (Vec<Annotation>, Option<Vec<EncodedCrop>>) {
        let mut annotations = Vec::with_capacity(faces.len());
        for face in faces {
            annotations.push(Annotation::unlabeled(*face));
            match EncodedCrop::encode(frame, face) {
                Ok(crop) => self.samples.push(crop),
                Err(e) => {
                    warn!("Skipping enrollment sample: {e}");
                    continue;
                }
            }
            info!("Captured {}/{SAMPLE_COUNT} samples", self.samples.len());

            if self.samples.len() >= SAMPLE_COUNT {
                self.mode = CaptureMode::Idle;
                return (annotations, Some(std::mem::take(&mut self.samples)));
            }
        }
        (annotations, None)
    }

    fn recognize_faces(&mut self, frame: &Frame, faces: &[FaceBox]) -> Vec<Annotation> {
        faces
            .iter()
            .map(|face| {
                let label = self.identify(frame, face);
                Annotation::labeled(*face, label.to_string())
            })
            .collect()
    }

    fn identify(&mut self, frame: &Frame, face: &FaceBox) -> IdentityLabel {
        let crop = match EncodedCrop::encode(frame, face) {
            Ok(crop) => crop,
            Err(e) => {
                warn!("Could not encode face for recognition: {e}");
                return IdentityLabel::Unknown;
            }
        };

        let hash = crop.content_hash();
        if let Some(label) = self.cache.get(&hash) {
            debug!("Cache hit {hash}: {label}");
            return label;
        }

        match self.recognizer.recognize(&crop) {
            Ok(label) => {
                if !label.is_known() {
                    info!("Face not recognized. Consider adding this user.");
                }
                self.cache.put(hash, label.clone());
                label
            }
            Err(e) => {
                error!("Error recognizing face via {}: {e}", e.endpoint());
                if self.policy.caches_failures() {
                    self.cache.put(hash, IdentityLabel::Unknown);
                }
                IdentityLabel::Unknown
            }
        }
    }
}
