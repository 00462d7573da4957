use log::info;

use facecam_core::capture::infrastructure::opencv_camera::OpenCvCamera;
use facecam_core::detection::domain::detection_params::DetectionParams;
use facecam_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use facecam_core::detection::infrastructure::model_resolver;
use facecam_core::error::CaptureError;
use facecam_core::pipeline::capture_orchestrator::CaptureOrchestrator;
use facecam_core::recognition::domain::response_cache::ResponseCache;
use facecam_core::recognition::infrastructure::http_face_service::HttpFaceService;

use crate::settings::Settings;

/// Opens the camera, loads the cascade and wires both service roles.
///
/// The camera is opened first; if the model then fails to load, the
/// camera is dropped (and released) before the error is returned.
pub fn build_orchestrator(settings: &Settings) -> Result<CaptureOrchestrator, CaptureError> {
    let camera = OpenCvCamera::open(settings.camera_index)?;

    let cascade = model_resolver::resolve_cascade(settings.cascade_path.as_deref())?;
    let detector = CascadeFaceDetector::new(&cascade, DetectionParams::default())?;
    info!("Loaded face cascade from {}", cascade.display());

    let service = HttpFaceService::new(&settings.server_url, settings.request_timeout())?;
    info!(
        "Recognition service at {} (enroll via {})",
        service.recognize_url(),
        service.add_user_url()
    );

    Ok(CaptureOrchestrator::new(
        Box::new(camera),
        Box::new(detector),
        Box::new(service.clone()),
        Box::new(service),
        ResponseCache::with_capacity_limit(settings.cache_capacity),
        settings.cache_policy,
    ))
}

/// Title and body for the startup failure dialog.
pub fn failure_dialog_text(err: &CaptureError) -> (&'static str, String) {
    match err {
        CaptureError::DeviceUnavailable(_) => (
            "Camera unavailable",
            format!("Could not open the camera.\n\n{err}"),
        ),
        CaptureError::ModelLoad(_) => (
            "Face model missing",
            format!("Could not load the face detection model.\n\n{err}"),
        ),
        _ => ("FaceCam failed to start", err.to_string()),
    }
}
