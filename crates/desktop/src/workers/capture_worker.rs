use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, Receiver, Sender, TrySendError};
use log::{debug, error, info, warn, Level};

use facecam_core::error::CaptureError;
use facecam_core::pipeline::capture_orchestrator::CaptureOrchestrator;
use facecam_core::pipeline::overlay::AnnotatedFrame;
use facecam_core::shared::encoded_crop::EncodedCrop;

pub enum Control {
    StartEnrollment,
    CompleteEnrollment {
        name: Option<String>,
        samples: Vec<EncodedCrop>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerEvent {
    Frame(AnnotatedFrame),
    EnrollmentStarted,
    /// Every sample for the session is in; the UI must ask for a name.
    SamplesReady(Vec<EncodedCrop>),
    UserAdded(String),
    /// Enrollment was refused before reaching the service.
    EnrollmentRejected(String),
    EnrollmentFailed(String),
}

/// Handle to the thread that owns the [`CaptureOrchestrator`].
///
/// Cloning shares the same thread. The UI timer feeds ticks through a
/// one-slot channel, so at most one tick is queued while another runs and
/// a slow recognition call never backs up the timer.
#[derive(Clone)]
pub struct CaptureWorker {
    ticks: Sender<()>,
    control: Sender<Control>,
    events: Receiver<WorkerEvent>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for CaptureWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureWorker")
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl CaptureWorker {
    pub fn spawn(orchestrator: CaptureOrchestrator) -> std::io::Result<Self> {
        let (tick_tx, tick_rx) = crossbeam_channel::bounded::<()>(1);
        let (control_tx, control_rx) = crossbeam_channel::unbounded::<Control>();
        let (event_tx, event_rx) = crossbeam_channel::unbounded::<WorkerEvent>();

        let handle = thread::Builder::new()
            .name("capture".into())
            .spawn(move || run(orchestrator, tick_rx, control_rx, event_tx))?;

        Ok(Self {
            ticks: tick_tx,
            control: control_tx,
            events: event_rx,
            handle: Arc::new(Mutex::new(Some(handle))),
        })
    }

    /// Queue a tick. Returns `false` when one is already pending.
    pub fn request_tick(&self) -> bool {
        match self.ticks.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => false,
            Err(TrySendError::Disconnected(())) => false,
        }
    }

    pub fn send(&self, control: Control) {
        if self.control.send(control).is_err() {
            warn!("Capture worker is gone; control message dropped");
        }
    }

    pub fn drain(&self) -> Vec<WorkerEvent> {
        self.events.try_iter().collect()
    }

    /// Stops the worker and waits for it to release the camera.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else {
            return;
        };
        let _ = self.control.send(Control::Shutdown);
        if handle.join().is_err() {
            warn!("Capture worker panicked during shutdown");
        }
    }
}

fn run(
    mut orchestrator: CaptureOrchestrator,
    ticks: Receiver<()>,
    control: Receiver<Control>,
    events: Sender<WorkerEvent>,
) {
    info!("Capture worker started");
    let mut read_failures = ReadFailures::default();
    loop {
        select! {
            recv(control) -> msg => match msg {
                Ok(Control::Shutdown) | Err(_) => break,
                Ok(msg) => handle_control(&mut orchestrator, msg, &events),
            },
            recv(ticks) -> msg => match msg {
                Ok(()) => tick(&mut orchestrator, &events, &mut read_failures),
                Err(_) => break,
            },
        }
    }
    orchestrator.shutdown();
    info!("Capture worker stopped, camera released");
}

/// Tracks consecutive frame read failures so an unplugged camera logs one
/// warning rather than one per tick.
#[derive(Debug, Default)]
struct ReadFailures {
    streak: u32,
}

impl ReadFailures {
    /// Logs `err` and returns the level used.
    fn record(&mut self, err: &CaptureError) -> Level {
        self.streak += 1;
        if self.streak == 1 {
            warn!("Skipping frame: {err}");
            Level::Warn
        } else {
            debug!("Skipping frame ({} in a row): {err}", self.streak);
            Level::Debug
        }
    }

    fn reset(&mut self) {
        if self.streak > 1 {
            info!("Camera recovered after {} failed reads", self.streak);
        }
        self.streak = 0;
    }
}

fn tick(
    orchestrator: &mut CaptureOrchestrator,
    events: &Sender<WorkerEvent>,
    read_failures: &mut ReadFailures,
) {
    match orchestrator.tick() {
        Ok(report) => {
            read_failures.reset();
            let _ = events.send(WorkerEvent::Frame(report.frame));
            if let Some(samples) = report.completed_samples {
                let _ = events.send(WorkerEvent::SamplesReady(samples));
            }
        }
        Err(e) if e.is_recoverable() => {
            read_failures.record(&e);
        }
        Err(e) => error!("Frame source failed: {e}"),
    }
}

fn handle_control(
    orchestrator: &mut CaptureOrchestrator,
    control: Control,
    events: &Sender<WorkerEvent>,
) {
    let event = match control {
        Control::StartEnrollment => {
            orchestrator.start_enrollment();
            WorkerEvent::EnrollmentStarted
        }
        Control::CompleteEnrollment { name, samples } => {
            match orchestrator.complete_enrollment(name.as_deref(), samples) {
                Ok(_) => WorkerEvent::UserAdded(name.unwrap_or_default().trim().to_string()),
                Err(CaptureError::Validation(msg)) => WorkerEvent::EnrollmentRejected(msg),
                Err(e) => WorkerEvent::EnrollmentFailed(e.to_string()),
            }
        }
        Control::Shutdown => return,
    };
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use facecam_core::capture::domain::frame_source::FrameSource;
    use facecam_core::detection::domain::face_detector::FaceDetector;
    use facecam_core::error::NetworkError;
    use facecam_core::recognition::domain::enrollment_client::EnrollmentClient;
    use facecam_core::recognition::domain::recognition_client::RecognitionClient;
    use facecam_core::recognition::domain::response_cache::{CachePolicy, ResponseCache};
    use facecam_core::shared::constants::SAMPLE_COUNT;
    use facecam_core::shared::face_box::FaceBox;
    use facecam_core::shared::frame::Frame;
    use facecam_core::shared::identity::IdentityLabel;

    struct StubSource {
        closed: Arc<Mutex<bool>>,
    }

    impl FrameSource for StubSource {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            Ok(Frame::new(vec![90; 48 * 48 * 3], 48, 48, 3, 0))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct OneFace;

    impl FaceDetector for OneFace {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceBox>, CaptureError> {
            Ok(vec![FaceBox::new(4, 4, 24, 24)])
        }
    }

    struct Alice;

    impl RecognitionClient for Alice {
        fn recognize(&self, _crop: &EncodedCrop) -> Result<IdentityLabel, NetworkError> {
            Ok(IdentityLabel::Known("Alice".into()))
        }
    }

    struct Enroller {
        names: Arc<Mutex<Vec<String>>>,
    }

    impl EnrollmentClient for Enroller {
        fn enroll(
            &self,
            name: &str,
            _crops: &[EncodedCrop],
        ) -> Result<serde_json::Value, NetworkError> {
            self.names.lock().unwrap().push(name.to_string());
            Ok(serde_json::json!({"status": "ok"}))
        }
    }

    fn spawn_worker() -> (CaptureWorker, Arc<Mutex<bool>>, Arc<Mutex<Vec<String>>>) {
        let closed = Arc::new(Mutex::new(false));
        let names = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = CaptureOrchestrator::new(
            Box::new(StubSource {
                closed: closed.clone(),
            }),
            Box::new(OneFace),
            Box::new(Alice),
            Box::new(Enroller {
                names: names.clone(),
            }),
            ResponseCache::unbounded(),
            CachePolicy::default(),
        );
        (CaptureWorker::spawn(orchestrator).unwrap(), closed, names)
    }

    /// Ticks until `pred` matches an event or two seconds pass.
    fn wait_for(worker: &CaptureWorker, pred: impl Fn(&WorkerEvent) -> bool) -> WorkerEvent {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            worker.request_tick();
            if let Some(event) = worker.drain().into_iter().find(|e| pred(e)) {
                return event;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("timed out waiting for worker event");
    }

    #[test]
    fn test_tick_publishes_labeled_frame() {
        let (worker, _, _) = spawn_worker();

        let event = wait_for(&worker, |e| matches!(e, WorkerEvent::Frame(_)));

        match event {
            WorkerEvent::Frame(frame) => assert_eq!(frame.labels[0].text, "Alice"),
            other => panic!("unexpected event: {other:?}"),
        }
        worker.shutdown();
    }

    #[test]
    fn test_enrollment_round_trip_through_worker() {
        let (worker, _, names) = spawn_worker();

        worker.send(Control::StartEnrollment);
        let samples = match wait_for(&worker, |e| matches!(e, WorkerEvent::SamplesReady(_))) {
            WorkerEvent::SamplesReady(samples) => samples,
            other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(samples.len(), SAMPLE_COUNT);

        worker.send(Control::CompleteEnrollment {
            name: Some("Bob".into()),
            samples,
        });
        let added = wait_for(&worker, |e| matches!(e, WorkerEvent::UserAdded(_)));

        assert!(matches!(added, WorkerEvent::UserAdded(ref n) if n == "Bob"));
        assert_eq!(*names.lock().unwrap(), vec!["Bob".to_string()]);
        worker.shutdown();
    }

    #[test]
    fn test_cancelled_name_is_rejected_without_network() {
        let (worker, _, names) = spawn_worker();

        worker.send(Control::CompleteEnrollment {
            name: None,
            samples: Vec::new(),
        });
        let event = wait_for(&worker, |e| matches!(e, WorkerEvent::EnrollmentRejected(_)));

        assert!(matches!(event, WorkerEvent::EnrollmentRejected(_)));
        assert!(names.lock().unwrap().is_empty());
        worker.shutdown();
    }

    #[test]
    fn test_repeated_read_failures_drop_to_debug() {
        let mut failures = ReadFailures::default();
        let err = CaptureError::ReadTimeout("camera 0 returned no frame".into());

        assert_eq!(failures.record(&err), Level::Warn);
        assert_eq!(failures.record(&err), Level::Debug);
        assert_eq!(failures.record(&err), Level::Debug);

        failures.reset();
        assert_eq!(failures.record(&err), Level::Warn);
    }

    #[test]
    fn test_shutdown_releases_source_and_is_idempotent() {
        let (worker, closed, _) = spawn_worker();

        worker.shutdown();
        worker.shutdown();

        assert!(*closed.lock().unwrap());
        assert!(!worker.request_tick());
    }
}
