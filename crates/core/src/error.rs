use thiserror::Error;

/// Failures a remote call can end in.
///
/// `endpoint` is the full URL so a logged error alone says which call broke.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl NetworkError {
    pub fn endpoint(&self) -> &str {
        match self {
            NetworkError::Transport { endpoint, .. }
            | NetworkError::Status { endpoint, .. }
            | NetworkError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum CaptureError {
    /// The camera could not be opened. Fatal at startup.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    /// The cascade model is missing or corrupt. Fatal at startup.
    #[error("face detection model could not be loaded: {0}")]
    ModelLoad(String),
    /// One frame could not be read. The next tick retries.
    #[error("failed to read frame: {0}")]
    ReadTimeout(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("{0}")]
    Validation(String),
    #[error("failed to encode face crop: {0}")]
    Encode(String),
    #[error("face detection failed: {0}")]
    Detection(String),
}

impl CaptureError {
    /// Whether the capture loop can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CaptureError::DeviceUnavailable(_) | CaptureError::ModelLoad(_)
        )
    }
}
