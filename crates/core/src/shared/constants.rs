pub const CASCADE_MODEL_NAME: &str = "haarcascade_frontalface_default.xml";

/// Face crops collected per enrollment session.
pub const SAMPLE_COUNT: usize = 5;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const RECOGNIZE_PATH: &str = "/recognize";
pub const ADD_USER_PATH: &str = "/add_user";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

pub const JPEG_QUALITY: u8 = 95;

/// Directory name used under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "FaceCam";
