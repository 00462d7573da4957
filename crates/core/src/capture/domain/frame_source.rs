use crate::error::CaptureError;
use crate::shared::frame::Frame;

/// A live source of RGB frames, typically a camera.
///
/// Implementations are opened by their constructor and must release the
/// device on `close` and on drop, exactly once.
pub trait FrameSource: Send {
    /// Reads the next frame. `CaptureError::ReadTimeout` is recoverable:
    /// callers skip the tick and try again on the next one.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Further calls are no-ops.
    fn close(&mut self);
}
