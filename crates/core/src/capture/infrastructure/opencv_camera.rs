use log::{info, warn};
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio;

use crate::capture::domain::frame_source::FrameSource;
use crate::error::CaptureError;
use crate::shared::frame::Frame;

/// Camera frames through OpenCV's `VideoCapture`, converted BGR -> RGB.
pub struct OpenCvCamera {
    capture: videoio::VideoCapture,
    device_index: i32,
    released: bool,
    next_index: usize,
}

// Safety: the capture handle is only touched by whichever thread owns the
// camera; ownership moves to the capture worker once and stays there.
unsafe impl Send for OpenCvCamera {}

impl OpenCvCamera {
    pub fn open(device_index: i32) -> Result<Self, CaptureError> {
        info!("Opening camera {device_index}");
        let capture = videoio::VideoCapture::new(device_index, videoio::CAP_ANY)
            .map_err(|e| CaptureError::DeviceUnavailable(format!("camera {device_index}: {e}")))?;

        // Built before the is_opened check so the handle is released by
        // Drop if the check fails.
        let camera = Self {
            capture,
            device_index,
            released: false,
            next_index: 0,
        };

        let opened = camera
            .capture
            .is_opened()
            .map_err(|e| CaptureError::DeviceUnavailable(format!("camera {device_index}: {e}")))?;
        if !opened {
            return Err(CaptureError::DeviceUnavailable(format!(
                "cannot open camera {device_index}"
            )));
        }
        Ok(camera)
    }

    fn to_rgb_frame(&mut self, bgr: &Mat) -> Result<Frame, opencv::Error> {
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        let rgb = if rgb.is_continuous() {
            rgb
        } else {
            rgb.try_clone()?
        };

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb.data_bytes()?.to_vec();
        let frame = Frame::new(data, width, height, 3, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.released {
            return Err(CaptureError::ReadTimeout("camera already released".into()));
        }
        let mut bgr = Mat::default();
        let grabbed = self
            .capture
            .read(&mut bgr)
            .map_err(|e| CaptureError::ReadTimeout(e.to_string()))?;
        if !grabbed || bgr.empty() {
            return Err(CaptureError::ReadTimeout(format!(
                "camera {} returned no frame",
                self.device_index
            )));
        }
        self.to_rgb_frame(&bgr)
            .map_err(|e| CaptureError::ReadTimeout(e.to_string()))
    }

    fn close(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.capture.release() {
            warn!("Failed to release camera {}: {e}", self.device_index);
        } else {
            info!("Released camera {}", self.device_index);
        }
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.close();
    }
}
