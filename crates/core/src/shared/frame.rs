use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::face_box::FaceBox;

/// One camera frame: contiguous RGB bytes in row-major order.
///
/// Camera adapters convert to RGB at the I/O boundary; everything past
/// the `FrameSource` treats the pixels as plain RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Sequence number assigned by the source, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels inside `face`, clipped to the frame.
    ///
    /// Returns `None` when nothing of the box lies inside the frame.
    pub fn crop(&self, face: &FaceBox) -> Option<Frame> {
        let clipped = face.clamp_to(self.width, self.height)?;
        let (x, y) = (clipped.x as usize, clipped.y as usize);
        let (w, h) = (clipped.width as usize, clipped.height as usize);
        let channels = self.channels as usize;
        let stride = self.width as usize * channels;

        let mut data = Vec::with_capacity(w * h * channels);
        for row in y..y + h {
            let start = row * stride + x * channels;
            data.extend_from_slice(&self.data[start..start + w * channels]);
        }
        Some(Frame::new(
            data,
            clipped.width as u32,
            clipped.height as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 RGB frame where every byte encodes its own position.
    fn numbered_frame() -> Frame {
        let data = (0..36).map(|v| v as u8).collect();
        Frame::new(data, 4, 3, 3, 7)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 12], 2, 2, 3, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 24], 4, 2, 3, 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]);
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        frame.as_ndarray_mut()[[0, 1, 2]] = 128;
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 128);
    }

    #[test]
    fn test_crop_copies_region_rows() {
        let frame = numbered_frame();
        let crop = frame.crop(&FaceBox::new(1, 1, 2, 2)).unwrap();

        assert_eq!((crop.width(), crop.height()), (2, 2));
        assert_eq!(crop.index(), 7);
        // row 1 starts at byte 12, column 1 adds 3
        assert_eq!(&crop.data()[..6], &[15, 16, 17, 18, 19, 20]);
        assert_eq!(&crop.data()[6..], &[27, 28, 29, 30, 31, 32]);
    }

    #[test]
    fn test_crop_clips_to_frame() {
        let frame = numbered_frame();
        let crop = frame.crop(&FaceBox::new(3, 2, 10, 10)).unwrap();
        assert_eq!((crop.width(), crop.height()), (1, 1));
        assert_eq!(crop.data(), &[33, 34, 35]);
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        let frame = numbered_frame();
        assert!(frame.crop(&FaceBox::new(10, 10, 5, 5)).is_none());
    }
}
