use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Box outline color (RGB blue).
pub const BOX_COLOR: [u8; 3] = [0, 0, 255];
pub const BOX_THICKNESS: i32 = 2;
/// Label baseline sits this many pixels above the box.
pub const LABEL_OFFSET: i32 = 10;

/// One face to outline, optionally captioned.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub face: FaceBox,
    pub label: Option<String>,
}

impl Annotation {
    pub fn labeled(face: FaceBox, label: impl Into<String>) -> Self {
        Self {
            face,
            label: Some(label.into()),
        }
    }

    pub fn unlabeled(face: FaceBox) -> Self {
        Self { face, label: None }
    }
}

/// Where a caption goes, in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelAnchor {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// A frame with boxes burned in, plus the captions to draw over it.
///
/// Captions stay as text so the UI can render them with a real font.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedFrame {
    pub frame: Frame,
    pub labels: Vec<LabelAnchor>,
}

/// Renders `annotations` onto a copy of `frame`. The input is left untouched.
pub fn annotate(frame: &Frame, annotations: &[Annotation]) -> AnnotatedFrame {
    let mut out = frame.clone();
    let mut labels = Vec::new();
    for annotation in annotations {
        draw_outline(&mut out, &annotation.face);
        if let Some(text) = &annotation.label {
            labels.push(LabelAnchor {
                x: annotation.face.x.max(0),
                y: (annotation.face.y - LABEL_OFFSET).max(0),
                text: text.clone(),
            });
        }
    }
    AnnotatedFrame { frame: out, labels }
}

fn draw_outline(frame: &mut Frame, face: &FaceBox) {
    let Some(b) = face.clamp_to(frame.width(), frame.height()) else {
        return;
    };
    let channels = (frame.channels() as usize).min(BOX_COLOR.len());
    let mut pixels = frame.as_ndarray_mut();
    let mut paint = |row: i32, col: i32| {
        for (c, value) in BOX_COLOR.iter().enumerate().take(channels) {
            pixels[[row as usize, col as usize, c]] = *value;
        }
    };

    let thickness = BOX_THICKNESS.min(b.width).min(b.height);
    for t in 0..thickness {
        let (top, bottom) = (b.y + t, b.bottom() - 1 - t);
        let (left, right) = (b.x + t, b.right() - 1 - t);
        for col in b.x..b.right() {
            paint(top, col);
            paint(bottom, col);
        }
        for row in b.y..b.bottom() {
            paint(row, left);
            paint(row, right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> Frame {
        Frame::new(vec![90u8; (width * height * 3) as usize], width, height, 3, 0)
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let a = frame.as_ndarray();
        [a[[y, x, 0]], a[[y, x, 1]], a[[y, x, 2]]]
    }

    #[test]
    fn test_no_annotations_leaves_frame_unchanged() {
        let frame = gray_frame(20, 20);
        let result = annotate(&frame, &[]);
        assert_eq!(result.frame, frame);
        assert!(result.labels.is_empty());
    }

    #[test]
    fn test_outline_is_drawn_on_edges_only() {
        let frame = gray_frame(20, 20);
        let result = annotate(&frame, &[Annotation::unlabeled(FaceBox::new(4, 4, 10, 10))]);

        assert_eq!(pixel(&result.frame, 4, 4), BOX_COLOR);
        assert_eq!(pixel(&result.frame, 5, 9), BOX_COLOR); // second ring, left
        assert_eq!(pixel(&result.frame, 13, 13), BOX_COLOR);
        assert_eq!(pixel(&result.frame, 9, 9), [90, 90, 90]); // interior
        assert_eq!(pixel(&result.frame, 3, 3), [90, 90, 90]); // outside
    }

    #[test]
    fn test_input_frame_is_not_mutated() {
        let frame = gray_frame(20, 20);
        let before = frame.clone();
        let _ = annotate(&frame, &[Annotation::labeled(FaceBox::new(0, 0, 5, 5), "Alice")]);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_label_anchor_sits_above_box() {
        let frame = gray_frame(100, 100);
        let result = annotate(&frame, &[Annotation::labeled(FaceBox::new(30, 40, 20, 20), "Alice")]);
        assert_eq!(
            result.labels,
            vec![LabelAnchor {
                x: 30,
                y: 30,
                text: "Alice".into()
            }]
        );
    }

    #[test]
    fn test_label_anchor_clamped_at_top() {
        let frame = gray_frame(100, 100);
        let result = annotate(&frame, &[Annotation::labeled(FaceBox::new(10, 4, 20, 20), "Bob")]);
        assert_eq!(result.labels[0].y, 0);
    }

    #[test]
    fn test_box_partially_outside_is_clipped() {
        let frame = gray_frame(10, 10);
        let result = annotate(&frame, &[Annotation::unlabeled(FaceBox::new(6, 6, 10, 10))]);
        assert_eq!(pixel(&result.frame, 9, 9), BOX_COLOR);
        assert_eq!(pixel(&result.frame, 6, 6), BOX_COLOR);
    }

    #[test]
    fn test_box_fully_outside_draws_nothing() {
        let frame = gray_frame(10, 10);
        let result = annotate(&frame, &[Annotation::unlabeled(FaceBox::new(50, 50, 5, 5))]);
        assert_eq!(result.frame, frame);
    }
}
