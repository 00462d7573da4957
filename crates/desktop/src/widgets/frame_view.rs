use iced::mouse;
use iced::widget::canvas::{self, Canvas, Geometry};
use iced::widget::image::{self, Handle};
use iced::widget::stack;
use iced::{Color, ContentFit, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Theme};

use facecam_core::pipeline::overlay::{AnnotatedFrame, LabelAnchor};

/// Label color, green as in the recognition overlay.
const LABEL_COLOR: Color = Color::from_rgb(0.0, 1.0, 0.0);
const LABEL_SIZE: f32 = 20.0;

/// An annotated frame ready for the GUI: pixels converted to an image
/// handle, labels kept in frame coordinates.
#[derive(Debug, Clone)]
pub struct DisplayFrame {
    handle: Handle,
    size: Size,
    labels: Vec<LabelAnchor>,
}

impl DisplayFrame {
    pub fn from_annotated(annotated: AnnotatedFrame) -> Self {
        let frame = &annotated.frame;
        let (width, height) = (frame.width(), frame.height());
        Self {
            handle: Handle::from_rgba(width, height, to_rgba(frame.data(), frame.channels())),
            size: Size::new(width as f32, height as f32),
            labels: annotated.labels,
        }
    }
}

pub fn frame_view<'a, Message: 'a>(frame: &'a DisplayFrame) -> Element<'a, Message> {
    let picture = image::Image::new(frame.handle.clone())
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Contain);

    let labels = Canvas::new(LabelLayer { frame })
        .width(Length::Fill)
        .height(Length::Fill);

    stack![picture, labels].into()
}

struct LabelLayer<'a> {
    frame: &'a DisplayFrame,
}

impl<Message> canvas::Program<Message> for LabelLayer<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut layer = canvas::Frame::new(renderer, bounds.size());
        let (scale, offset) = contain(self.frame.size, bounds.size());

        for label in &self.frame.labels {
            let x = offset.x + label.x as f32 * scale;
            // Anchors mark the text baseline; canvas text hangs from its top.
            let y = offset.y + label.y as f32 * scale - LABEL_SIZE * scale;
            layer.fill_text(canvas::Text {
                content: label.text.clone(),
                position: Point::new(x, y.max(0.0)),
                color: LABEL_COLOR,
                size: Pixels(LABEL_SIZE * scale),
                ..canvas::Text::default()
            });
        }

        vec![layer.into_geometry()]
    }
}

/// Scale and top-left offset of `content` fitted inside `bounds` the way
/// `ContentFit::Contain` centers it.
fn contain(content: Size, bounds: Size) -> (f32, Point) {
    if content.width <= 0.0 || content.height <= 0.0 {
        return (1.0, Point::ORIGIN);
    }
    let scale = (bounds.width / content.width).min(bounds.height / content.height);
    let offset = Point::new(
        (bounds.width - content.width * scale) / 2.0,
        (bounds.height - content.height * scale) / 2.0,
    );
    (scale, offset)
}

fn to_rgba(data: &[u8], channels: u8) -> Vec<u8> {
    match channels {
        4 => data.to_vec(),
        1 => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        _ => data
            .chunks_exact(channels as usize)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
    }
}
