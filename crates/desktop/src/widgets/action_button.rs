use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area, text};
use iced::{Color, Element, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{muted_text_color, surface_color};

const CORNER_RADIUS: f32 = 10.0;
const FLOAT_HEIGHT: f32 = 1.0;
const HOVER_DARKEN: f32 = 0.05;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);
const PADDING: [u16; 2] = [8, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Filled with the primary color.
    Primary,
    /// Outlined on the surface color.
    Quiet,
}

/// A button that lifts and darkens while hovered.
///
/// iced has no hover message for buttons, so the caller keeps the hover
/// flag and passes it back in.
pub fn action_button<'a, Message: Clone + 'a>(
    label: &'a str,
    kind: ButtonKind,
    on_press: Message,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    let target = if hovered { 1.0_f32 } else { 0.0 };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        build(label, kind, &on_press, t.clamp(0.0, 1.0))
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn build<'a, Message: Clone + 'a>(
    label: &'a str,
    kind: ButtonKind,
    on_press: &Message,
    hover_amount: f32,
) -> Element<'a, Message> {
    let btn = button(text(label).size(14))
        .on_press(on_press.clone())
        .padding(PADDING)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = if status == button::Status::Pressed {
                1.0
            } else {
                hover_amount
            };
            match kind {
                ButtonKind::Primary => primary_style(theme, amount),
                ButtonKind::Quiet => quiet_style(theme, amount),
            }
        });

    let rise = hover_amount * FLOAT_HEIGHT;
    container(btn)
        .padding(Padding {
            top: FLOAT_HEIGHT - rise,
            bottom: rise,
            ..Padding::ZERO
        })
        .into()
}

fn primary_style(theme: &Theme, t: f32) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    button::Style {
        background: Some(darken(base, t).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color { a: lerp(0.25, 0.35, t), ..base },
            offset: Vector::new(0.0, 3.0),
            blur_radius: lerp(10.0, 15.0, t),
        },
        ..button::Style::default()
    }
}

fn quiet_style(theme: &Theme, t: f32) -> button::Style {
    let text = theme.palette().text;
    button::Style {
        background: Some(darken(surface_color(theme), t).into()),
        text_color: muted_text_color(theme),
        border: Border {
            color: Color { a: lerp(0.15, 0.35, t), ..text },
            width: 1.0,
            radius: CORNER_RADIUS.into(),
        },
        ..button::Style::default()
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}
