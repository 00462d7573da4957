use iced::widget::{button, center, column, container, opaque, row, stack, text, text_input};
use iced::{Alignment, Color, Element, Length, Subscription, Task, Theme};

use facecam_core::shared::encoded_crop::EncodedCrop;

use crate::settings::Settings;
use crate::theme::{self, muted_text_color};
use crate::widgets::action_button::{action_button, ButtonKind};
use crate::widgets::frame_view::{frame_view, DisplayFrame};
use crate::workers::capture_worker::{CaptureWorker, Control, WorkerEvent};

const VIDEO_WIDTH: f32 = 640.0;
const VIDEO_HEIGHT: f32 = 480.0;

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    AddUser,
    AddUserHovered(bool),
    Quit,
    QuitHovered(bool),
    NameChanged(String),
    NameSubmitted,
    NameCancelled,
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line status shown under the video. Replaced by the next notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// The notice a worker event should raise, if any.
    fn for_event(event: &WorkerEvent) -> Option<Self> {
        match event {
            WorkerEvent::Frame(_) | WorkerEvent::SamplesReady(_) => None,
            WorkerEvent::EnrollmentStarted => Some(Self::new(
                NoticeKind::Info,
                "Capturing face samples. Please look at the camera.",
            )),
            WorkerEvent::UserAdded(name) => Some(Self::new(
                NoticeKind::Success,
                format!("User {name} added successfully!"),
            )),
            WorkerEvent::EnrollmentRejected(msg) => Some(Self::new(NoticeKind::Warning, msg)),
            WorkerEvent::EnrollmentFailed(msg) => Some(Self::new(
                NoticeKind::Error,
                format!("Error adding user: {msg}"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Name prompt
// ---------------------------------------------------------------------------

/// Samples from a finished capture, held until the user names them.
#[derive(Debug)]
struct NamePrompt {
    name: String,
    samples: Vec<EncodedCrop>,
}

impl NamePrompt {
    fn new(samples: Vec<EncodedCrop>) -> Self {
        Self {
            name: String::new(),
            samples,
        }
    }

    /// Cancelling sends no name, which the worker rejects without
    /// contacting the service.
    fn finish(self, submitted: bool) -> Control {
        Control::CompleteEnrollment {
            name: submitted.then_some(self.name),
            samples: self.samples,
        }
    }
}

/// Opens the name prompt for `samples`. If one is already open, the new
/// batch is handed back as a cancelled enrollment so the open prompt and
/// its typed name survive.
fn offer_samples(prompt: &mut Option<NamePrompt>, samples: Vec<EncodedCrop>) -> Option<Control> {
    if prompt.is_some() {
        log::warn!(
            "Name prompt already open, discarding {} newer samples",
            samples.len()
        );
        return Some(NamePrompt::new(samples).finish(false));
    }
    *prompt = Some(NamePrompt::new(samples));
    None
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    worker: CaptureWorker,
    settings: Settings,
    frame: Option<DisplayFrame>,
    notice: Option<Notice>,
    prompt: Option<NamePrompt>,
    add_user_hovered: bool,
    quit_hovered: bool,
    quitting: bool,
}

impl App {
    pub fn new(worker: CaptureWorker, settings: Settings) -> (Self, Task<Message>) {
        (
            Self {
                worker,
                settings,
                frame: None,
                notice: None,
                prompt: None,
                add_user_hovered: false,
                quit_hovered: false,
                quitting: false,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.worker.request_tick();
                for event in self.worker.drain() {
                    self.apply(event);
                }
            }
            Message::AddUser => {
                if self.prompt.is_none() {
                    self.worker.send(Control::StartEnrollment);
                }
            }
            Message::AddUserHovered(hovered) => self.add_user_hovered = hovered,
            Message::QuitHovered(hovered) => self.quit_hovered = hovered,
            Message::NameChanged(name) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.name = name;
                }
            }
            Message::NameSubmitted => self.close_prompt(true),
            Message::NameCancelled => self.close_prompt(false),
            Message::Quit => {
                if !self.quitting {
                    self.quitting = true;
                    log::info!("Quit requested, stopping capture");
                    self.worker.shutdown();
                    return iced::exit();
                }
            }
        }
        Task::none()
    }

    fn apply(&mut self, event: WorkerEvent) {
        if let Some(notice) = Notice::for_event(&event) {
            self.notice = Some(notice);
        }
        match event {
            WorkerEvent::Frame(annotated) => {
                self.frame = Some(DisplayFrame::from_annotated(annotated));
            }
            WorkerEvent::SamplesReady(samples) => {
                if let Some(control) = offer_samples(&mut self.prompt, samples) {
                    self.worker.send(control);
                }
            }
            _ => {}
        }
    }

    fn close_prompt(&mut self, submitted: bool) {
        if let Some(prompt) = self.prompt.take() {
            self.worker.send(prompt.finish(submitted));
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let video: Element<'_, Message> = match &self.frame {
            Some(frame) => frame_view(frame),
            None => center(text("Waiting for camera...").style(|theme: &Theme| text::Style {
                color: Some(muted_text_color(theme)),
            }))
            .into(),
        };
        let video = container(video)
            .width(Length::Fixed(VIDEO_WIDTH))
            .height(Length::Fixed(VIDEO_HEIGHT));

        let controls = row![
            action_button(
                "Add User",
                ButtonKind::Primary,
                Message::AddUser,
                self.add_user_hovered,
                Message::AddUserHovered,
            ),
            action_button(
                "Quit",
                ButtonKind::Quiet,
                Message::Quit,
                self.quit_hovered,
                Message::QuitHovered,
            ),
        ]
        .spacing(12);

        let content = column![video, controls, notice_line(self.notice.as_ref())]
            .spacing(12)
            .padding(16)
            .align_x(Alignment::Center);

        match &self.prompt {
            Some(prompt) => stack![content, name_prompt(prompt)].into(),
            None => content.into(),
        }
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(self.settings.tick_interval()).map(|_| Message::Tick),
            iced::window::close_requests().map(|_| Message::Quit),
        ])
    }
}

fn notice_line(notice: Option<&Notice>) -> Element<'_, Message> {
    let Some(notice) = notice else {
        return text("").size(13).into();
    };
    let kind = notice.kind;
    text(notice.text.as_str())
        .size(13)
        .style(move |theme: &Theme| {
            let palette = theme.palette();
            let color = match kind {
                NoticeKind::Info => muted_text_color(theme),
                NoticeKind::Success => palette.success,
                NoticeKind::Warning => palette.warning,
                NoticeKind::Error => palette.danger,
            };
            text::Style { color: Some(color) }
        })
        .into()
}

fn name_prompt(prompt: &NamePrompt) -> Element<'_, Message> {
    let dialog = container(
        column![
            text("Enter user name").size(16),
            text_input("Name", &prompt.name)
                .on_input(Message::NameChanged)
                .on_submit(Message::NameSubmitted)
                .padding(8),
            row![
                button(text("Cancel"))
                    .on_press(Message::NameCancelled)
                    .style(button::secondary),
                button(text("Add"))
                    .on_press(Message::NameSubmitted)
                    .style(button::primary),
            ]
            .spacing(8),
        ]
        .spacing(12),
    )
    .padding(20)
    .width(Length::Fixed(320.0))
    .style(container::rounded_box);

    opaque(center(dialog).style(|_theme: &Theme| container::Style {
        background: Some(Color { a: 0.6, ..Color::BLACK }.into()),
        ..container::Style::default()
    }))
}
