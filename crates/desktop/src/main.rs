mod app;
mod settings;
mod startup;
mod theme;
mod widgets;
mod workers;

use std::process;

use rfd::{MessageButtons, MessageDialog, MessageLevel};

use app::App;
use settings::Settings;
use workers::capture_worker::CaptureWorker;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();

    let orchestrator = match startup::build_orchestrator(&settings) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            log::error!("Startup failed: {e}");
            let (title, body) = startup::failure_dialog_text(&e);
            fail(title, &body);
        }
    };
    let worker = match CaptureWorker::spawn(orchestrator) {
        Ok(worker) => worker,
        Err(e) => {
            log::error!("Could not start capture thread: {e}");
            fail("FaceCam failed to start", &e.to_string());
        }
    };

    let shutdown_handle = worker.clone();
    let result = iced::application(
        move || App::new(worker.clone(), settings.clone()),
        App::update,
        App::view,
    )
    .title("Face Recognition App")
    .theme(App::theme)
    .subscription(App::subscription)
    .window(iced::window::Settings {
        size: iced::Size::new(672.0, 600.0),
        exit_on_close_request: false,
        ..Default::default()
    })
    .run();

    // Covers exits that bypass Quit; a no-op otherwise.
    shutdown_handle.shutdown();
    result
}

fn fail(title: &str, body: &str) -> ! {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(body)
        .set_buttons(MessageButtons::Ok)
        .show();
    process::exit(1);
}
