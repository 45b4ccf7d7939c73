#![deny(clippy::all)]

mod audio;
mod backend;
mod config;
mod console;
mod controller;
mod error;
mod media;
mod page;
mod platform;
mod questions;
mod recording_state;
mod sequencer;
mod speech;
mod submission;
#[cfg(test)]
mod testing;
mod view;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file may carry RUST_LOG and FIELD_REPORT_* overrides
    let dotenv = dotenvy::dotenv();

    // Initialize tracing for structured logging; stdout belongs to the form
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let settings = config::Settings::load().context("Failed to load configuration")?;

    let backend = backend::BackendClient::new(&settings.backend)?;
    let page = page::PageContext::parse(&settings.page.url)
        .with_context(|| format!("Invalid page URL: {}", settings.page.url))?;
    info!(
        backend = %settings.backend.base_url,
        page = %page.url(),
        project_id = ?page.project_id(),
        "Configuration loaded"
    );

    let lines = console::spawn_line_reader();
    let platform = platform::Platform {
        family: settings.platform.family(),
        synthesizer: Box::new(console::PrintSynthesizer),
        recognizer: Box::new(console::LineRecognizer::new(lines.clone())),
        microphone: Box::new(audio::CpalMicrophone),
        devices: Box::new(console::StillImageDevices::from_settings(&settings.capture)),
    };
    info!(family = ?platform.family, "Platform ready");

    let controller = controller::FieldReportController::new(
        platform,
        Box::new(backend),
        Box::new(console::ConsoleView),
        sequencer::Sequencer::new((&settings.speech).into()),
        media::MediaCaptureManager::new(
            settings.capture.default_facing,
            settings.capture.photo_quality,
        ),
        submission::SubmissionAssembler::new(page),
    );

    console::run(controller, lines).await
}
