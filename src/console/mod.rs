//! Line-driven terminal front-end
//!
//! Reads commands from stdin and runs them one at a time on the controller.
//! The same line source also feeds the recognizer, which takes the next typed
//! line as a spoken answer. Ctrl-C abandons the running command and releases
//! the camera; at the prompt it quits.

mod camera;
mod speech;
mod view;

pub(crate) use camera::StillImageDevices;
pub(crate) use speech::{LineRecognizer, PrintSynthesizer};
pub(crate) use view::ConsoleView;

use crate::controller::FieldReportController;
use crate::media::{MediaKind, SlotIndex};
use crate::questions::QUESTIONS;
use crate::sequencer::AskOutcome;
use crate::submission::SubmitOutcome;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

const HELP: &str = "\
Comandos:
  start                  hacer las preguntas pendientes
  field <n>              volver a dictar la respuesta <n>
  camera                 encender la cámara
  switch                 cambiar entre cámara trasera y frontal
  photo                  tomar una foto
  attach <rutas..>       adjuntar fotos desde archivos
  attach-video <ruta>    adjuntar un video desde un archivo
  record                 empezar a grabar video
  stop                   detener la grabación
  delete photo|video <n> eliminar una foto o un video
  submit                 enviar el registro
  list                   guardar las respuestas en la lista
  status                 mostrar el estado del formulario
  help                   mostrar esta ayuda
  quit                   salir";

/// Shared stdin lines, consumed by both the command loop and the recognizer
#[derive(Clone)]
pub(crate) struct LineSource {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl LineSource {
    pub(crate) fn from_receiver(rx: mpsc::Receiver<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Next line, or `None` once stdin is closed
    pub(crate) async fn next_line(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}

/// Read stdin on a background task
pub(crate) fn spawn_line_reader() -> LineSource {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Stdin closed");
                    break;
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    LineSource::from_receiver(rx)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Field(usize),
    Camera,
    Switch,
    Photo,
    Attach(Vec<PathBuf>),
    AttachVideo(PathBuf),
    Record,
    Stop,
    Delete(MediaKind, SlotIndex),
    Submit,
    List,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("Comando desconocido: {0} (escriba help)")]
    Unknown(String),

    #[error("Uso: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Usage("help"));
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("start", []) => Command::Start,
            ("field", [n]) => Command::Field(
                n.parse()
                    .ok()
                    .filter(|n| *n < QUESTIONS.len())
                    .ok_or(CommandError::Usage("field <0-3>"))?,
            ),
            ("field", _) => return Err(CommandError::Usage("field <0-3>")),
            ("camera", []) => Command::Camera,
            ("switch", []) => Command::Switch,
            ("photo", []) => Command::Photo,
            ("attach", []) => return Err(CommandError::Usage("attach <rutas..>")),
            ("attach", paths) => Command::Attach(paths.iter().map(PathBuf::from).collect()),
            ("attach-video", [path]) => Command::AttachVideo(PathBuf::from(path)),
            ("attach-video", _) => return Err(CommandError::Usage("attach-video <ruta>")),
            ("record", []) => Command::Record,
            ("stop", []) => Command::Stop,
            ("delete", [kind, n]) => {
                let kind = match kind.to_ascii_lowercase().as_str() {
                    "photo" => MediaKind::Photo,
                    "video" => MediaKind::Video,
                    _ => return Err(CommandError::Usage("delete photo|video <n>")),
                };
                let index = n
                    .parse()
                    .map_err(|_| CommandError::Usage("delete photo|video <n>"))?;
                Command::Delete(kind, index)
            }
            ("delete", _) => return Err(CommandError::Usage("delete photo|video <n>")),
            ("submit", []) => Command::Submit,
            ("list", []) => Command::List,
            ("status", []) => Command::Status,
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Run commands until `quit`, end of input or Ctrl-C at the prompt
pub(crate) async fn run(
    mut controller: FieldReportController,
    lines: LineSource,
) -> anyhow::Result<()> {
    println!("Formulario de informe de campo");
    ConsoleView::print_questions();
    println!("Escriba help para ver los comandos.");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(?command, "Running command");

        let flow = tokio::select! {
            flow = execute(&mut controller, command) => Some(flow),
            _ = tokio::signal::ctrl_c() => None,
        };
        match flow {
            Some(Flow::Continue) => {}
            Some(Flow::Quit) => break,
            None => {
                warn!("Command interrupted");
                println!("Interrumpido.");
                controller.shutdown();
            }
        }
    }

    controller.shutdown();
    info!("Console closed");
    Ok(())
}

async fn execute(controller: &mut FieldReportController, command: Command) -> Flow {
    match command {
        Command::Start => match controller.start_questions().await {
            AskOutcome::Halted { index } => {
                println!("Pregunta {} sin respuesta; escriba start para reintentar.", index)
            }
            AskOutcome::Busy => println!("Hay una grabación en curso."),
            AskOutcome::Finished | AskOutcome::NothingToAsk | AskOutcome::Unsupported => {}
        },
        Command::Field(index) => {
            controller.record_field(index).await;
        }
        Command::Camera => {
            controller.activate_camera().await;
        }
        Command::Switch => {
            controller.switch_camera().await;
        }
        Command::Photo => {
            controller.capture_photo();
        }
        Command::Attach(paths) => {
            let attached = controller.attach_photos(&paths).await;
            info!(count = attached.len(), "Photos attached");
        }
        Command::AttachVideo(path) => {
            controller.attach_video(&path).await;
        }
        Command::Record => {
            controller.start_video();
        }
        Command::Stop => {
            if controller.stop_video().await.is_none() {
                println!("No hay ninguna grabación en curso.");
            }
        }
        Command::Delete(kind, index) => {
            if !controller.delete_media(kind, index) {
                println!("No existe {} {}.", kind, index);
            }
        }
        Command::Submit => {
            if let SubmitOutcome::Rejected { .. } = controller.submit().await {
                info!("Form reloaded after rejected submission");
            }
        }
        Command::List => {
            controller.save_to_list().await;
        }
        Command::Status => print_status(controller),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn print_status(controller: &FieldReportController) {
    let answers = controller.answers();
    for (index, question) in QUESTIONS.iter().enumerate() {
        println!(
            "  [{}] {}: {}",
            index,
            question.prompt,
            answers.get(index).unwrap_or("-")
        );
    }

    let media = controller.media();
    let slots = |kind: MediaKind| {
        media
            .collection(kind)
            .survivors()
            .map(|(index, _)| index.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("  Fotos: [{}]", slots(MediaKind::Photo));
    println!("  Videos: [{}]", slots(MediaKind::Video));

    match media.session() {
        Some(session) => println!(
            "  Cámara: {}{}",
            session.facing(),
            if session.is_relaxed() { " (sin restricción)" } else { "" }
        ),
        None => println!("  Cámara: apagada"),
    }
    println!("  Grabación: {}", controller.recording());
    println!(
        "  Siguiente pregunta: {} · transcripción: {}",
        controller.sequencer().cursor(),
        controller.sequencer().strategy(controller.platform())
    );
    println!("  Página: {}", controller.assembler().page().url());
}
