//! Interactive front-end for handwritten digit recognition.
//!
//! Reads one command per line from stdin: draw strokes on a white canvas,
//! then ask for a prediction. Type `help` for the command list.
//!
//! Usage:
//! ```
//! digit-canvas --model-path models/mnist_model.onnx
//! ```
//!
//! Unlike the server, a missing model is not fatal: the canvas shows an
//! error banner and `reload` retries.

use clap::Parser;
use digit_recognizer::canvas::{CanvasCommand, CanvasSession, DrawingCanvas, HELP};
use digit_recognizer::core::config::AppConfig;
use digit_recognizer::core::constants::{DEFAULT_CANVAS_SIZE, DEFAULT_STROKE_WIDTH, DEFAULT_TOPK};
use digit_recognizer::core::{DigitResult, init_tracing};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Command-line arguments for the drawing canvas
#[derive(Parser)]
#[command(name = "digit-canvas")]
#[command(version, about = "Draw a digit and classify it")]
struct Args {
    /// Path to the ONNX classifier
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// JSON file with `model` and `pipeline` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side length of the square canvas in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    size: u32,

    /// Brush diameter in pixels
    #[arg(long, default_value_t = DEFAULT_STROKE_WIDTH)]
    stroke_width: u32,

    /// Number of ranked digits shown with a prediction
    #[arg(long, default_value_t = DEFAULT_TOPK)]
    topk: usize,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("digit-canvas stopped: {}", e.full_message());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> DigitResult<()> {
    let mut app = match &args.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(model_path) = args.model_path {
        app.model.model_path = model_path;
    }

    let canvas = DrawingCanvas::new(args.size, args.stroke_width)?;
    let mut session = CanvasSession::load(canvas, &app.model, app.pipeline).with_topk(args.topk);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match session.banner() {
        Some(banner) => writeln!(out, "{banner}")?,
        None => writeln!(out, "{}", session.message())?,
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<CanvasCommand>() {
            Ok(command) => command,
            Err(reason) => {
                writeln!(out, "{reason}")?;
                continue;
            }
        };

        match command {
            CanvasCommand::Stroke(points) => session.canvas_mut().stroke(&points),
            CanvasCommand::Predict => writeln!(out, "{}", session.predict())?,
            CanvasCommand::Clear => {
                session.clear();
                writeln!(out, "{}", session.message())?;
            }
            CanvasCommand::Save(path) => match session.canvas().save(&path) {
                Ok(()) => writeln!(out, "saved {}", path.display())?,
                Err(e) => writeln!(out, "could not save: {}", e.full_message())?,
            },
            CanvasCommand::Reload => {
                if session.reload_classifier(&app.model) {
                    writeln!(out, "model loaded")?;
                } else if let Some(banner) = session.banner() {
                    writeln!(out, "{banner}")?;
                }
            }
            CanvasCommand::Help => writeln!(out, "{HELP}")?,
            CanvasCommand::Quit => break,
        }
        out.flush()?;
    }

    info!("Canvas session ended");
    Ok(())
}
