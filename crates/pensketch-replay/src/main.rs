//! pensketch-replay: CLI tool that replays recorded pointer traces.
//!
//! Feeds a JSON trace of pointer events through a drawing session with
//! configurable parameters and reports the resulting strokes. Useful for:
//!
//! - Reproducing drawing and erasing behavior from a captured trace
//! - Tuning decimation, interpolation and eraser parameters
//! - Exporting the resulting canvas to SVG
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin pensketch-replay -- [OPTIONS] <TRACE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pensketch_core::{EraserMode, SessionConfig, StrokeStyle, ViewTransform};
use pensketch_replay::{ReplayError, Report};
use tracing_subscriber::EnvFilter;

/// Replay a recorded pointer trace through a pensketch drawing session.
///
/// The trace is a JSON array of pointer events in client coordinates.
#[derive(Parser)]
#[command(name = "pensketch-replay", version)]
struct Cli {
    /// Path to the JSON trace.
    trace_path: PathBuf,

    /// Minimum distance between committed stroke points.
    #[arg(long, default_value_t = SessionConfig::DEFAULT_MIN_DIST)]
    min_dist: f64,

    /// Temporal interpolation threshold (trace timestamp units).
    #[arg(long, default_value_t = SessionConfig::DEFAULT_MAX_TIME_DELTA)]
    max_time_delta: f64,

    /// Erase strategy.
    #[arg(long, value_enum, default_value_t = Mode::Object)]
    eraser_mode: Mode,

    /// Half the side of the square erase area.
    #[arg(long, default_value_t = SessionConfig::DEFAULT_ERASER_RADIUS)]
    eraser_radius: f64,

    /// Minimum distance between recorded eraser positions.
    #[arg(long, default_value_t = SessionConfig::DEFAULT_ERASER_MIN_DIST)]
    eraser_min_dist: f64,

    /// Treat every contact as the eraser.
    #[arg(long)]
    force_eraser: bool,

    /// Stroke color of drawn paths.
    #[arg(long, default_value = "red")]
    stroke_color: String,

    /// Stroke width of drawn paths.
    #[arg(long, default_value = "1px")]
    stroke_width: String,

    /// Full session config as a JSON string.
    ///
    /// When provided, all other session parameter flags are ignored.
    /// Missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// View scale applied to client coordinates.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Horizontal scroll offset added to client coordinates.
    #[arg(long, default_value_t = 0.0)]
    scroll_x: f64,

    /// Vertical scroll offset added to client coordinates.
    #[arg(long, default_value_t = 0.0)]
    scroll_y: f64,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Output the report as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Log per-gesture and per-sample decisions (overridden by `RUST_LOG`).
    #[arg(long, short)]
    verbose: bool,
}

/// Eraser mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Remove whole strokes under the eraser.
    Object,
    /// Remove only the points under the eraser, splitting strokes.
    Pixel,
}

/// Build a [`SessionConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<SessionConfig, ReplayError> {
    if let Some(ref json) = cli.config_json {
        return pensketch_replay::parse_config(json);
    }

    Ok(SessionConfig {
        min_dist: cli.min_dist,
        max_time_delta: cli.max_time_delta,
        eraser_mode: match cli.eraser_mode {
            Mode::Object => EraserMode::Object,
            Mode::Pixel => EraserMode::Pixel,
        },
        eraser_radius: cli.eraser_radius,
        eraser_min_dist: cli.eraser_min_dist,
        force_eraser: cli.force_eraser,
        stroke_style: StrokeStyle::default()
            .with("stroke", cli.stroke_color.as_str())
            .with("stroke-width", cli.stroke_width.as_str()),
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<Report, ReplayError> {
    let config = config_from_cli(cli)?;
    let view = ViewTransform::new(cli.scroll_x, cli.scroll_y, cli.scale)?;

    let text = std::fs::read_to_string(&cli.trace_path).map_err(|source| {
        ReplayError::ReadTrace {
            path: cli.trace_path.clone(),
            source,
        }
    })?;
    let events = pensketch_replay::parse_trace(&text)?;
    eprintln!(
        "Trace: {} ({} events)",
        cli.trace_path.display(),
        events.len()
    );

    let config_json = serde_json::to_string(&config).ok();
    let (report, canvas) = pensketch_replay::run(events, config, &view)?;

    if let Some(ref svg_path) = cli.svg {
        let title = cli
            .trace_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("replay");
        let metadata = pensketch_export::SvgMetadata {
            title: Some(title),
            description: Some("Replayed by pensketch-replay"),
            config_json: config_json.as_deref(),
        };
        let dims = pensketch_export::canvas_dimensions(canvas.strokes());
        let svg = pensketch_export::to_svg(canvas.strokes(), dims, &metadata);
        std::fs::write(svg_path, &svg).map_err(|source| ReplayError::WriteSvg {
            path: svg_path.clone(),
            source,
        })?;
        eprintln!("SVG written to {} ({} bytes)", svg_path.display(), svg.len());
    }

    Ok(report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report.render());
    }

    ExitCode::SUCCESS
}
