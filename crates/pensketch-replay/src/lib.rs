//! Trace replay and reporting for the `pensketch-replay` binary.
//!
//! A trace is a JSON array of [`PointerEvent`]s. [`run`] feeds it through
//! a fresh [`Session`] over a [`Canvas`] and summarizes what happened in a
//! [`Report`].

use std::fmt::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;

use pensketch_core::{
    Canvas, Completion, ConfigError, PointerEvent, Session, SessionConfig, SessionError,
    ViewTransform,
};

/// Everything that can stop a replay.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The trace file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadTrace {
        /// Trace path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The trace is not a JSON array of pointer events.
    #[error("invalid trace: {0}")]
    ParseTrace(#[source] serde_json::Error),

    /// `--config-json` is not a valid session configuration.
    #[error("invalid --config-json: {0}")]
    ParseConfig(#[source] serde_json::Error),

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session rejected an event.
    #[error("event {index}: {source}")]
    Session {
        /// Zero-based index of the rejected event.
        index: usize,
        /// What the session reported.
        source: SessionError,
    },

    /// The SVG export could not be written.
    #[error("failed to write {}: {source}", path.display())]
    WriteSvg {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Outcome of one gesture, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// A stroke was finalized.
    Drawn {
        /// Stroke id in display form.
        stroke: String,
        /// Points after back-fill.
        points: usize,
    },
    /// An erasing gesture ended.
    Erased {
        /// Pre-existing strokes removed.
        removed: Vec<String>,
        /// Surviving strokes created by splitting.
        created: Vec<String>,
    },
    /// A drawing gesture was discarded.
    Cancelled,
}

impl From<Completion> for GestureOutcome {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Drawn { stroke, points } => Self::Drawn {
                stroke: stroke.to_string(),
                points,
            },
            Completion::Erased(report) => Self::Erased {
                removed: report.removed.iter().map(ToString::to_string).collect(),
                created: report.created.iter().map(ToString::to_string).collect(),
            },
            Completion::Cancelled => Self::Cancelled,
        }
    }
}

/// Summary of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Number of events in the trace.
    pub events: usize,
    /// One entry per gesture, in order.
    pub gestures: Vec<GestureOutcome>,
    /// Strokes on the canvas after the replay.
    pub stroke_count: usize,
    /// Points across all strokes after the replay.
    pub total_points: usize,
    /// Wall-clock replay time.
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

impl Report {
    /// Human-readable multi-line report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Replay\n{}", "=".repeat(60));
        let _ = writeln!(out, "{:<24} {:>12}", "Events", self.events);
        let _ = writeln!(out, "{:<24} {:>12}", "Gestures", self.gestures.len());
        let _ = writeln!(out, "{:<24} {:>12}", "Strokes", self.stroke_count);
        let _ = writeln!(out, "{:<24} {:>12}", "Points", self.total_points);
        let _ = writeln!(
            out,
            "{:<24} {:>10.3}ms",
            "Elapsed",
            self.elapsed.as_secs_f64() * 1000.0
        );
        let _ = writeln!(out);
        for (i, gesture) in self.gestures.iter().enumerate() {
            let line = match gesture {
                GestureOutcome::Drawn { stroke, points } => {
                    format!("drew {stroke} ({points} points)")
                }
                GestureOutcome::Erased { removed, created } => format!(
                    "erased [{}], created [{}]",
                    removed.join(", "),
                    created.join(", ")
                ),
                GestureOutcome::Cancelled => "cancelled".to_owned(),
            };
            let _ = writeln!(out, "{:>4}. {line}", i + 1);
        }
        out
    }
}

/// Parse a trace from JSON text.
///
/// # Errors
///
/// Returns [`ReplayError::ParseTrace`] if `json` is not an array of
/// pointer events.
pub fn parse_trace(json: &str) -> Result<Vec<PointerEvent>, ReplayError> {
    serde_json::from_str(json).map_err(ReplayError::ParseTrace)
}

/// Parse a whole session configuration from JSON text.
///
/// Missing fields take their defaults.
///
/// # Errors
///
/// Returns [`ReplayError::ParseConfig`] if `json` is malformed.
pub fn parse_config(json: &str) -> Result<SessionConfig, ReplayError> {
    serde_json::from_str(json).map_err(ReplayError::ParseConfig)
}

/// Replay `events` on a fresh canvas.
///
/// A gesture still active after the last event is cancelled and
/// reported as such.
///
/// # Errors
///
/// Returns [`ReplayError::Config`] for an invalid configuration and
/// [`ReplayError::Session`] for the first event the session rejects.
pub fn run(
    events: Vec<PointerEvent>,
    config: SessionConfig,
    view: &ViewTransform,
) -> Result<(Report, Canvas), ReplayError> {
    let start = Instant::now();
    let event_count = events.len();
    let mut session = Session::new(Canvas::new(), config)?;
    let mut gestures = Vec::new();

    for (index, event) in events.into_iter().enumerate() {
        let event = PointerEvent::new(event.phase, view.apply(event.sample));
        let done = session
            .handle(event)
            .map_err(|source| ReplayError::Session { index, source })?;
        gestures.extend(done.map(GestureOutcome::from));
    }

    let leftover = session.cancel().map_err(|source| ReplayError::Session {
        index: event_count,
        source,
    })?;
    if let Some(done) = leftover {
        tracing::warn!("trace ended mid-gesture; gesture cancelled");
        gestures.push(done.into());
    }

    let canvas = session.into_surface();
    let total_points = canvas.strokes().map(|s| s.points().len()).sum();
    let report = Report {
        events: event_count,
        gestures,
        stroke_count: canvas.len(),
        total_points,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        strokes = report.stroke_count,
        points = report.total_points,
        "replay finished"
    );
    Ok((report, canvas))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = GestureOutcome::Drawn {
            stroke: "000000000".to_owned(),
            points: 4,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"outcome":"drawn","stroke":"000000000","points":4}"#
        );
    }

    #[test]
    fn report_renders_each_gesture() {
        let report = Report {
            events: 6,
            gestures: vec![
                GestureOutcome::Drawn {
                    stroke: "000000000".to_owned(),
                    points: 3,
                },
                GestureOutcome::Erased {
                    removed: vec!["000000000".to_owned()],
                    created: vec![],
                },
            ],
            stroke_count: 0,
            total_points: 0,
            elapsed: Duration::from_millis(2),
        };
        let text = report.render();
        assert!(text.contains("1. drew 000000000 (3 points)"));
        assert!(text.contains("2. erased [000000000], created []"));
    }

    #[test]
    fn garbage_trace_is_rejected() {
        assert!(matches!(
            parse_trace("{not json"),
            Err(ReplayError::ParseTrace(_))
        ));
    }

    #[test]
    fn partial_config_json_uses_defaults() {
        let config = parse_config(r#"{"eraser_mode":"pixel"}"#).unwrap();
        assert_eq!(config.eraser_mode, pensketch_core::EraserMode::Pixel);
        assert!((config.min_dist - SessionConfig::DEFAULT_MIN_DIST).abs() < f64::EPSILON);
    }
}
