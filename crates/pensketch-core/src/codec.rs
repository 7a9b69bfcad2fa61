//! Path codec: convert point sequences to and from path-description
//! strings.
//!
//! The grammar is a small subset of SVG path data. The first point is
//! written with the move marker `M`, every later point with the line
//! marker `L`, and each marker is followed by `x y` separated by a single
//! space:
//!
//! ```text
//! M0 0 L5 5 L10 10
//! ```
//!
//! Coordinates use Rust's shortest round-trip float formatting, so
//! `decode(encode(s)) == s` holds exactly for finite points.
//!
//! The decoder also recognizes the curve marker `C`, reserved for future
//! smoothing. A `C` segment must carry exactly one coordinate pair and is
//! read like a line; a full cubic segment is malformed.
//!
//! # Malformed data
//!
//! [`try_decode`] fails fast on the first malformed segment. [`decode`]
//! logs a warning and skips it, keeping the well-formed points; it never
//! yields NaN or infinite coordinates. All surface data is produced by
//! [`encode`], so a malformed segment is a defect that degrades one
//! point rather than the whole stroke.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::types::{Point, PointSequence};

/// Move marker (first point).
pub const MOVE: char = 'M';
/// Line marker (every later point).
pub const LINE: char = 'L';
/// Curve marker, decoded like a line.
pub const CURVE: char = 'C';

/// Serialized path description produced by [`encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathData(String);

impl PathData {
    /// Wrap an existing path string.
    ///
    /// The string is not validated; decoding reports problems.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// The path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode leniently. See [`decode`].
    #[must_use]
    pub fn points(&self) -> PointSequence {
        decode(&self.0)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PathData {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A path string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathDataError {
    /// Non-whitespace text appeared before the first marker.
    #[error("path data does not start with a marker: {0:?}")]
    MissingMarker(String),

    /// A segment did not contain exactly two coordinates.
    #[error("segment {segment} has {found} coordinate tokens, expected 2")]
    TokenCount {
        /// Zero-based segment index.
        segment: usize,
        /// Number of whitespace-separated tokens found.
        found: usize,
    },

    /// A coordinate token is not a finite number.
    #[error("segment {segment} has invalid coordinate {token:?}")]
    InvalidNumber {
        /// Zero-based segment index.
        segment: usize,
        /// The offending token.
        token: String,
    },
}

/// Encode points as a path string.
///
/// An empty slice yields an empty string.
///
/// # Examples
///
/// ```
/// use pensketch_core::Point;
/// use pensketch_core::codec::encode;
///
/// let d = encode(&[Point::new(0.0, 0.0), Point::new(5.5, 10.0)]);
/// assert_eq!(d.as_str(), "M0 0 L5.5 10");
/// ```
#[must_use]
pub fn encode(points: &[Point]) -> PathData {
    let mut out = String::with_capacity(points.len() * 12);
    for (i, p) in points.iter().enumerate() {
        let marker = if i == 0 { MOVE } else { LINE };
        // Writing to a String cannot fail.
        let _ = write!(out, "{marker}{} {} ", p.x, p.y);
    }
    out.truncate(out.trim_end().len());
    PathData(out)
}

/// Decode a path string, skipping malformed segments.
///
/// Each skipped segment is reported with `tracing::warn!`. The empty
/// string decodes to an empty sequence.
#[must_use]
pub fn decode(path: &str) -> PointSequence {
    let mut points = Vec::new();
    for result in segments(path) {
        match result {
            Ok(p) => points.push(p),
            Err(err) => tracing::warn!(%err, "skipping malformed path segment"),
        }
    }
    PointSequence::new(points)
}

/// Decode a path string, failing on the first malformed segment.
///
/// # Errors
///
/// Returns [`PathDataError`] describing the first segment that is not a
/// marker followed by exactly two finite numbers.
pub fn try_decode(path: &str) -> Result<PointSequence, PathDataError> {
    segments(path).collect::<Result<Vec<_>, _>>().map(PointSequence::new)
}

const fn is_marker(c: char) -> bool {
    matches!(c, MOVE | LINE | CURVE)
}

/// Split `path` at marker boundaries and parse each segment.
fn segments(path: &str) -> impl Iterator<Item = Result<Point, PathDataError>> + '_ {
    let first_marker = path.find(is_marker).unwrap_or(path.len());
    let prefix = path[..first_marker].trim();
    let leading = (!prefix.is_empty()).then(|| Err(PathDataError::MissingMarker(prefix.to_owned())));

    let body = &path[first_marker..];
    let starts: Vec<usize> = body
        .char_indices()
        .filter(|&(_, c)| is_marker(c))
        .map(|(i, _)| i)
        .collect();
    let bounds: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| (start, starts.get(n + 1).copied().unwrap_or(body.len())))
        .collect();

    leading.into_iter().chain(
        bounds
            .into_iter()
            .enumerate()
            // Skip the one-byte ASCII marker.
            .map(move |(segment, (start, end))| parse_segment(segment, &body[start + 1..end])),
    )
}

fn parse_segment(segment: usize, text: &str) -> Result<Point, PathDataError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [x, y] = tokens.as_slice() else {
        return Err(PathDataError::TokenCount {
            segment,
            found: tokens.len(),
        });
    };
    Ok(Point::new(parse_coord(segment, x)?, parse_coord(segment, y)?))
}

fn parse_coord(segment: usize, token: &str) -> Result<f64, PathDataError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PathDataError::InvalidNumber {
            segment,
            token: token.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn encode_empty_is_empty_string() {
        assert_eq!(encode(&[]).as_str(), "");
    }

    #[test]
    fn decode_empty_is_empty_sequence() {
        assert!(decode("").is_empty());
        assert!(try_decode("").unwrap().is_empty());
    }

    #[test]
    fn encode_single_point() {
        assert_eq!(encode(&pts(&[(3.0, 4.0)])).as_str(), "M3 4");
    }

    #[test]
    fn encode_uses_move_then_line() {
        let d = encode(&pts(&[(0.0, 0.0), (5.0, 5.0), (10.0, -2.5)]));
        assert_eq!(d.as_str(), "M0 0 L5 5 L10 -2.5");
    }

    #[test]
    fn round_trip_preserves_points_exactly() {
        let original = pts(&[
            (0.1, 0.2),
            (1.0 / 3.0, -7.25),
            (1e-9, 123_456.789),
            (-0.0, 42.0),
            (5.0, 5.0),
            (5.0, 5.0),
        ]);
        let decoded = decode(encode(&original).as_str());
        assert_eq!(decoded.points(), original.as_slice());
    }

    #[test]
    fn decode_accepts_curve_marker_like_line() {
        let decoded = try_decode("M0 0 C1 2 L3 4").unwrap();
        assert_eq!(decoded.points(), pts(&[(0.0, 0.0), (1.0, 2.0), (3.0, 4.0)]));
    }

    #[test]
    fn full_cubic_segment_is_malformed() {
        assert_eq!(
            try_decode("M0 0 C1 1 2 2 3 3").unwrap_err(),
            PathDataError::TokenCount {
                segment: 1,
                found: 6
            }
        );
        assert_eq!(decode("M0 0 C1 1 2 2 3 3").points(), pts(&[(0.0, 0.0)]));
    }

    #[test]
    fn decode_tolerates_extra_whitespace() {
        let decoded = try_decode("  M 1   2   L3\t4  ").unwrap();
        assert_eq!(decoded.points(), pts(&[(1.0, 2.0), (3.0, 4.0)]));
    }

    #[test]
    fn decode_skips_wrong_token_count() {
        let decoded = decode("M0 0 L1 L2 2 L3 3 3");
        assert_eq!(decoded.points(), pts(&[(0.0, 0.0), (2.0, 2.0)]));
    }

    #[test]
    fn try_decode_reports_wrong_token_count() {
        let err = try_decode("M0 0 L1").unwrap_err();
        assert_eq!(
            err,
            PathDataError::TokenCount {
                segment: 1,
                found: 1
            }
        );
    }

    #[test]
    fn decode_never_produces_non_finite_points() {
        let decoded = decode("M0 0 LNaN 1 Linf 2 L3 x L4 4");
        assert_eq!(decoded.points(), pts(&[(0.0, 0.0), (4.0, 4.0)]));
        assert!(decoded.points().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn try_decode_reports_invalid_number() {
        let err = try_decode("M0 0 L3 x").unwrap_err();
        assert!(matches!(
            err,
            PathDataError::InvalidNumber { segment: 1, ref token } if token == "x"
        ));
    }

    #[test]
    fn text_before_first_marker_is_malformed() {
        assert!(matches!(
            try_decode("1 2 M3 4"),
            Err(PathDataError::MissingMarker(_))
        ));
        assert_eq!(decode("1 2 M3 4").points(), pts(&[(3.0, 4.0)]));
    }

    #[test]
    fn path_data_points_decodes() {
        let data = encode(&pts(&[(1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(data.points().len(), 2);
        assert_eq!(data.to_string(), "M1 1 L2 2");
    }
}
