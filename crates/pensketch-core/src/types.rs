//! Shared types for pensketch drawing and erasing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (surface units from the left edge).
    pub x: f64,
    /// Vertical position (surface units from the top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        crate::geometry::distance(self, other)
    }

    /// Point at parameter `t` along the segment from `self` to `other`.
    ///
    /// `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            crate::geometry::lerp(self.x, other.x, t),
            crate::geometry::lerp(self.y, other.y, t),
        )
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An ordered sequence of points in drawing order.
///
/// Duplicates and zero-length segments are legal (if degenerate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSequence(Vec<Point>);

impl PointSequence {
    /// Create a new sequence from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the sequence has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the sequence.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Append a point to the end of the sequence.
    pub fn push(&mut self, point: Point) {
        self.0.push(point);
    }

    /// Consumes the sequence and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for PointSequence {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for PointSequence {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Axis-aligned bounding box in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent (never negative).
    pub width: f64,
    /// Vertical extent (never negative).
    pub height: f64,
}

impl BoundingBox {
    /// Create a bounding box from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    ///
    /// A single point yields a zero-sized box.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Square of side `2 * radius` centered at `center`.
    #[must_use]
    pub fn around(center: Point, radius: f64) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            2.0 * radius,
            2.0 * radius,
        )
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` if the boxes overlap. Touching edges count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Returns `true` if `point` lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.x..=self.max_x()).contains(&point.x) && (self.y..=self.max_y()).contains(&point.y)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.max_x().max(other.max_x()) - x,
            self.max_y().max(other.max_y()) - y,
        )
    }
}

/// Opaque identifier of a stroke on a surface.
///
/// Identifiers come from a per-surface monotonic counter, so two strokes
/// on the same surface never collide. The display form is nine base-32
/// digits (`0-9a-v`), which covers 2^45 strokes before wrapping width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrokeId(u64);

impl StrokeId {
    /// Number of base-32 digits in the display form.
    pub const DISPLAY_WIDTH: usize = 9;

    /// Wrap a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
        let mut buf = [b'0'; 13];
        let mut n = self.0;
        let mut start = buf.len();
        while n > 0 {
            start -= 1;
            #[allow(clippy::cast_possible_truncation)]
            let digit = (n % 32) as usize;
            buf[start] = DIGITS[digit];
            n /= 32;
        }
        let start = start.min(buf.len() - Self::DISPLAY_WIDTH);
        // All bytes come from DIGITS, so the slice is ASCII.
        f.write_str(std::str::from_utf8(&buf[start..]).map_err(|_| fmt::Error)?)
    }
}

/// Presentation attributes carried by a stroke.
///
/// A plain attribute-name to value mapping. The surface decides how to
/// render them; the core only copies them from a stroke to the strokes
/// that replace it after a pixel-mode erase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeStyle(BTreeMap<String, String>);

impl StrokeStyle {
    /// Default stroke colour.
    pub const DEFAULT_STROKE: &'static str = "red";
    /// Default stroke width.
    pub const DEFAULT_STROKE_WIDTH: &'static str = "1px";

    /// A style with no attributes.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set (or replace) an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::empty()
            .with("stroke", Self::DEFAULT_STROKE)
            .with("stroke-width", Self::DEFAULT_STROKE_WIDTH)
            .with("fill", "none")
    }
}

/// Eraser strategy named by the configuration.
///
/// Unrecognized names deserialize to [`Unsupported`](Self::Unsupported)
/// rather than failing, so a bad eraser setting disables erasing
/// instead of rejecting the whole configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraserMode {
    /// Remove every stroke whose bounding box touches the eraser square.
    #[default]
    Object,
    /// Remove only the points under the eraser, splitting strokes.
    Pixel,
    /// Any other configured name.
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for EraserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::Pixel => "pixel",
            Self::Unsupported => "unsupported",
        })
    }
}

/// Construction-time session configuration.
///
/// Immutable for the lifetime of a [`Session`](crate::Session). Call
/// [`validate`](Self::validate) (done by `Session::new`) before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum distance between committed drawing points. Samples closer
    /// than this to the last committed point are dropped.
    pub min_dist: f64,

    /// Temporal interpolation threshold in timestamp units (milliseconds
    /// for DOM pointer events). Gaps longer than twice this value are
    /// filled with synthetic samples.
    pub max_time_delta: f64,

    /// Which erase strategy to use.
    pub eraser_mode: EraserMode,

    /// Half the side of the square erase area.
    pub eraser_radius: f64,

    /// Minimum distance between recorded eraser positions.
    pub eraser_min_dist: f64,

    /// Treat every contact as the eraser regardless of button.
    pub force_eraser: bool,

    /// Style given to newly drawn strokes.
    pub stroke_style: StrokeStyle,
}

impl SessionConfig {
    /// Default spatial decimation threshold.
    pub const DEFAULT_MIN_DIST: f64 = 3.0;
    /// Default temporal interpolation threshold.
    pub const DEFAULT_MAX_TIME_DELTA: f64 = 16.0;
    /// Default eraser radius.
    pub const DEFAULT_ERASER_RADIUS: f64 = 8.0;
    /// Default eraser decimation threshold.
    pub const DEFAULT_ERASER_MIN_DIST: f64 = 2.0;

    /// Check the numeric invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_dist", self.min_dist)?;
        positive("max_time_delta", self.max_time_delta)?;
        positive("eraser_radius", self.eraser_radius)?;
        if !self.eraser_min_dist.is_finite() || self.eraser_min_dist < 0.0 {
            return Err(ConfigError::Negative {
                field: "eraser_min_dist",
                value: self.eraser_min_dist,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_dist: Self::DEFAULT_MIN_DIST,
            max_time_delta: Self::DEFAULT_MAX_TIME_DELTA,
            eraser_mode: EraserMode::default(),
            eraser_radius: Self::DEFAULT_ERASER_RADIUS,
            eraser_min_dist: Self::DEFAULT_ERASER_MIN_DIST,
            force_eraser: false,
            stroke_style: StrokeStyle::default(),
        }
    }
}

/// Invalid construction-time configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A field that must be finite and strictly positive is not.
    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A field that must be finite and non-negative is not.
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// A surface operation referred to a stroke it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// No stroke with this identifier exists on the surface.
    #[error("no stroke with id {0}")]
    UnknownStroke(StrokeId),
}

/// Errors raised while driving a gesture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The surface rejected an operation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A pointer-down arrived while another gesture was still active.
    #[error("a gesture is already in progress")]
    GestureInProgress,
}
