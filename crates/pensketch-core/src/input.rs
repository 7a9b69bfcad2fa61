//! Pointer samples as delivered by the input source.
//!
//! Samples are already projected into surface-local coordinates.
//! [`ViewTransform`] performs that projection for sources that report
//! client coordinates.

use serde::{Deserialize, Serialize};

use crate::geometry::lerp;
use crate::types::{ConfigError, Point};

/// Kind of device that produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Stylus or pen.
    #[default]
    Pen,
    /// Finger on a touch screen. Reserved for scrolling and gestures;
    /// never contributes ink.
    Touch,
    /// Mouse or trackpad.
    Mouse,
}

/// Button or contact code, using the DOM `PointerEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Button(pub i16);

impl Button {
    /// Left mouse button or pen tip.
    pub const PRIMARY: Self = Self(0);
    /// Right mouse button or pen barrel button.
    pub const SECONDARY: Self = Self(2);
    /// Pen eraser end.
    pub const ERASER: Self = Self(5);

    /// Returns `true` for the primary button (pen tip).
    #[must_use]
    pub const fn is_primary(self) -> bool {
        self.0 == Self::PRIMARY.0
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::PRIMARY
    }
}

/// One raw pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Horizontal position, surface-local.
    pub x: f64,
    /// Vertical position, surface-local.
    pub y: f64,
    /// Device kind.
    #[serde(default)]
    pub pointer_kind: PointerKind,
    /// Button or contact code.
    #[serde(default)]
    pub button: Button,
    /// Monotonically increasing timestamp (milliseconds for DOM input).
    pub timestamp: f64,
    /// Normalized pressure in `[0, 1]`.
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    /// Tilt along the x axis in degrees.
    #[serde(default)]
    pub tilt_x: f64,
    /// Tilt along the y axis in degrees.
    #[serde(default)]
    pub tilt_y: f64,
}

const fn default_pressure() -> f64 {
    PointerSample::DEFAULT_PRESSURE
}

impl PointerSample {
    /// Pressure reported by devices without pressure sensing.
    pub const DEFAULT_PRESSURE: f64 = 0.5;

    /// A pen-tip sample at `(x, y)` with default pressure and no tilt.
    #[must_use]
    pub const fn pen(x: f64, y: f64, timestamp: f64) -> Self {
        Self {
            x,
            y,
            pointer_kind: PointerKind::Pen,
            button: Button::PRIMARY,
            timestamp,
            pressure: Self::DEFAULT_PRESSURE,
            tilt_x: 0.0,
            tilt_y: 0.0,
        }
    }

    /// Builder-style pointer kind override.
    #[must_use]
    pub const fn with_kind(mut self, pointer_kind: PointerKind) -> Self {
        self.pointer_kind = pointer_kind;
        self
    }

    /// Builder-style button override.
    #[must_use]
    pub const fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    /// The sample position.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns `true` if this sample may contribute ink.
    #[must_use]
    pub fn draws_ink(&self) -> bool {
        self.pointer_kind != PointerKind::Touch
    }

    /// Interpolate every numeric field between `a` and `b`.
    ///
    /// `t` is clamped to `[0, 1]`. Kind and button are taken from `b`.
    #[must_use]
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            pointer_kind: b.pointer_kind,
            button: b.button,
            timestamp: lerp(a.timestamp, b.timestamp, t),
            pressure: lerp(a.pressure, b.pressure, t),
            tilt_x: lerp(a.tilt_x, b.tilt_x, t),
            tilt_y: lerp(a.tilt_y, b.tilt_y, t),
        }
    }
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Contact started.
    Down,
    /// Contact moved.
    Move,
    /// Contact lifted.
    Up,
    /// Pointer left the surface.
    Leave,
    /// The platform cancelled the contact.
    Cancel,
}

/// A sample tagged with its phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Which lifecycle transition this is.
    pub phase: PointerPhase,
    /// The sample itself.
    #[serde(flatten)]
    pub sample: PointerSample,
}

impl PointerEvent {
    /// Create a new event.
    #[must_use]
    pub const fn new(phase: PointerPhase, sample: PointerSample) -> Self {
        Self { phase, sample }
    }
}

/// Projection from client coordinates to surface-local coordinates.
///
/// Compensates for scroll offset and a single uniform scale factor:
/// `surface = (client + scroll) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    scroll_x: f64,
    scroll_y: f64,
    scale: f64,
}

impl ViewTransform {
    /// The identity projection.
    pub const IDENTITY: Self = Self {
        scroll_x: 0.0,
        scroll_y: 0.0,
        scale: 1.0,
    };

    /// Create a projection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] if `scale` is not finite and
    /// positive.
    pub fn new(scroll_x: f64, scroll_y: f64, scale: f64) -> Result<Self, ConfigError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "scale",
                value: scale,
            });
        }
        Ok(Self {
            scroll_x,
            scroll_y,
            scale,
        })
    }

    /// Project a client-space position.
    #[must_use]
    pub fn project(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(
            (client_x + self.scroll_x) / self.scale,
            (client_y + self.scroll_y) / self.scale,
        )
    }

    /// Project a sample whose `x`/`y` are in client space.
    #[must_use]
    pub fn apply(&self, sample: PointerSample) -> PointerSample {
        let p = self.project(sample.x, sample.y);
        PointerSample {
            x: p.x,
            y: p.y,
            ..sample
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
