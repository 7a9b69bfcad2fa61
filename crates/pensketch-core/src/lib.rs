//! pensketch-core: Freehand stroke capture and erasing (sans-IO).
//!
//! Turns a stream of pointer samples into vector strokes on a drawable
//! surface:
//! temporal interpolation -> spatial decimation -> live path encoding ->
//! back-fill on release. A second gesture mode erases strokes, either
//! whole (object mode) or point by point (pixel mode).
//!
//! This crate has **no I/O dependencies**. The drawable surface is the
//! [`Surface`] trait; [`Canvas`] is the in-memory implementation used by
//! the export and replay crates.

pub mod canvas;
pub mod codec;
pub mod erase;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod sampler;
pub mod session;
pub mod surface;
pub mod types;

pub use canvas::{BoundsCache, Canvas, Stroke};
pub use codec::{PathData, PathDataError};
pub use erase::{EraseDelta, EraseStrategy, Eraser};
pub use input::{Button, PointerEvent, PointerKind, PointerPhase, PointerSample, ViewTransform};
pub use session::{
    Completion, EraseReport, GestureObserver, NoopObserver, Session, SessionState,
};
pub use surface::Surface;
pub use types::{
    BoundingBox, ConfigError, EraserMode, Point, PointSequence, SessionConfig, SessionError,
    StrokeId, StrokeStyle, SurfaceError,
};

