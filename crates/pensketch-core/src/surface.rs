//! The drawable surface the session mutates.
//!
//! A surface stores path-shaped elements, each with a style and a
//! [`PathData`] string, and can answer bounding-box queries about them.
//! [`Canvas`](crate::Canvas) is the in-memory implementation; a browser
//! or GUI host implements this trait over its own scene graph.

use crate::codec::PathData;
use crate::types::{BoundingBox, Point, StrokeId, StrokeStyle, SurfaceError};

/// Collaborator contract for a 2-D vector-path surface.
///
/// All mutation happens from the single active gesture, so
/// implementations need no internal locking. Hosts that share a surface
/// across threads must serialize every call behind one exclusive lock.
pub trait Surface {
    /// Create an empty path element with `style` and return its handle.
    fn add_path(&mut self, style: &StrokeStyle) -> StrokeId;

    /// Replace the path data of `id`.
    ///
    /// Invalidates any cached bounding box for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownStroke`] if `id` does not exist.
    fn set_path_data(&mut self, id: StrokeId, data: PathData) -> Result<(), SurfaceError>;

    /// Current path data of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownStroke`] if `id` does not exist.
    fn path_data(&self, id: StrokeId) -> Result<&PathData, SurfaceError>;

    /// Style of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownStroke`] if `id` does not exist.
    fn style(&self, id: StrokeId) -> Result<&StrokeStyle, SurfaceError>;

    /// Remove `id` from the surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownStroke`] if `id` does not exist.
    fn remove_path(&mut self, id: StrokeId) -> Result<(), SurfaceError>;

    /// Handles whose bounding box intersects `area`, in z-order.
    ///
    /// Paths with no points have no bounding box and are never returned.
    fn query_paths_near(&mut self, area: &BoundingBox) -> Vec<StrokeId>;

    /// Bounding box of `id`, or `None` when its path has no points.
    ///
    /// Implementations may cache the result until the next
    /// [`set_path_data`](Self::set_path_data) for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownStroke`] if `id` does not exist.
    fn bounding_box(&mut self, id: StrokeId) -> Result<Option<BoundingBox>, SurfaceError>;

    /// Show the eraser indicator at a position with a radius, or hide it.
    fn set_eraser_cursor(&mut self, _cursor: Option<(Point, f64)>) {}
}
