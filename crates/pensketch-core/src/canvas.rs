//! In-memory [`Surface`] implementation.
//!
//! Strokes are kept in creation order, which is also their z-order. An
//! R\*-tree over stroke bounding boxes answers
//! [`query_paths_near`](Surface::query_paths_near). Bounding boxes live
//! in an explicit [`BoundsCache`] keyed by [`StrokeId`]; changing a
//! stroke's path data invalidates its entry and marks the stroke stale in
//! the index, which is refreshed lazily on the next query.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, Envelope, RTree, RTreeObject, SelectionFunction};
use serde::{Deserialize, Serialize};

use crate::codec::{PathData, decode};
use crate::hit::hit_test;
use crate::surface::Surface;
use crate::types::{BoundingBox, Point, PointSequence, StrokeId, StrokeStyle, SurfaceError};

/// One committed ink path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    style: StrokeStyle,
    data: PathData,
}

impl Stroke {
    /// The stroke's identifier.
    #[must_use]
    pub const fn id(&self) -> StrokeId {
        self.id
    }

    /// Presentation attributes.
    #[must_use]
    pub const fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Encoded path data.
    #[must_use]
    pub const fn data(&self) -> &PathData {
        &self.data
    }

    /// Decoded points.
    #[must_use]
    pub fn points(&self) -> PointSequence {
        decode(self.data.as_str())
    }
}

/// Memoized bounding boxes keyed by stroke.
///
/// `None` entries record strokes whose path has no points.
#[derive(Debug, Clone, Default)]
pub struct BoundsCache {
    entries: HashMap<StrokeId, Option<BoundingBox>>,
}

impl BoundsCache {
    /// Cached value for `id`, computing and storing it on a miss.
    pub fn get_or_compute(
        &mut self,
        id: StrokeId,
        compute: impl FnOnce() -> Option<BoundingBox>,
    ) -> Option<BoundingBox> {
        *self.entries.entry(id).or_insert_with(compute)
    }

    /// Drop the cached value for `id`.
    pub fn invalidate(&mut self, id: StrokeId) {
        self.entries.remove(&id);
    }

    /// Returns `true` if a value for `id` is cached.
    #[must_use]
    pub fn is_cached(&self, id: StrokeId) -> bool {
        self.entries.contains_key(&id)
    }
}

type IndexEntry = GeomWithData<Rectangle<[f64; 2]>, StrokeId>;

fn index_entry(bbox: &BoundingBox, id: StrokeId) -> IndexEntry {
    GeomWithData::new(
        Rectangle::from_corners([bbox.x, bbox.y], [bbox.max_x(), bbox.max_y()]),
        id,
    )
}

/// Selects index entries whose envelope intersects a query box.
struct IntersectingEnvelope(AABB<[f64; 2]>);

impl SelectionFunction<IndexEntry> for IntersectingEnvelope {
    fn should_unpack_parent(&self, envelope: &AABB<[f64; 2]>) -> bool {
        envelope.intersects(&self.0)
    }

    fn should_unpack_leaf(&self, leaf: &IndexEntry) -> bool {
        leaf.envelope().intersects(&self.0)
    }
}

/// In-memory surface holding strokes in z-order.
#[derive(Debug, Default)]
pub struct Canvas {
    next_id: u64,
    strokes: BTreeMap<StrokeId, Stroke>,
    bounds: BoundsCache,
    index: RTree<IndexEntry>,
    /// Bounding box each stroke is currently indexed under.
    indexed: HashMap<StrokeId, BoundingBox>,
    /// Strokes whose index entry predates their current path data.
    stale: BTreeSet<StrokeId>,
    cursor: Option<(Point, f64)>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` if the canvas holds no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Strokes in z-order (oldest first).
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.values()
    }

    /// Look up one stroke.
    #[must_use]
    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.get(&id)
    }

    /// Current eraser indicator, if shown.
    #[must_use]
    pub const fn eraser_cursor(&self) -> Option<(Point, f64)> {
        self.cursor
    }

    /// The most recently created stroke with a point inside the box of
    /// half-side `tolerance` around `point`.
    pub fn topmost_at(&mut self, point: Point, tolerance: f64) -> Option<StrokeId> {
        let area = BoundingBox::around(point, tolerance);
        self.query_paths_near(&area).into_iter().rev().find(|id| {
            self.strokes
                .get(id)
                .is_some_and(|s| !hit_test(s.points().points(), point, tolerance).is_empty())
        })
    }

    /// Remove the stroke [`topmost_at`](Self::topmost_at) would return.
    ///
    /// Returns the removed stroke, or `None` if nothing was under the
    /// pointer.
    pub fn remove_at(&mut self, point: Point, tolerance: f64) -> Option<Stroke> {
        let id = self.topmost_at(point, tolerance)?;
        let stroke = self.strokes.get(&id).cloned();
        // `id` came from the live stroke map, so removal cannot fail.
        self.remove_path(id).ok()?;
        stroke
    }

    fn unknown(id: StrokeId) -> SurfaceError {
        SurfaceError::UnknownStroke(id)
    }

    fn unindex(&mut self, id: StrokeId) {
        if let Some(bbox) = self.indexed.remove(&id) {
            self.index.remove(&index_entry(&bbox, id));
        }
    }

    /// Bring the index up to date for every stale stroke.
    fn refresh_index(&mut self) {
        for id in std::mem::take(&mut self.stale) {
            self.unindex(id);
            if let Ok(Some(bbox)) = self.bounding_box(id) {
                self.index.insert(index_entry(&bbox, id));
                self.indexed.insert(id, bbox);
            }
        }
    }
}

impl Surface for Canvas {
    fn add_path(&mut self, style: &StrokeStyle) -> StrokeId {
        let id = StrokeId::from_raw(self.next_id);
        self.next_id += 1;
        self.strokes.insert(
            id,
            Stroke {
                id,
                style: style.clone(),
                data: PathData::default(),
            },
        );
        tracing::trace!(%id, "path added");
        id
    }

    fn set_path_data(&mut self, id: StrokeId, data: PathData) -> Result<(), SurfaceError> {
        let stroke = self.strokes.get_mut(&id).ok_or_else(|| Self::unknown(id))?;
        stroke.data = data;
        self.bounds.invalidate(id);
        self.stale.insert(id);
        Ok(())
    }

    fn path_data(&self, id: StrokeId) -> Result<&PathData, SurfaceError> {
        self.strokes
            .get(&id)
            .map(Stroke::data)
            .ok_or_else(|| Self::unknown(id))
    }

    fn style(&self, id: StrokeId) -> Result<&StrokeStyle, SurfaceError> {
        self.strokes
            .get(&id)
            .map(Stroke::style)
            .ok_or_else(|| Self::unknown(id))
    }

    fn remove_path(&mut self, id: StrokeId) -> Result<(), SurfaceError> {
        self.strokes.remove(&id).ok_or_else(|| Self::unknown(id))?;
        self.bounds.invalidate(id);
        self.stale.remove(&id);
        self.unindex(id);
        tracing::trace!(%id, "path removed");
        Ok(())
    }

    fn query_paths_near(&mut self, area: &BoundingBox) -> Vec<StrokeId> {
        self.refresh_index();
        let envelope = AABB::from_corners([area.x, area.y], [area.max_x(), area.max_y()]);
        let mut hits: Vec<StrokeId> = self
            .index
            .locate_with_selection_function(IntersectingEnvelope(envelope))
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }

    fn bounding_box(&mut self, id: StrokeId) -> Result<Option<BoundingBox>, SurfaceError> {
        let stroke = self.strokes.get(&id).ok_or_else(|| Self::unknown(id))?;
        Ok(self
            .bounds
            .get_or_compute(id, || BoundingBox::from_points(stroke.points().points())))
    }

    fn set_eraser_cursor(&mut self, cursor: Option<(Point, f64)>) {
        self.cursor = cursor;
    }
}
