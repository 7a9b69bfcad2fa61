//! Erase strategies: whole-stroke and point-level removal.
//!
//! This module defines the [`EraseStrategy`] trait and the [`Eraser`]
//! enum that implements it. The session resolves the configured
//! [`EraserMode`](crate::EraserMode) to an [`Eraser`] once at
//! construction, so no per-sample mode lookup happens.
//!
//! Both strategies start from the same coarse pre-filter: the surface's
//! bounding-box query against the square of side `2 * radius` around the
//! eraser position.

use crate::codec::{decode, encode};
use crate::hit::hit_test;
use crate::surface::Surface;
use crate::types::{BoundingBox, Point, PointSequence, StrokeId, SurfaceError};

/// Shortest sub-run kept after a pixel-mode split.
///
/// Two points still draw a visible segment; a lone point does not.
pub const MIN_RUN_POINTS: usize = 2;

/// Concrete erase strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eraser {
    /// Remove every stroke whose bounding box overlaps the eraser square.
    ///
    /// Path geometry is not consulted, so a stroke whose box overlaps
    /// but whose ink never comes near the eraser is still removed. This
    /// over-erasure is accepted for speed.
    Object,
    /// Remove only the points inside the eraser square and split each
    /// touched stroke into the surviving runs.
    Pixel,
}

/// Strokes changed by one erase step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraseDelta {
    /// Strokes taken off the surface.
    pub removed: Vec<StrokeId>,
    /// Strokes added in their place (pixel mode only).
    pub created: Vec<StrokeId>,
}

impl EraseDelta {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.created.is_empty()
    }

    /// Every handle touched, removed first.
    #[must_use]
    pub fn affected(&self) -> Vec<StrokeId> {
        self.removed.iter().chain(&self.created).copied().collect()
    }
}

/// Trait for erase strategies.
pub trait EraseStrategy {
    /// Erase around `center` on `surface`.
    ///
    /// # Errors
    ///
    /// Propagates [`SurfaceError`] if the surface loses track of a stroke
    /// it just reported.
    fn erase_at<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        center: Point,
        radius: f64,
    ) -> Result<EraseDelta, SurfaceError>;
}

impl EraseStrategy for Eraser {
    fn erase_at<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        center: Point,
        radius: f64,
    ) -> Result<EraseDelta, SurfaceError> {
        match *self {
            Self::Object => erase_objects(surface, center, radius),
            Self::Pixel => erase_points(surface, center, radius),
        }
    }
}

fn erase_objects<S: Surface + ?Sized>(
    surface: &mut S,
    center: Point,
    radius: f64,
) -> Result<EraseDelta, SurfaceError> {
    let area = BoundingBox::around(center, radius);
    let mut delta = EraseDelta::default();
    for id in surface.query_paths_near(&area) {
        let overlaps = surface
            .bounding_box(id)?
            .is_some_and(|bbox| bbox.intersects(&area));
        if overlaps {
            surface.remove_path(id)?;
            delta.removed.push(id);
        }
    }
    if !delta.is_empty() {
        tracing::debug!(removed = delta.removed.len(), "object erase");
    }
    Ok(delta)
}

fn erase_points<S: Surface + ?Sized>(
    surface: &mut S,
    center: Point,
    radius: f64,
) -> Result<EraseDelta, SurfaceError> {
    let area = BoundingBox::around(center, radius);
    let mut delta = EraseDelta::default();
    for id in surface.query_paths_near(&area) {
        let points = decode(surface.path_data(id)?.as_str());
        let hits = hit_test(points.points(), center, radius);
        if hits.is_empty() {
            continue;
        }

        let runs = split_at_hits(points.points(), &hits);
        tracing::debug!(%id, hits = hits.len(), pieces = runs.len(), "pixel erase split stroke");
        let style = surface.style(id)?.clone();
        // Remove before inserting so the original and its pieces are
        // never visible together.
        surface.remove_path(id)?;
        delta.removed.push(id);
        for run in runs {
            let child = surface.add_path(&style);
            surface.set_path_data(child, encode(run.points()))?;
            delta.created.push(child);
        }
    }
    Ok(delta)
}

/// Split `points` into the runs that survive erasing the points at
/// `hits`.
///
/// `hits` must be ascending (as returned by
/// [`hit_test`]). The candidate runs are the points before the first
/// hit, the points strictly between each pair of consecutive hits, and
/// the points after the last hit. Runs shorter than [`MIN_RUN_POINTS`]
/// are dropped. With no hits the whole sequence is one run.
///
/// # Examples
///
/// ```
/// use pensketch_core::Point;
/// use pensketch_core::erase::split_at_hits;
///
/// let points: Vec<Point> = (0..5).map(|i| Point::new(5.0 * f64::from(i), 5.0 * f64::from(i))).collect();
/// let runs = split_at_hits(&points, &[2]);
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs[0].points(), &points[..2]);
/// assert_eq!(runs[1].points(), &points[3..]);
/// ```
#[must_use]
pub fn split_at_hits(points: &[Point], hits: &[usize]) -> Vec<PointSequence> {
    let mut runs = Vec::with_capacity(hits.len() + 1);
    let mut start = 0;
    for &hit in hits {
        if hit > start {
            runs.push(&points[start..hit.min(points.len())]);
        }
        start = start.max(hit + 1);
    }
    if start < points.len() {
        runs.push(&points[start..]);
    }
    runs.into_iter()
        .filter(|run| run.len() >= MIN_RUN_POINTS)
        .map(|run| PointSequence::new(run.to_vec()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::types::StrokeStyle;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn diagonal() -> Vec<Point> {
        pts(&[
            (0.0, 0.0),
            (5.0, 5.0),
            (10.0, 10.0),
            (15.0, 15.0),
            (20.0, 20.0),
        ])
    }

    fn add(canvas: &mut Canvas, points: &[Point], style: &StrokeStyle) -> StrokeId {
        let id = canvas.add_path(style);
        canvas.set_path_data(id, encode(points)).unwrap();
        id
    }

    // --- split_at_hits ---

    #[test]
    fn middle_hit_keeps_two_point_runs() {
        let points = diagonal();
        let runs = split_at_hits(&points, &[2]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].points(), pts(&[(0.0, 0.0), (5.0, 5.0)]).as_slice());
        assert_eq!(runs[1].points(), pts(&[(15.0, 15.0), (20.0, 20.0)]).as_slice());
    }

    #[test]
    fn single_point_runs_dropped() {
        let points = diagonal();
        // Leaves [0] before, [2] between, [4] after: all too short.
        assert!(split_at_hits(&points, &[1, 3]).is_empty());
    }

    #[test]
    fn adjacent_hits_produce_no_empty_gap_run() {
        let points = diagonal();
        let runs = split_at_hits(&points, &[2, 3]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].points(), &points[..2]);
    }

    #[test]
    fn gap_between_hits_survives_when_long_enough() {
        let points: Vec<Point> = (0..8).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let runs = split_at_hits(&points, &[0, 4, 7]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].points(), &points[1..4]);
        assert_eq!(runs[1].points(), &points[5..7]);
    }

    #[test]
    fn every_point_hit_leaves_nothing() {
        let points = diagonal();
        assert!(split_at_hits(&points, &[0, 1, 2, 3, 4]).is_empty());
    }

    #[test]
    fn no_hits_keeps_whole_sequence() {
        let points = diagonal();
        let runs = split_at_hits(&points, &[]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].points(), points.as_slice());
    }

    #[test]
    fn endpoint_hits_trim_ends() {
        let points = diagonal();
        let runs = split_at_hits(&points, &[0, 4]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].points(), &points[1..4]);
    }

    // --- Object mode ---

    #[test]
    fn object_mode_removes_on_box_overlap() {
        let mut canvas = Canvas::new();
        let style = StrokeStyle::default();
        let near = add(&mut canvas, &diagonal(), &style);
        let far = add(&mut canvas, &pts(&[(100.0, 100.0), (120.0, 100.0)]), &style);

        let delta = Eraser::Object
            .erase_at(&mut canvas, Point::new(10.0, 10.0), 1.0)
            .unwrap();
        assert_eq!(delta.removed, vec![near]);
        assert!(delta.created.is_empty());
        assert!(canvas.stroke(near).is_none());
        assert!(canvas.stroke(far).is_some());
    }

    #[test]
    fn object_mode_over_erases_by_bounding_box() {
        let mut canvas = Canvas::new();
        // An L shape: the box covers (9, 1) but the ink does not.
        let id = add(
            &mut canvas,
            &pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
            &StrokeStyle::default(),
        );
        let delta = Eraser::Object
            .erase_at(&mut canvas, Point::new(9.0, 1.0), 0.5)
            .unwrap();
        assert_eq!(delta.removed, vec![id]);
    }

    #[test]
    fn object_mode_miss_changes_nothing() {
        let mut canvas = Canvas::new();
        add(&mut canvas, &diagonal(), &StrokeStyle::default());
        let delta = Eraser::Object
            .erase_at(&mut canvas, Point::new(-50.0, -50.0), 1.0)
            .unwrap();
        assert!(delta.is_empty());
        assert_eq!(canvas.len(), 1);
    }

    // --- Pixel mode ---

    #[test]
    fn pixel_mode_splits_and_inherits_style() {
        let mut canvas = Canvas::new();
        let style = StrokeStyle::default().with("class", "ink");
        let id = add(&mut canvas, &diagonal(), &style);

        let delta = Eraser::Pixel
            .erase_at(&mut canvas, Point::new(10.0, 10.0), 1.0)
            .unwrap();
        assert_eq!(delta.removed, vec![id]);
        assert_eq!(delta.created.len(), 2);
        assert!(canvas.stroke(id).is_none());

        let first = canvas.stroke(delta.created[0]).unwrap();
        let second = canvas.stroke(delta.created[1]).unwrap();
        assert_eq!(first.points().points(), pts(&[(0.0, 0.0), (5.0, 5.0)]).as_slice());
        assert_eq!(second.points().points(), pts(&[(15.0, 15.0), (20.0, 20.0)]).as_slice());
        assert_eq!(first.style(), &style);
        assert_eq!(second.style().get("class"), Some("ink"));
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn pixel_mode_leaves_box_overlap_without_hits_untouched() {
        let mut canvas = Canvas::new();
        let id = add(
            &mut canvas,
            &pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
            &StrokeStyle::default(),
        );
        let delta = Eraser::Pixel
            .erase_at(&mut canvas, Point::new(9.0, 1.0), 0.5)
            .unwrap();
        assert!(delta.is_empty());
        assert_eq!(canvas.path_data(id).unwrap().as_str(), "M0 0 L0 10 L10 10");
    }

    #[test]
    fn pixel_mode_erasing_whole_stroke_leaves_no_children() {
        let mut canvas = Canvas::new();
        let id = add(
            &mut canvas,
            &pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]),
            &StrokeStyle::default(),
        );
        let delta = Eraser::Pixel
            .erase_at(&mut canvas, Point::new(1.0, 1.0), 5.0)
            .unwrap();
        assert_eq!(delta.removed, vec![id]);
        assert!(delta.created.is_empty());
        assert!(canvas.is_empty());
    }

    #[test]
    fn affected_lists_removed_then_created() {
        let delta = EraseDelta {
            removed: vec![StrokeId::from_raw(1)],
            created: vec![StrokeId::from_raw(7), StrokeId::from_raw(8)],
        };
        assert_eq!(
            delta.affected(),
            vec![
                StrokeId::from_raw(1),
                StrokeId::from_raw(7),
                StrokeId::from_raw(8)
            ]
        );
    }
}
