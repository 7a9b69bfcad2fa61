//! Sample stream processing: turn irregular pointer input into an evenly
//! spaced point sequence.
//!
//! Three independent regularity rules apply to drawing strokes:
//!
//! - **Spatial decimation** ([`StrokeSampler::accept`]): a sample closer
//!   than `min_dist` to the last committed point is dropped.
//! - **Temporal interpolation** ([`TemporalInterpolator::expand`]): when
//!   two consecutive raw samples are more than `2 * max_time_delta` apart,
//!   synthetic samples are generated between them so the downstream
//!   handler sees a bounded minimum event rate.
//! - **Spatial back-fill** ([`backfill`]): once the gesture ends, long
//!   gaps between committed points are filled with interpolated points.
//!   This is cosmetic and runs once, never during live drawing.

use crate::input::PointerSample;
use crate::types::{Point, PointSequence};

/// Accumulates committed points for one stroke, applying spatial
/// decimation.
#[derive(Debug, Clone)]
pub struct StrokeSampler {
    min_dist: f64,
    points: Vec<Point>,
}

impl StrokeSampler {
    /// Create an empty sampler with the given decimation threshold.
    #[must_use]
    pub const fn new(min_dist: f64) -> Self {
        Self {
            min_dist,
            points: Vec::new(),
        }
    }

    /// Offer a point. Returns `true` if it was committed.
    ///
    /// The first finite point is always committed. Later points are
    /// committed only when at least `min_dist` away from the last
    /// committed point. Non-finite points are never committed.
    pub fn accept(&mut self, point: Point) -> bool {
        if !point.is_finite() {
            tracing::debug!(?point, "dropping non-finite sample");
            return false;
        }
        let keep = self
            .points
            .last()
            .is_none_or(|last| last.distance(point) >= self.min_dist);
        if keep {
            self.points.push(point);
        }
        keep
    }

    /// Points committed so far, in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume the sampler and return the back-filled stroke.
    #[must_use]
    pub fn finish(self) -> PointSequence {
        backfill(&self.points, self.min_dist)
    }
}

/// Fill gaps longer than `2 * min_dist` with evenly spaced points.
///
/// For a pair of consecutive points `d` apart with `d > 2 * min_dist`,
/// the segment is divided into `floor(2 * d / min_dist) + 1` equal steps
/// and the interior step points are inserted. Other pairs are kept
/// as-is. Returns the input unchanged when `min_dist` is not positive or
/// there are fewer than two points.
///
/// # Examples
///
/// ```
/// use pensketch_core::Point;
/// use pensketch_core::sampler::backfill;
///
/// // d = 10, min_dist = 4: floor(20 / 4) + 1 = 6 steps, 5 new points.
/// let filled = backfill(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)], 4.0);
/// assert_eq!(filled.len(), 7);
/// ```
#[must_use]
pub fn backfill(points: &[Point], min_dist: f64) -> PointSequence {
    if points.len() < 2 || min_dist.is_nan() || min_dist <= 0.0 {
        return PointSequence::new(points.to_vec());
    }

    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);

    for window in points.windows(2) {
        let a = window[0];
        let b = window[1];
        let dist = a.distance(b);

        if dist > 2.0 * min_dist {
            let steps = step_count(2.0 * dist / min_dist);
            #[allow(clippy::cast_precision_loss)]
            let steps_f = steps as f64;
            for i in 1..steps {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 / steps_f;
                result.push(a.lerp(b, t));
            }
        }
        result.push(b);
    }

    PointSequence::new(result)
}

/// `floor(ratio) + 1`, saturating for absurd ratios.
fn step_count(ratio: f64) -> usize {
    /// Upper bound on generated steps for one gap.
    const MAX_STEPS: f64 = 1_000_000.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ratio.floor().clamp(0.0, MAX_STEPS) as usize + 1;
    steps
}

/// Generates synthetic samples across long time gaps.
#[derive(Debug, Clone)]
pub struct TemporalInterpolator {
    max_time_delta: f64,
    previous: Option<PointerSample>,
}

impl TemporalInterpolator {
    /// Create an interpolator with no previous sample.
    #[must_use]
    pub const fn new(max_time_delta: f64) -> Self {
        Self {
            max_time_delta,
            previous: None,
        }
    }

    /// Forget the previous sample so the next one starts a new run.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// The samples to handle for `sample`, in chronological order.
    ///
    /// Synthetic samples (if any) come first and the real sample last.
    /// `sample` becomes the previous sample for the next call.
    pub fn expand(&mut self, sample: PointerSample) -> Vec<PointerSample> {
        let mut out = match &self.previous {
            Some(previous) => interpolate_gap(previous, &sample, self.max_time_delta),
            None => Vec::new(),
        };
        if !out.is_empty() {
            tracing::debug!(
                synthetic = out.len(),
                timestamp = sample.timestamp,
                "interpolated samples across time gap"
            );
        }
        out.push(sample);
        self.previous = Some(sample);
        out
    }
}

/// Synthetic samples strictly between `previous` and `current`.
///
/// Empty unless `current.timestamp - previous.timestamp` exceeds
/// `2 * max_time_delta`. Otherwise the gap is split into
/// `floor(dt / max_time_delta) + 1` steps and every numeric field is
/// linearly interpolated at each interior step.
#[must_use]
pub fn interpolate_gap(
    previous: &PointerSample,
    current: &PointerSample,
    max_time_delta: f64,
) -> Vec<PointerSample> {
    let dt = current.timestamp - previous.timestamp;
    if max_time_delta.is_nan() || max_time_delta <= 0.0 || dt.is_nan() || dt <= 2.0 * max_time_delta
    {
        return Vec::new();
    }

    let steps = step_count(dt / max_time_delta);
    #[allow(clippy::cast_precision_loss)]
    let steps_f = steps as f64;
    (1..steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / steps_f;
            PointerSample::lerp(previous, current, t)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // --- Spatial decimation ---

    #[test]
    fn first_point_always_committed() {
        let mut sampler = StrokeSampler::new(100.0);
        assert!(sampler.accept(Point::new(1.0, 1.0)));
        assert_eq!(sampler.points().len(), 1);
    }

    #[test]
    fn close_samples_are_dropped() {
        let mut sampler = StrokeSampler::new(4.0);
        assert!(sampler.accept(Point::new(0.0, 0.0)));
        // Distances 0, 1, 2, 6 from the last committed point.
        assert!(!sampler.accept(Point::new(0.0, 0.0)));
        assert!(!sampler.accept(Point::new(1.0, 0.0)));
        assert!(!sampler.accept(Point::new(2.0, 0.0)));
        assert!(sampler.accept(Point::new(6.0, 0.0)));
        assert_eq!(sampler.points(), pts(&[(0.0, 0.0), (6.0, 0.0)]).as_slice());
    }

    #[test]
    fn exactly_min_dist_is_committed() {
        let mut sampler = StrokeSampler::new(5.0);
        sampler.accept(Point::new(0.0, 0.0));
        assert!(sampler.accept(Point::new(3.0, 4.0)));
    }

    #[test]
    fn distance_measured_from_last_committed_not_last_seen() {
        let mut sampler = StrokeSampler::new(4.0);
        sampler.accept(Point::new(0.0, 0.0));
        // Each step is 3 apart; the second is 6 from the origin.
        assert!(!sampler.accept(Point::new(3.0, 0.0)));
        assert!(sampler.accept(Point::new(6.0, 0.0)));
    }

    #[test]
    fn non_finite_points_never_committed() {
        let mut sampler = StrokeSampler::new(1.0);
        assert!(!sampler.accept(Point::new(f64::NAN, 0.0)));
        assert!(sampler.is_empty());
        assert!(sampler.accept(Point::new(0.0, 0.0)));
        assert!(!sampler.accept(Point::new(f64::INFINITY, 0.0)));
    }

    // --- Back-fill ---

    #[test]
    fn backfill_leaves_short_gaps_alone() {
        // 6 <= 2 * 4, nothing inserted.
        let filled = backfill(&pts(&[(0.0, 0.0), (6.0, 0.0)]), 4.0);
        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn backfill_gap_of_exactly_twice_min_dist_untouched() {
        let filled = backfill(&pts(&[(0.0, 0.0), (8.0, 0.0)]), 4.0);
        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn backfill_inserts_evenly_spaced_points() {
        // d = 9, min_dist = 4: floor(18 / 4) + 1 = 5 steps, 4 new points.
        let filled = backfill(&pts(&[(0.0, 0.0), (9.0, 0.0)]), 4.0);
        assert_eq!(filled.len(), 6);
        let eps = 1e-10;
        for (i, p) in filled.points().iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = 9.0 * i as f64 / 5.0;
            assert!((p.x - expected).abs() < eps, "point {i} at {}", p.x);
            assert!(p.y.abs() < eps);
        }
    }

    #[test]
    fn backfill_bounds_every_gap() {
        let min_dist = 3.0;
        let filled = backfill(
            &pts(&[(0.0, 0.0), (40.0, 0.0), (40.0, 25.0), (41.0, 25.0), (0.0, 0.0)]),
            min_dist,
        );
        for w in filled.points().windows(2) {
            let d = w[0].distance(w[1]);
            assert!(d <= 2.0 * min_dist + 1e-9, "gap {d} too long");
        }
    }

    #[test]
    fn backfill_preserves_endpoints_and_originals() {
        let original = pts(&[(0.0, 0.0), (20.0, 0.0), (20.0, 1.0)]);
        let filled = backfill(&original, 2.0);
        assert_eq!(filled.first(), Some(&original[0]));
        assert_eq!(filled.last(), Some(&original[2]));
        for p in &original {
            assert!(filled.points().contains(p));
        }
    }

    #[test]
    fn backfill_degenerate_inputs() {
        assert!(backfill(&[], 1.0).is_empty());
        assert_eq!(backfill(&pts(&[(1.0, 1.0)]), 1.0).len(), 1);
        assert_eq!(backfill(&pts(&[(0.0, 0.0), (100.0, 0.0)]), 0.0).len(), 2);
    }

    #[test]
    fn finish_applies_backfill() {
        let mut sampler = StrokeSampler::new(1.0);
        sampler.accept(Point::new(0.0, 0.0));
        sampler.accept(Point::new(10.0, 0.0));
        let stroke = sampler.finish();
        // d = 10: floor(20) + 1 = 21 steps.
        assert_eq!(stroke.len(), 22);
    }

    // --- Temporal interpolation ---

    #[test]
    fn first_sample_passes_through() {
        let mut interp = TemporalInterpolator::new(10.0);
        let s = PointerSample::pen(0.0, 0.0, 0.0);
        assert_eq!(interp.expand(s), vec![s]);
    }

    #[test]
    fn small_gap_not_interpolated() {
        let mut interp = TemporalInterpolator::new(10.0);
        interp.expand(PointerSample::pen(0.0, 0.0, 0.0));
        let out = interp.expand(PointerSample::pen(10.0, 0.0, 20.0));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn large_gap_interpolated_in_chronological_order() {
        let mut interp = TemporalInterpolator::new(10.0);
        interp.expand(PointerSample::pen(0.0, 0.0, 0.0));
        let real = PointerSample::pen(35.0, 70.0, 35.0);
        let out = interp.expand(real);
        // dt = 35: floor(3.5) + 1 = 4 steps, 3 synthetic + 1 real.
        assert_eq!(out.len(), 4);
        assert_eq!(*out.last().unwrap(), real);
        let eps = 1e-10;
        for (i, s) in out.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let t = (i + 1) as f64 / 4.0;
            assert!((s.timestamp - 35.0 * t).abs() < eps);
            assert!((s.x - 35.0 * t).abs() < eps);
            assert!((s.y - 70.0 * t).abs() < eps);
        }
        for w in out.windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }

    #[test]
    fn reset_forgets_previous() {
        let mut interp = TemporalInterpolator::new(1.0);
        interp.expand(PointerSample::pen(0.0, 0.0, 0.0));
        interp.reset();
        assert_eq!(interp.expand(PointerSample::pen(5.0, 5.0, 500.0)).len(), 1);
    }

    #[test]
    fn out_of_order_timestamps_not_interpolated() {
        let a = PointerSample::pen(0.0, 0.0, 100.0);
        let b = PointerSample::pen(5.0, 5.0, 0.0);
        assert!(interpolate_gap(&a, &b, 1.0).is_empty());
    }
}
