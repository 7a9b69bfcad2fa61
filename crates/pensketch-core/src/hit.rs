//! Point-level hit testing for the pixel-mode eraser.
//!
//! The test is an axis-aligned box check rather than a Euclidean one: a
//! point hits when both coordinates lie within `radius` of the query.
//! Corners of the box therefore reach `radius * sqrt(2)` away, which is
//! acceptable for an eraser and avoids a square root per point.

use crate::types::Point;

/// Indices of every point within the box of half-side `radius` around
/// `center`, in ascending order.
///
/// Box edges are inclusive. An empty result means nothing was hit.
///
/// # Examples
///
/// ```
/// use pensketch_core::Point;
/// use pensketch_core::hit::hit_test;
///
/// let points = [Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(20.0, 20.0)];
/// assert_eq!(hit_test(&points, Point::new(5.0, 5.0), 1.0), vec![1]);
/// assert!(hit_test(&points, Point::new(100.0, 100.0), 1.0).is_empty());
/// ```
#[must_use]
pub fn hit_test(points: &[Point], center: Point, radius: f64) -> Vec<usize> {
    let x_range = (center.x - radius)..=(center.x + radius);
    let y_range = (center.y - radius)..=(center.y + radius);
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| x_range.contains(&p.x) && y_range.contains(&p.y))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn single_hit() {
        let points = pts(&[(0.0, 0.0), (5.0, 5.0), (20.0, 20.0)]);
        assert_eq!(hit_test(&points, Point::new(5.0, 5.0), 1.0), vec![1]);
    }

    #[test]
    fn miss_returns_empty() {
        let points = pts(&[(0.0, 0.0), (5.0, 5.0), (20.0, 20.0)]);
        assert!(hit_test(&points, Point::new(100.0, 100.0), 1.0).is_empty());
    }

    #[test]
    fn empty_points_returns_empty() {
        assert!(hit_test(&[], Point::new(0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn edges_are_inclusive() {
        let points = pts(&[(6.0, 5.0), (5.0, 4.0)]);
        assert_eq!(hit_test(&points, Point::new(5.0, 5.0), 1.0), vec![0, 1]);
    }

    #[test]
    fn box_corner_hits_beyond_euclidean_radius() {
        // (1, 1) is sqrt(2) away but inside the box of half-side 1.
        let points = pts(&[(1.0, 1.0)]);
        assert_eq!(hit_test(&points, Point::new(0.0, 0.0), 1.0), vec![0]);
    }

    #[test]
    fn both_axes_must_be_in_range() {
        let points = pts(&[(5.0, 50.0), (50.0, 5.0)]);
        assert!(hit_test(&points, Point::new(5.0, 5.0), 2.0).is_empty());
    }

    #[test]
    fn indices_ascending_with_duplicates() {
        let points = pts(&[(1.0, 1.0), (9.0, 9.0), (1.0, 1.0), (1.5, 0.5)]);
        assert_eq!(hit_test(&points, Point::new(1.0, 1.0), 1.0), vec![0, 2, 3]);
    }
}
