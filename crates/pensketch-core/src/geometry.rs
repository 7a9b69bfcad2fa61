//! Distance and linear-interpolation primitives.

use crate::types::Point;

/// Euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use pensketch_core::Point;
/// use pensketch_core::geometry::distance;
///
/// assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
/// ```
#[must_use]
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    dx.hypot(dy)
}

/// Linear interpolation from `a` to `b`.
///
/// `t` is clamped to `[0, 1]` first, so the result always lies between
/// `a` and `b`. A NaN `t` is treated as `0`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    (1.0 - t).mul_add(a, t * b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(1.0, -2.0);
        let b = Point::new(-4.0, 7.5);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-12);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = Point::new(12.5, 3.0);
        assert!(distance(a, a).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_3_4_5() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn lerp_endpoints() {
        assert!((lerp(2.0, 8.0, 0.0) - 2.0).abs() < f64::EPSILON);
        assert!((lerp(2.0, 8.0, 1.0) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lerp_midpoint() {
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lerp_clamps_out_of_range_t() {
        assert!((lerp(0.0, 10.0, -3.0)).abs() < f64::EPSILON);
        assert!((lerp(0.0, 10.0, 7.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lerp_nan_t_yields_start() {
        assert!((lerp(4.0, 10.0, f64::NAN) - 4.0).abs() < f64::EPSILON);
    }
}
