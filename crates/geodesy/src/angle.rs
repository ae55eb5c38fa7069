//! Angle wrapping into (-π, π].

use ndarray::Array2;
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Map an angle into (-π, π] with at most one full-turn correction.
///
/// Inputs are assumed to be within one turn of the target range (for example
/// the difference of two `atan2` results). Non-finite values pass through.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - TWO_PI
    } else if angle <= -PI {
        angle + TWO_PI
    } else {
        angle
    }
}

/// Grid-wide [`normalize_angle`].
pub fn normalize_angles(angles: &Array2<f64>) -> Array2<f64> {
    angles.mapv(normalize_angle)
}

/// Subtract one turn from angles above π; leave everything else untouched.
///
/// Used for `bearing + π/2`, which can only overshoot on the positive side.
#[inline]
pub fn wrap_to_pi(angle: f64) -> f64 {
    if angle > PI {
        angle - TWO_PI
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_in_range_is_identity() {
        for &a in &[0.0, 1.0, -1.0, PI, -PI + 1e-12, 3.0] {
            assert_eq!(normalize_angle(a), a);
        }
    }

    #[test]
    fn test_normalize_wraps_out_of_range() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        // -π is excluded from the range and maps to +π
        assert_eq!(normalize_angle(-PI), PI);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut a = -2.0 * PI + 0.001;
        while a < 2.0 * PI {
            let once = normalize_angle(a);
            assert_eq!(normalize_angle(once), once, "not idempotent at {}", a);
            assert!(once > -PI && once <= PI, "{} out of range", once);
            a += 0.037;
        }
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert!(normalize_angle(f64::NAN).is_nan());
        assert_eq!(normalize_angle(f64::INFINITY), f64::INFINITY);
        assert_eq!(normalize_angle(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_normalize_grid() {
        let grid = array![[4.0, -4.0], [f64::NAN, 0.5]];
        let out = normalize_angles(&grid);
        assert!((out[[0, 0]] - (4.0 - TWO_PI)).abs() < 1e-12);
        assert!((out[[0, 1]] - (-4.0 + TWO_PI)).abs() < 1e-12);
        assert!(out[[1, 0]].is_nan());
        assert_eq!(out[[1, 1]], 0.5);
    }

    #[test]
    fn test_wrap_to_pi_only_handles_overshoot() {
        assert!((wrap_to_pi(PI + 0.5) - (0.5 - PI)).abs() < 1e-12);
        assert_eq!(wrap_to_pi(PI), PI);
        assert_eq!(wrap_to_pi(-3.5), -3.5);
    }
}
