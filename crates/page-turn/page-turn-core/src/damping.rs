//! Frame-rate independent exponential damping.
//!
//! `alpha = 1 - exp(-dt / smoothing)` is the fraction of the remaining
//! distance covered in one step. It lies in [0, 1] for any non-negative `dt`,
//! so the value never overshoots regardless of frame length.

use std::f32::consts::{PI, TAU};

/// Fraction of the remaining distance to cover this step.
#[inline]
pub fn damping_alpha(smoothing: f32, dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        return 0.0;
    }
    if smoothing.is_nan() || smoothing <= 0.0 || dt.is_infinite() {
        return 1.0;
    }
    (1.0 - (-dt / smoothing).exp()).clamp(0.0, 1.0)
}

/// Wrap an angle into (-PI, PI].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    if !a.is_finite() {
        return a;
    }
    let mut w = a.rem_euclid(TAU);
    if w > PI {
        w -= TAU;
    }
    w
}

/// Move `current` toward `target`.
#[inline]
pub fn damp(current: f32, target: f32, smoothing: f32, dt: f32) -> f32 {
    if !current.is_finite() || !target.is_finite() {
        return if target.is_finite() { target } else { current };
    }
    let alpha = damping_alpha(smoothing, dt);
    if alpha >= 1.0 {
        return target;
    }
    current + (target - current) * alpha
}

/// Move the angle `current` toward `target` along the shortest arc.
///
/// A half-turn has no shorter side; it follows the sign of `target - current`.
#[inline]
pub fn damp_angle(current: f32, target: f32, smoothing: f32, dt: f32) -> f32 {
    if !current.is_finite() || !target.is_finite() {
        return damp(current, target, smoothing, dt);
    }
    let raw = target - current;
    let mut delta = wrap_angle(raw);
    if delta == PI && raw < 0.0 {
        delta = -PI;
    }
    let alpha = damping_alpha(smoothing, dt);
    if alpha >= 1.0 {
        return current + delta;
    }
    current + delta * alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn approaches_target_without_overshoot() {
        let mut v = 0.0f32;
        let mut prev = v;
        for _ in 0..200 {
            v = damp_angle(v, FRAC_PI_2, 0.5, 1.0 / 60.0);
            assert!(v >= prev);
            assert!(v <= FRAC_PI_2);
            prev = v;
        }
        assert!((v - FRAC_PI_2).abs() < 0.01);
    }

    #[test]
    fn huge_dt_lands_on_target() {
        let v = damp_angle(0.0, FRAC_PI_2, 0.5, 1.0e9);
        assert!(v <= FRAC_PI_2);
        assert!((v - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(damp_angle(0.0, FRAC_PI_2, 0.5, f32::INFINITY), FRAC_PI_2);
    }

    #[test]
    fn zero_or_invalid_dt_holds_value() {
        assert_eq!(damp(0.3, 1.0, 0.5, 0.0), 0.3);
        assert_eq!(damp(0.3, 1.0, 0.5, -1.0), 0.3);
        assert_eq!(damp(0.3, 1.0, 0.5, f32::NAN), 0.3);
    }

    #[test]
    fn zero_smoothing_snaps() {
        assert_eq!(damp(0.0, 2.0, 0.0, 0.016), 2.0);
    }

    #[test]
    fn tiny_dt_moves_a_little() {
        let v = damp(0.0, 1.0, 0.5, 1.0e-6);
        assert!(v > 0.0 && v < 1.0e-4);
    }

    #[test]
    fn angle_takes_shortest_arc() {
        // From just below PI to just above -PI is a short hop across the seam.
        let v = damp_angle(3.0, -3.0, 0.5, 0.1);
        assert!(v > 3.0);
    }

    #[test]
    fn half_turn_follows_direct_sign() {
        let down = damp_angle(FRAC_PI_2, -FRAC_PI_2, 0.5, 0.1);
        assert!(down < FRAC_PI_2 && down > -FRAC_PI_2);
        let up = damp_angle(-FRAC_PI_2, FRAC_PI_2, 0.5, 0.1);
        assert!(up > -FRAC_PI_2 && up < FRAC_PI_2);
    }

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
        assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
    }
}
