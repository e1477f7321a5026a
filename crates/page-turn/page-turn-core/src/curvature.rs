//! Curvature solver: target bone angles for a bending page.
//!
//! Bones near the spine follow an "inside" sinusoid (paper compressed at the
//! binding), bones further out a gentler "outside" one. While a page is in the
//! middle of a turn a third term adds a transient bulge that fades as the
//! turning envelope returns to zero. A fully closed book collapses every page
//! to a single rotation at the root.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CurveTuning;

/// Per-page inputs shared by every bone of the page.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub opened: bool,
    pub book_closed: bool,
    /// Page index in the book; drives the cosmetic fan-out.
    pub page_number: usize,
    /// Turning envelope in [0, 1]; 0 at rest.
    pub turning_progress: f32,
}

/// Turning envelope: `sin(PI * t)` over the window, 0 outside it.
///
/// `elapsed_ms` is the time since the page's opened flag last toggled.
pub fn turning_progress(elapsed_ms: f64, window_ms: f64) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 || window_ms.is_nan() || window_ms <= 0.0 {
        return 0.0;
    }
    if elapsed_ms >= window_ms {
        return 0.0;
    }
    let t = elapsed_ms / window_ms;
    (t * std::f64::consts::PI).sin() as f32
}

/// Pure solver over a fixed tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSolver {
    tuning: CurveTuning,
}

impl CurveSolver {
    pub fn new(tuning: CurveTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &CurveTuning {
        &self.tuning
    }

    /// Rotation the whole page aims for: +90 degrees closed, -90 degrees opened,
    /// plus the per-page stagger while the book is open.
    pub fn base_rotation(&self, ctx: &PageContext) -> f32 {
        let mut base = if ctx.opened { -FRAC_PI_2 } else { FRAC_PI_2 };
        if !ctx.book_closed {
            base += self.tuning.page_stagger_deg.to_radians() * ctx.page_number as f32;
        }
        base
    }

    fn clamp_index(bone_count: usize, bone_index: usize) -> usize {
        if bone_index >= bone_count {
            warn!(bone_index, bone_count, "bone index out of range; clamping");
            bone_count - 1
        } else {
            bone_index
        }
    }

    /// Target y rotation for one bone.
    pub fn solve(&self, bone_count: usize, bone_index: usize, ctx: &PageContext) -> f32 {
        if bone_count == 0 {
            return 0.0;
        }
        let i = Self::clamp_index(bone_count, bone_index);
        let base = self.base_rotation(ctx);

        if ctx.book_closed {
            return if i == 0 { base } else { 0.0 };
        }

        let fi = i as f32;
        let t = &self.tuning;
        let inside = if i < t.inside_threshold {
            (fi * 0.2 + 0.25).sin()
        } else {
            0.0
        };
        let outside = if i >= t.inside_threshold {
            (fi * 0.3 + 0.09).cos()
        } else {
            0.0
        };
        let turning = (fi * PI / bone_count as f32).sin() * ctx.turning_progress;

        t.inside_strength * inside * base - t.outside_strength * outside * base
            + t.turning_strength * turning * base
    }

    /// Target x rotation (crease) for one bone; only non-zero mid-turn.
    pub fn solve_fold(&self, bone_count: usize, bone_index: usize, ctx: &PageContext) -> f32 {
        if bone_count == 0 || ctx.book_closed {
            return 0.0;
        }
        let i = Self::clamp_index(bone_count, bone_index);
        if i <= self.tuning.inside_threshold {
            return 0.0;
        }
        let base = self.base_rotation(ctx);
        let intensity = (i as f32 * PI / bone_count as f32 - 0.5).sin() * ctx.turning_progress;
        base.signum() * self.tuning.fold_angle_deg.to_radians() * intensity
    }

    /// Solve every bone of a page in index order.
    pub fn solve_page(&self, bone_count: usize, ctx: &PageContext) -> Vec<f32> {
        (0..bone_count)
            .map(|i| self.solve(bone_count, i, ctx))
            .collect()
    }
}

impl Default for CurveSolver {
    fn default() -> Self {
        Self::new(CurveTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(opened: bool, book_closed: bool, progress: f32) -> PageContext {
        PageContext {
            opened,
            book_closed,
            page_number: 3,
            turning_progress: progress,
        }
    }

    #[test]
    fn base_sign_follows_opened_flag() {
        let s = CurveSolver::default();
        assert!(s.base_rotation(&ctx(false, true, 0.0)) > 0.0);
        assert!(s.base_rotation(&ctx(true, true, 0.0)) < 0.0);
    }

    #[test]
    fn stagger_only_when_open() {
        let s = CurveSolver::default();
        let closed = s.base_rotation(&ctx(false, true, 0.0));
        let open = s.base_rotation(&ctx(false, false, 0.0));
        assert_eq!(closed, FRAC_PI_2);
        assert!((open - (FRAC_PI_2 + 3.0 * 0.8f32.to_radians())).abs() < 1e-6);
    }

    #[test]
    fn closed_book_collapses_to_root() {
        let s = CurveSolver::default();
        let c = ctx(true, true, 0.7);
        let angles = s.solve_page(31, &c);
        assert_eq!(angles[0], -FRAC_PI_2);
        assert!(angles[1..].iter().all(|a| *a == 0.0));
        assert!((0..31).all(|i| s.solve_fold(31, i, &c) == 0.0));
    }

    #[test]
    fn inside_and_outside_regions() {
        let s = CurveSolver::default();
        let c = ctx(false, false, 0.0);
        let base = s.base_rotation(&c);
        let a2 = s.solve(31, 2, &c);
        assert!((a2 - 0.18 * (0.65f32).sin() * base).abs() < 1e-6);
        let a10 = s.solve(31, 10, &c);
        assert!((a10 + 0.05 * (3.09f32).cos() * base).abs() < 1e-6);
    }

    #[test]
    fn turning_term_adds_bulge() {
        let s = CurveSolver::default();
        let rest = s.solve(31, 15, &ctx(true, false, 0.0));
        let mid = s.solve(31, 15, &ctx(true, false, 1.0));
        assert!(mid < rest, "turning should push further toward the opened side");
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let s = CurveSolver::default();
        let c = ctx(false, false, 0.5);
        assert_eq!(s.solve(31, 99, &c), s.solve(31, 30, &c));
    }

    #[test]
    fn envelope_shape() {
        assert_eq!(turning_progress(0.0, 400.0), 0.0);
        assert!((turning_progress(200.0, 400.0) - 1.0).abs() < 1e-6);
        assert_eq!(turning_progress(400.0, 400.0), 0.0);
        assert_eq!(turning_progress(-5.0, 400.0), 0.0);
        assert_eq!(turning_progress(f64::NAN, 400.0), 0.0);
    }
}
