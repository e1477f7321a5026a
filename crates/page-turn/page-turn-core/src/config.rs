//! Core configuration for page-turn-core.
//!
//! Every tuning constant of the rig lives here so hosts can swap presets
//! (e.g. a 300 ms or 400 ms turning window) without touching solver code.

use serde::{Deserialize, Serialize};

use crate::error::{PageTurnError, Result};

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageDimensions,
    pub curve: CurveTuning,
    pub flip: FlipTiming,
    pub damping: DampingConfig,
    pub textures: TextureFallbacks,
}

/// Physical page size and rig resolution, in scene units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
    /// Thickness of one page; also the z step between stacked pages.
    pub depth: f32,
    /// Number of segments along the page width. Each page rig has `segments + 1` bones.
    pub segments: usize,
}

impl PageDimensions {
    #[inline]
    pub fn segment_width(&self) -> f32 {
        self.width / self.segments.max(1) as f32
    }

    #[inline]
    pub fn bone_count(&self) -> usize {
        self.segments + 1
    }
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self {
            width: 1.28,
            height: 1.71,
            depth: 0.003,
            segments: 30,
        }
    }
}

/// Weights and shape constants for the curvature solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveTuning {
    pub inside_strength: f32,
    pub outside_strength: f32,
    pub turning_strength: f32,
    /// Bones below this index bend with the inside curve, the rest with the outside curve.
    pub inside_threshold: usize,
    /// Per-page fan-out added to the base rotation while the book is open.
    pub page_stagger_deg: f32,
    /// Peak crease angle applied on the secondary (x) axis during a turn.
    pub fold_angle_deg: f32,
    /// Length of the turning transient after a page's opened flag toggles.
    pub turning_window_ms: f32,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            inside_strength: 0.18,
            outside_strength: 0.05,
            turning_strength: 0.09,
            inside_threshold: 8,
            page_stagger_deg: 0.8,
            fold_angle_deg: 2.0,
            turning_window_ms: 400.0,
        }
    }
}

/// Step latencies for the flip scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipTiming {
    pub fast_step_ms: f64,
    pub slow_step_ms: f64,
    /// Distances strictly greater than this use the fast step.
    pub fast_distance: usize,
}

impl FlipTiming {
    /// Delay before the next step given the remaining distance to the target.
    #[inline]
    pub fn latency_ms(&self, distance: usize) -> f64 {
        if distance > self.fast_distance {
            self.fast_step_ms
        } else {
            self.slow_step_ms
        }
    }
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            fast_step_ms: 50.0,
            slow_step_ms: 150.0,
            fast_distance: 2,
        }
    }
}

/// Smoothing time constants (seconds) for the per-frame integrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    pub bend_smoothing: f32,
    pub fold_smoothing: f32,
    /// Frame deltas above this are clamped before damping.
    pub max_frame_dt: f32,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            bend_smoothing: 0.5,
            fold_smoothing: 0.3,
            max_frame_dt: 0.25,
        }
    }
}

/// Texture references used when a page texture cannot be resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureFallbacks {
    pub cover: String,
    pub page: String,
    /// Roughness map bound to the outer faces of the covers, if any.
    pub cover_roughness: Option<String>,
}

impl Default for TextureFallbacks {
    fn default() -> Self {
        Self {
            cover: "textures/front.jpg".to_string(),
            page: "textures/back.jpg".to_string(),
            cover_roughness: None,
        }
    }
}

fn positive(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(PageTurnError::InvalidConfig {
            reason: format!("{name} must be a positive finite number, got {v}"),
        })
    }
}

fn non_negative(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(PageTurnError::InvalidConfig {
            reason: format!("{name} must be a non-negative finite number, got {v}"),
        })
    }
}

impl Config {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every value the solver and scheduler divide by or step with.
    pub fn validate(&self) -> Result<()> {
        if self.page.segments == 0 {
            return Err(PageTurnError::InvalidConfig {
                reason: "page.segments must be at least 1".into(),
            });
        }
        positive("page.width", self.page.width)?;
        positive("page.height", self.page.height)?;
        positive("page.depth", self.page.depth)?;
        positive("curve.turning_window_ms", self.curve.turning_window_ms)?;
        non_negative("flip.fast_step_ms", self.flip.fast_step_ms)?;
        non_negative("flip.slow_step_ms", self.flip.slow_step_ms)?;
        non_negative("damping.bend_smoothing", self.damping.bend_smoothing as f64)?;
        non_negative("damping.fold_smoothing", self.damping.fold_smoothing as f64)?;
        positive("damping.max_frame_dt", self.damping.max_frame_dt)?;
        for (name, v) in [
            ("curve.inside_strength", self.curve.inside_strength),
            ("curve.outside_strength", self.curve.outside_strength),
            ("curve.turning_strength", self.curve.turning_strength),
            ("curve.page_stagger_deg", self.curve.page_stagger_deg),
            ("curve.fold_angle_deg", self.curve.fold_angle_deg),
        ] {
            if !v.is_finite() {
                return Err(PageTurnError::InvalidConfig {
                    reason: format!("{name} must be finite, got {v}"),
                });
            }
        }
        Ok(())
    }
}
