//! Page rig: one page's skeleton plus the state of its current turn.

use crate::assembler::PageState;
use crate::config::DampingConfig;
use crate::curvature::{turning_progress, CurveSolver, PageContext};
use crate::damping::damp;
use crate::inputs::PageSpec;
use crate::outputs::PagePose;
use crate::skeleton::Skeleton;

#[derive(Clone, Debug)]
pub struct PageRig {
    index: usize,
    spec: PageSpec,
    skeleton: Skeleton,
    last_opened: bool,
    /// Engine time (ms) at which `opened` last toggled.
    turned_at_ms: Option<f64>,
    turning_progress: f32,
}

impl PageRig {
    pub fn new(index: usize, spec: PageSpec, segments: usize, segment_width: f32) -> Self {
        Self {
            index,
            spec,
            skeleton: Skeleton::build(segments, segment_width),
            last_opened: false,
            turned_at_ms: None,
            turning_progress: 0.0,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    pub fn is_opened(&self) -> bool {
        self.last_opened
    }

    #[inline]
    pub fn turned_at_ms(&self) -> Option<f64> {
        self.turned_at_ms
    }

    #[inline]
    pub fn turning_progress(&self) -> f32 {
        self.turning_progress
    }

    fn context(&self, state: &PageState) -> PageContext {
        PageContext {
            opened: state.opened,
            book_closed: state.book_closed,
            page_number: self.index,
            turning_progress: self.turning_progress,
        }
    }

    /// Jump straight to the resting pose for `state`, with no turn in flight.
    pub fn settle(&mut self, state: &PageState, solver: &CurveSolver) {
        self.last_opened = state.opened;
        self.turned_at_ms = None;
        self.turning_progress = 0.0;
        let ctx = self.context(state);
        let count = self.skeleton.len();
        for bone in self.skeleton.bones_mut() {
            bone.rotation_y = solver.solve(count, bone.index, &ctx);
            bone.rotation_x = solver.solve_fold(count, bone.index, &ctx);
        }
    }

    /// Per-frame update: detect a toggle, refresh the turning envelope, then
    /// solve and damp every bone root first.
    pub fn update(
        &mut self,
        state: &PageState,
        now_ms: f64,
        dt: f32,
        solver: &CurveSolver,
        damping: &DampingConfig,
    ) {
        if state.opened != self.last_opened {
            self.turned_at_ms = Some(now_ms);
            self.last_opened = state.opened;
        }
        let window = solver.tuning().turning_window_ms as f64;
        self.turning_progress = self
            .turned_at_ms
            .map(|t| turning_progress(now_ms - t, window))
            .unwrap_or(0.0);

        let ctx = self.context(state);
        let count = self.skeleton.len();
        for bone in self.skeleton.bones_mut() {
            let target_y = solver.solve(count, bone.index, &ctx);
            let target_x = solver.solve_fold(count, bone.index, &ctx);
            // Targets never wrap, so the direct path is the one toward the spine.
            bone.rotation_y = damp(bone.rotation_y, target_y, damping.bend_smoothing, dt);
            bone.rotation_x = damp(bone.rotation_x, target_x, damping.fold_smoothing, dt);
        }
    }

    pub fn pose(&self, state: &PageState) -> PagePose {
        PagePose {
            index: self.index,
            opened: state.opened,
            book_closed: state.book_closed,
            depth_offset: state.depth_offset,
            turning_progress: self.turning_progress,
            rotations_y: self.skeleton.rotations_y(),
            rotations_x: self.skeleton.rotations_x(),
        }
    }
}
