//! BookEngine: owns the book state and drives it one frame at a time.
//!
//! Frame order in [`BookEngine::update`]:
//! 1. advance the engine clock
//! 2. apply host commands
//! 3. fire every flip step that is due (so the solve below sees the new page)
//! 4. assemble per-page state and update each rig, bones root first

use tracing::{debug, warn};

use crate::assembler::{assemble, page_state, PageState};
use crate::config::Config;
use crate::curvature::CurveSolver;
use crate::error::Result;
use crate::geometry::PageGeometry;
use crate::ids::StepToken;
use crate::inputs::{BookCommand, Inputs, PageSpec};
use crate::outputs::{BookEvent, Outputs};
use crate::page::PageRig;
use crate::resources::{PageMaterials, PassthroughResolver, ResourceCache, TextureResolver};
use crate::scheduler::FlipScheduler;

#[derive(Debug)]
pub struct BookEngine {
    cfg: Config,
    solver: CurveSolver,
    scheduler: FlipScheduler,
    pages: Vec<PageRig>,
    resources: ResourceCache,
    clock_ms: f64,
    /// Events raised between frames (navigation, page list changes).
    queued: Vec<BookEvent>,
    outputs: Outputs,
}

impl BookEngine {
    /// Create an engine with no pages. The config is trusted; use
    /// [`try_new`](Self::try_new) for host-provided values.
    pub fn new(cfg: Config) -> Self {
        Self {
            solver: CurveSolver::new(cfg.curve.clone()),
            scheduler: FlipScheduler::new(cfg.flip.clone(), 0),
            resources: ResourceCache::new(cfg.textures.clone()),
            cfg,
            pages: Vec::new(),
            clock_ms: 0.0,
            queued: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn try_new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg))
    }

    pub fn from_json_config(s: &str) -> Result<Self> {
        Ok(Self::new(Config::from_json_str(s)?))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn delayed_page(&self) -> usize {
        self.scheduler.delayed()
    }

    #[inline]
    pub fn target_page(&self) -> usize {
        self.scheduler.target()
    }

    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn pages(&self) -> &[PageRig] {
        &self.pages
    }

    pub fn scheduler(&self) -> &FlipScheduler {
        &self.scheduler
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn materials(&self, page: usize) -> Option<&PageMaterials> {
        self.resources.materials(page)
    }

    /// Shared page mesh; built on first request and kept for the engine's lifetime.
    pub fn geometry(&mut self) -> &PageGeometry {
        self.resources.geometry(&self.cfg.page)
    }

    /// Per-page state for the current delayed page.
    pub fn page_states(&self) -> Vec<PageState> {
        assemble(self.pages.len(), self.scheduler.delayed(), self.cfg.page.depth)
    }

    /// Replace the page list. The book closes onto its front cover and every
    /// pending flip step is cancelled.
    pub fn set_pages(&mut self, specs: Vec<PageSpec>) {
        let segments = self.cfg.page.segments;
        let segment_width = self.cfg.page.segment_width();
        self.pages = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| PageRig::new(i, spec, segments, segment_width))
            .collect();
        let count = self.pages.len();
        self.scheduler.reset(count);
        for rig in &mut self.pages {
            let state = page_state(rig.index(), count, 0, self.cfg.page.depth);
            rig.settle(&state, &self.solver);
        }
        self.bind_textures(&mut PassthroughResolver);
        debug!(page_count = count, "page list replaced");
        self.queued.push(BookEvent::PagesReplaced { page_count: count });
    }

    /// Resolve every page's textures through `resolver`, replacing earlier bindings.
    pub fn bind_textures(&mut self, resolver: &mut dyn TextureResolver) {
        self.resources.clear();
        self.refresh_textures(resolver);
    }

    /// Resolve only pages whose texture references changed since their last bind.
    pub fn refresh_textures(&mut self, resolver: &mut dyn TextureResolver) {
        let count = self.pages.len();
        for rig in &self.pages {
            let i = rig.index();
            if !self.resources.bind(i, count, rig.spec(), resolver) {
                continue;
            }
            if let Some(m) = self.resources.materials(i) {
                for (slot, binding) in [("front", &m.front), ("back", &m.back)] {
                    if binding.fallback {
                        self.queued.push(BookEvent::TextureFallback {
                            page: i,
                            slot: slot.to_string(),
                            fallback: binding.texture.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Request navigation to `page`, clamped into `[0, page_count]`.
    ///
    /// The returned token identifies the flip chain; it stops being valid as
    /// soon as another request, a page list change or [`shutdown`](Self::shutdown) happens.
    pub fn go_to_page(&mut self, page: usize) -> StepToken {
        if self.scheduler.is_shut_down() {
            return self.scheduler.request(page, self.clock_ms);
        }
        let clamped = self.scheduler.clamp_target(page);
        if clamped != page {
            self.queued.push(BookEvent::TargetClamped {
                requested: page,
                clamped,
            });
        }
        self.scheduler.request(page, self.clock_ms)
    }

    /// Cancel an in-flight flip chain, leaving the book on the current page.
    pub fn cancel(&mut self, token: StepToken) -> bool {
        self.scheduler.cancel(token)
    }

    /// Stop all scheduling; further steps are ignored until the next page list.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    fn apply_inputs(&mut self, inputs: Inputs) {
        for cmd in inputs.commands {
            match cmd {
                BookCommand::GoToPage { page } => {
                    self.go_to_page(page);
                }
                BookCommand::SetPages { pages } => self.set_pages(pages),
            }
        }
    }

    /// Step the book by `dt` seconds with the given inputs.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            if dt != 0.0 {
                warn!(dt, "ignoring invalid frame delta");
            }
            0.0
        };
        self.outputs.clear();

        // 1) Clock
        self.clock_ms += dt as f64 * 1000.0;

        // 2) Commands
        self.apply_inputs(inputs);

        // 3) Flip steps due by now
        for e in self.scheduler.advance_to(self.clock_ms) {
            self.queued.push(e.into());
        }

        // 4) Pages
        let anim_dt = dt.min(self.cfg.damping.max_frame_dt);
        let states = self.page_states();
        for (rig, state) in self.pages.iter_mut().zip(states.iter()) {
            rig.update(state, self.clock_ms, anim_dt, &self.solver, &self.cfg.damping);
            self.outputs.push_pose(rig.pose(state));
        }

        self.outputs.delayed_page = self.scheduler.delayed();
        self.outputs.target_page = self.scheduler.target();
        self.outputs.events.append(&mut self.queued);
        &self.outputs
    }
}

impl Default for BookEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
