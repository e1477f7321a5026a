//! Page flip scheduler.
//!
//! Walks the delayed page toward the requested target one page per step. The
//! scheduler keeps no clock: callers pass `now` in milliseconds and it records
//! when the next step is due. Each request issues a fresh [`StepToken`]; only
//! the token of the currently pending step can fire, so ticks left over from a
//! redirected or torn-down chain are ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FlipTiming;
use crate::ids::{IdAllocator, StepToken};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipPhase {
    Idle,
    Advancing,
}

/// The single step currently waiting on the timer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledStep {
    pub token: StepToken,
    pub due_ms: f64,
}

/// Signals produced while stepping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipEvent {
    /// The delayed page moved by one; hosts hang the flip sound cue on this.
    PageTurned { from: usize, to: usize },
    /// The delayed page reached the target.
    Settled { page: usize },
}

#[derive(Debug)]
pub struct FlipScheduler {
    timing: FlipTiming,
    page_count: usize,
    target: usize,
    delayed: usize,
    pending: Option<ScheduledStep>,
    ids: IdAllocator,
    shut_down: bool,
}

impl FlipScheduler {
    pub fn new(timing: FlipTiming, page_count: usize) -> Self {
        Self {
            timing,
            page_count,
            target: 0,
            delayed: 0,
            pending: None,
            ids: IdAllocator::new(),
            shut_down: false,
        }
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline]
    pub fn delayed(&self) -> usize {
        self.delayed
    }

    #[inline]
    pub fn pending(&self) -> Option<ScheduledStep> {
        self.pending
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn phase(&self) -> FlipPhase {
        if self.delayed == self.target {
            FlipPhase::Idle
        } else {
            FlipPhase::Advancing
        }
    }

    /// Clamp a requested page into `[0, page_count]`.
    #[inline]
    pub fn clamp_target(&self, target: usize) -> usize {
        target.min(self.page_count)
    }

    /// Point the scheduler at a new target, replacing any pending step.
    ///
    /// The first step is due one latency after `now_ms`. Requesting the page
    /// that is already shown cancels whatever was pending.
    pub fn request(&mut self, target: usize, now_ms: f64) -> StepToken {
        let token = self.ids.alloc_step();
        if self.shut_down {
            warn!(target, "flip request after shutdown ignored");
            return token;
        }
        let clamped = self.clamp_target(target);
        if clamped != target {
            warn!(
                requested = target,
                clamped,
                page_count = self.page_count,
                "flip target out of range; clamping"
            );
        }
        if let Some(prev) = self.pending.take() {
            debug!(old = prev.token.0, new = token.0, "redirecting flip");
        }
        self.target = clamped;
        if self.delayed != clamped {
            let distance = self.delayed.abs_diff(clamped);
            self.pending = Some(ScheduledStep {
                token,
                due_ms: now_ms + self.timing.latency_ms(distance),
            });
        }
        token
    }

    /// Fire the step identified by `token` at time `at_ms`.
    ///
    /// Returns the events of the step, or nothing when the token is stale.
    pub fn fire(&mut self, token: StepToken, at_ms: f64) -> Vec<FlipEvent> {
        let mut events = Vec::new();
        match self.pending {
            Some(step) if step.token == token && !self.shut_down => {}
            _ => {
                debug!(token = token.0, "stale flip step ignored");
                return events;
            }
        }

        let from = self.delayed;
        let to = if self.target > from { from + 1 } else { from - 1 };
        self.delayed = to;
        events.push(FlipEvent::PageTurned { from, to });
        debug!(from, to, target = self.target, "flip step");

        if to == self.target {
            self.pending = None;
            events.push(FlipEvent::Settled { page: to });
        } else {
            let distance = to.abs_diff(self.target);
            self.pending = Some(ScheduledStep {
                token,
                due_ms: at_ms + self.timing.latency_ms(distance),
            });
        }
        events
    }

    /// Fire every step due at or before `now_ms`, each at its own due time so a
    /// long frame catches up exactly as the timer would have.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<FlipEvent> {
        let mut events = Vec::new();
        while let Some(step) = self.pending {
            if step.due_ms > now_ms {
                break;
            }
            events.extend(self.fire(step.token, step.due_ms));
        }
        events
    }

    /// Cancel the chain owned by `token`; the delayed page stays where it is.
    pub fn cancel(&mut self, token: StepToken) -> bool {
        match self.pending {
            Some(step) if step.token == token => {
                self.pending = None;
                self.target = self.delayed;
                true
            }
            _ => false,
        }
    }

    /// Start over for a new page list.
    pub fn reset(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.target = 0;
        self.delayed = 0;
        self.pending = None;
        self.shut_down = false;
    }

    /// Drop any pending step and refuse new ones until [`reset`](Self::reset).
    pub fn shutdown(&mut self) {
        self.pending = None;
        self.shut_down = true;
    }
}
