//! Identifiers and a small allocator for scheduled flip steps.

use serde::{Deserialize, Serialize};

/// Cancellation token for one chain of scheduled flip steps.
///
/// A token stays valid while its chain is pending; issuing a new request,
/// resetting, or shutting down the scheduler invalidates it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StepToken(pub u32);

/// Monotonic allocator for StepToken.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_step: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_step(&mut self) -> StepToken {
        let id = StepToken(self.next_step);
        self.next_step = self.next_step.wrapping_add(1);
        id
    }
}
