//! Output contracts from the book engine.
//!
//! Outputs carry the bone rotations of every page for this frame plus a list
//! of discrete events. Adapters (Bevy/WASM) apply the rotations to their
//! skinned meshes and route events to UI and audio.

use serde::{Deserialize, Serialize};

use crate::scheduler::FlipEvent;

/// Pose of one page this frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePose {
    pub index: usize,
    pub opened: bool,
    pub book_closed: bool,
    pub depth_offset: f32,
    pub turning_progress: f32,
    /// Local y rotation per bone, root first.
    pub rotations_y: Vec<f32>,
    /// Local x rotation per bone, root first.
    pub rotations_x: Vec<f32>,
}

/// Discrete signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BookEvent {
    PageTurned { from: usize, to: usize },
    Settled { page: usize },
    TargetClamped { requested: usize, clamped: usize },
    PagesReplaced { page_count: usize },
    TextureFallback { page: usize, slot: String, fallback: String },
}

impl From<FlipEvent> for BookEvent {
    fn from(e: FlipEvent) -> Self {
        match e {
            FlipEvent::PageTurned { from, to } => BookEvent::PageTurned { from, to },
            FlipEvent::Settled { page } => BookEvent::Settled { page },
        }
    }
}

/// Outputs returned by BookEngine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub delayed_page: usize,
    pub target_page: usize,
    #[serde(default)]
    pub poses: Vec<PagePose>,
    #[serde(default)]
    pub events: Vec<BookEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.poses.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_pose(&mut self, pose: PagePose) {
        self.poses.push(pose);
    }

    #[inline]
    pub fn push_event(&mut self, event: BookEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty() && self.events.is_empty()
    }

    /// Number of single-page turns this frame.
    pub fn turns(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BookEvent::PageTurned { .. }))
            .count()
    }
}
