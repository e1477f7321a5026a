use bevy::prelude::*;
use page_turn_core::{PagePose, PageSpec};

/// Poses computed this frame, staged for the apply system
/// (keeps ordering explicit: Compute -> Apply).
#[derive(Resource, Default)]
pub struct PendingPoses {
    pub delayed_page: usize,
    pub poses: Vec<PagePose>,
}

/// Navigate the book to a page.
#[derive(Event, Debug, Clone, Copy)]
pub struct GoToPage(pub usize);

/// Replace the book's page list.
#[derive(Event, Debug, Clone)]
pub struct SetBookPages(pub Vec<PageSpec>);

/// The visible page moved by one; hook the flip sound here.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFlipped {
    pub from: usize,
    pub to: usize,
}

/// The visible page reached the requested one.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettled {
    pub page: usize,
}
