//! Input contracts for the book engine.
//!
//! Adapters (web/Bevy) build these from UI navigation and the content
//! provider's page list, and pass them into BookEngine::update() each frame.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resources::TextureRef;

/// One sheet of the book as supplied by the content provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSpec {
    pub front: TextureRef,
    pub back: TextureRef,
}

impl PageSpec {
    pub fn new(front: impl Into<TextureRef>, back: impl Into<TextureRef>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Commands applied before stepping, in order.
    #[serde(default)]
    pub commands: Vec<BookCommand>,
}

impl Inputs {
    pub fn go_to_page(page: usize) -> Self {
        Self {
            commands: vec![BookCommand::GoToPage { page }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BookCommand {
    /// Navigate to a page; out-of-range values are clamped.
    GoToPage { page: usize },
    /// Replace the page list; the book closes back onto its cover.
    SetPages { pages: Vec<PageSpec> },
}

/// Parse a JSON array of `{ "front": .., "back": .. }` records.
pub fn parse_page_list_json(s: &str) -> Result<Vec<PageSpec>> {
    Ok(serde_json::from_str(s)?)
}
