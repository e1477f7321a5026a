//! Bevy adapter for page-turn-core.
//!
//! The plugin owns a [`BookEngine`] as a resource, steps it once per frame and
//! writes the resulting bone rotations onto spawned bone entities. Spawn an
//! entity with [`BookRoot`] to get one bone hierarchy per page underneath it.

use bevy::prelude::*;
use page_turn_core::{BookEngine, Config};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{BookRoot, PageBone, PageRoot};
pub use resources::{GoToPage, PageFlipped, PageSettled, PendingPoses, SetBookPages};

#[derive(Resource)]
pub struct PageTurnEngine(pub BookEngine);

#[derive(Default)]
pub struct PageTurnPlugin {
    pub config: Config,
}

impl Plugin for PageTurnPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PageTurnEngine(BookEngine::new(self.config.clone())))
            .init_resource::<PendingPoses>()
            .add_event::<GoToPage>()
            .add_event::<SetBookPages>()
            .add_event::<PageFlipped>()
            .add_event::<PageSettled>()
            .add_systems(
                Update,
                (
                    systems::tick_book_system,
                    systems::sync_page_rigs_system,
                    systems::apply_poses_system,
                )
                    .chain(),
            );
    }
}
