use bevy::prelude::*;

use crate::components::{BookRoot, PageBone, PageRoot};
use crate::resources::{GoToPage, PageFlipped, PageSettled, PendingPoses, SetBookPages};
use crate::PageTurnEngine;
use page_turn_core::{BookCommand, BookEngine, BookEvent, Inputs};

/// Spawn one bone chain per page under `root`. Each bone is parented to the
/// previous one and sits one segment further from the spine.
pub fn spawn_page_rigs(commands: &mut Commands, root: Entity, engine: &BookEngine) -> Vec<Entity> {
    let mut pages = Vec::with_capacity(engine.page_count());
    for (rig, state) in engine.pages().iter().zip(engine.page_states()) {
        let page = commands
            .spawn((
                Name::new(format!("Page {}", rig.index())),
                PageRoot { index: rig.index() },
                SpatialBundle::from_transform(Transform::from_xyz(0.0, 0.0, state.depth_offset)),
            ))
            .id();
        commands.entity(root).add_child(page);

        let mut parent = page;
        for bone in rig.skeleton().bones() {
            let e = commands
                .spawn((
                    Name::new(format!("Page {} Bone {}", rig.index(), bone.index)),
                    PageBone {
                        page: rig.index(),
                        bone: bone.index,
                    },
                    SpatialBundle::from_transform(Transform::from_xyz(bone.rest_offset_x, 0.0, 0.0)),
                ))
                .id();
            commands.entity(parent).add_child(e);
            parent = e;
        }
        pages.push(page);
    }
    pages
}

/// Forward navigation events into the core, step it by the frame delta and
/// stage the resulting poses.
pub fn tick_book_system(
    mut eng: ResMut<PageTurnEngine>,
    time: Res<Time>,
    mut requests: EventReader<GoToPage>,
    mut replacements: EventReader<SetBookPages>,
    mut pending: ResMut<PendingPoses>,
    mut flipped: EventWriter<PageFlipped>,
    mut settled: EventWriter<PageSettled>,
) {
    let mut inputs = Inputs::default();
    for SetBookPages(pages) in replacements.read() {
        inputs.commands.push(BookCommand::SetPages {
            pages: pages.clone(),
        });
    }
    for GoToPage(page) in requests.read() {
        inputs.commands.push(BookCommand::GoToPage { page: *page });
    }

    let out = eng.0.update(time.delta_seconds(), inputs);
    pending.delayed_page = out.delayed_page;
    pending.poses.clear();
    pending.poses.extend(out.poses.iter().cloned());

    for event in &out.events {
        match event {
            BookEvent::PageTurned { from, to } => {
                flipped.send(PageFlipped {
                    from: *from,
                    to: *to,
                });
            }
            BookEvent::Settled { page } => {
                settled.send(PageSettled { page: *page });
            }
            _ => {}
        }
    }
}

/// Respawn page rigs under every [`BookRoot`] whose page count no longer
/// matches the engine. Texture changes alone keep the existing rigs.
pub fn sync_page_rigs_system(
    mut commands: Commands,
    eng: Res<PageTurnEngine>,
    mut books: Query<(Entity, &mut BookRoot)>,
) {
    let count = eng.0.page_count();
    for (root, mut book) in &mut books {
        if book.pages.len() == count {
            continue;
        }
        for page in book.pages.drain(..) {
            commands.entity(page).despawn_recursive();
        }
        book.pages = spawn_page_rigs(&mut commands, root, &eng.0);
    }
}

/// Write staged poses onto bone rotations and page stacking offsets.
pub fn apply_poses_system(
    pending: Res<PendingPoses>,
    mut bones: Query<(&PageBone, &mut Transform), Without<PageRoot>>,
    mut pages: Query<(&PageRoot, &mut Transform), Without<PageBone>>,
) {
    for (bone, mut tf) in &mut bones {
        let Some(pose) = pending.poses.get(bone.page) else {
            continue;
        };
        let y = pose.rotations_y.get(bone.bone).copied().unwrap_or(0.0);
        let x = pose.rotations_x.get(bone.bone).copied().unwrap_or(0.0);
        tf.rotation = Quat::from_euler(EulerRot::XYZ, x, y, 0.0);
    }
    for (page, mut tf) in &mut pages {
        if let Some(pose) = pending.poses.get(page.index) {
            tf.translation.z = pose.depth_offset;
        }
    }
}
