use bevy::prelude::*;

/// Root of a rendered book. Page rigs are spawned as its children and tracked here.
#[derive(Component, Debug, Default)]
pub struct BookRoot {
    pub pages: Vec<Entity>,
}

/// Page group; its z translation follows the stacking offset.
#[derive(Component, Debug, Clone, Copy)]
pub struct PageRoot {
    pub index: usize,
}

/// One bone of a page rig.
#[derive(Component, Debug, Clone, Copy)]
pub struct PageBone {
    pub page: usize,
    pub bone: usize,
}
