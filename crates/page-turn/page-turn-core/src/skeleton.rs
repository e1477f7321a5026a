//! Bone chain for one page.
//!
//! The chain is stored as an arena: bone `i` keeps the index of its parent
//! (`i - 1`) instead of owning a pointer. Topology is fixed at build time;
//! only the local rotations change from frame to frame.

use serde::{Deserialize, Serialize};

/// One hinge of the page rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub index: usize,
    pub parent: Option<usize>,
    /// Local x offset from the parent bone (0 for the root).
    pub rest_offset_x: f32,
    /// Bend around the page's vertical axis.
    pub rotation_y: f32,
    /// Crease around the page's horizontal axis.
    pub rotation_x: f32,
}

/// Ordered, strictly linear chain of bones for a single page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    bones: Vec<Bone>,
    segment_width: f32,
}

type Mat3 = [[f32; 3]; 3];

const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0f32; 3]; 3];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c] + a[r][2] * b[2][c];
        }
    }
    out
}

fn apply(m: &Mat3, v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Local rotation of a bone: x then y, matching an XYZ Euler order.
fn local_rotation(x: f32, y: f32) -> Mat3 {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    mul(&rx, &ry)
}

impl Skeleton {
    /// Build `segment_count + 1` bones; bone 0 sits at the spine, every other
    /// bone one `segment_width` further along its parent's x axis.
    pub fn build(segment_count: usize, segment_width: f32) -> Self {
        let bones = (0..=segment_count)
            .map(|i| Bone {
                index: i,
                parent: i.checked_sub(1),
                rest_offset_x: if i == 0 { 0.0 } else { segment_width },
                rotation_y: 0.0,
                rotation_x: 0.0,
            })
            .collect();
        Self {
            bones,
            segment_width,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Mutable access in index order (root first).
    pub fn bones_mut(&mut self) -> impl Iterator<Item = &mut Bone> {
        self.bones.iter_mut()
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn rotations_y(&self) -> Vec<f32> {
        self.bones.iter().map(|b| b.rotation_y).collect()
    }

    pub fn rotations_x(&self) -> Vec<f32> {
        self.bones.iter().map(|b| b.rotation_x).collect()
    }

    /// Return every bone to the flat rest pose.
    pub fn reset_pose(&mut self) {
        for b in &mut self.bones {
            b.rotation_y = 0.0;
            b.rotation_x = 0.0;
        }
    }

    /// Joint positions in page space, composing each bone's rotation onto its
    /// parent's (parents are always visited first).
    pub fn world_points(&self) -> Vec<[f32; 3]> {
        let mut points = Vec::with_capacity(self.bones.len());
        let mut frames: Vec<Mat3> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let (parent_pos, parent_rot) = match bone.parent {
                Some(p) => (points[p], frames[p]),
                None => ([0.0; 3], IDENTITY),
            };
            let offset = apply(&parent_rot, [bone.rest_offset_x, 0.0, 0.0]);
            let pos = [
                parent_pos[0] + offset[0],
                parent_pos[1] + offset[1],
                parent_pos[2] + offset[2],
            ];
            let rot = mul(&parent_rot, &local_rotation(bone.rotation_x, bone.rotation_y));
            points.push(pos);
            frames.push(rot);
        }
        points
    }
}
