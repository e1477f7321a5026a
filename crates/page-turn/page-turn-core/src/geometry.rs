//! Shared page mesh with skinning data.
//!
//! A page is a thin box subdivided into columns along its width. The spine
//! sits at x = 0. Each vertex is bound to the bone at the start of its column
//! and to the next one, weighted by how far into the column it lies.

use serde::{Deserialize, Serialize};

use crate::config::PageDimensions;

/// Two-bone skin binding for one vertex.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinBinding {
    pub index: usize,
    pub next: usize,
    /// Weight of `next`; `index` takes `1 - weight`.
    pub weight: f32,
}

/// Material slots in box face order: +x, -x, +y, -y, +z, -z.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialSlotKind {
    OuterEdge,
    SpineEdge,
    TopEdge,
    BottomEdge,
    Front,
    Back,
}

impl MaterialSlotKind {
    pub const ORDER: [MaterialSlotKind; 6] = [
        MaterialSlotKind::OuterEdge,
        MaterialSlotKind::SpineEdge,
        MaterialSlotKind::TopEdge,
        MaterialSlotKind::BottomEdge,
        MaterialSlotKind::Front,
        MaterialSlotKind::Back,
    ];
}

/// A run of triangle indices drawn with one material slot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceGroup {
    pub slot: MaterialSlotKind,
    pub start: usize,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub positions: Vec<[f32; 3]>,
    pub skins: Vec<SkinBinding>,
    pub indices: Vec<u32>,
    pub groups: Vec<FaceGroup>,
    pub segments: usize,
    pub segment_width: f32,
}

/// Bind a vertex at `x` (distance from the spine) to its two nearest bones.
pub fn skin_binding(x: f32, segment_width: f32, segments: usize) -> SkinBinding {
    if x.is_nan() || x <= 0.0 || segment_width.is_nan() || segment_width <= 0.0 {
        return SkinBinding {
            index: 0,
            next: 1.min(segments),
            weight: 0.0,
        };
    }
    let column = (x / segment_width).floor();
    let index = (column as usize).min(segments);
    let next = (index + 1).min(segments);
    let weight = if index == segments {
        0.0
    } else {
        ((x - index as f32 * segment_width) / segment_width).clamp(0.0, 1.0 - f32::EPSILON)
    };
    SkinBinding {
        index,
        next,
        weight,
    }
}

impl PageGeometry {
    /// Vertex id for column `col`, row (0 bottom, 1 top) and face (0 front, 1 back).
    #[inline]
    fn vid(col: usize, row: usize, face: usize) -> u32 {
        ((col * 2 + row) * 2 + face) as u32
    }

    pub fn build(dims: &PageDimensions) -> Self {
        let segments = dims.segments.max(1);
        let segment_width = dims.width / segments as f32;
        let half_h = dims.height * 0.5;
        let half_d = dims.depth * 0.5;

        let mut positions = Vec::with_capacity((segments + 1) * 4);
        let mut skins = Vec::with_capacity((segments + 1) * 4);
        for col in 0..=segments {
            // Snap the last column to the exact width to avoid float drift.
            let x = if col == segments {
                dims.width
            } else {
                col as f32 * segment_width
            };
            for y in [-half_h, half_h] {
                for z in [half_d, -half_d] {
                    positions.push([x, y, z]);
                    skins.push(skin_binding(x, segment_width, segments));
                }
            }
        }

        let mut indices: Vec<u32> = Vec::new();
        let mut groups = Vec::with_capacity(6);
        fn quad(indices: &mut Vec<u32>, a: u32, b: u32, c: u32, d: u32) {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }

        for slot in MaterialSlotKind::ORDER {
            let start = indices.len();
            match slot {
                MaterialSlotKind::OuterEdge | MaterialSlotKind::SpineEdge => {
                    let col = if slot == MaterialSlotKind::OuterEdge { segments } else { 0 };
                    quad(
                        &mut indices,
                        Self::vid(col, 0, 0),
                        Self::vid(col, 0, 1),
                        Self::vid(col, 1, 1),
                        Self::vid(col, 1, 0),
                    );
                }
                MaterialSlotKind::TopEdge | MaterialSlotKind::BottomEdge => {
                    let row = usize::from(slot == MaterialSlotKind::TopEdge);
                    for col in 0..segments {
                        quad(
                            &mut indices,
                            Self::vid(col, row, 0),
                            Self::vid(col + 1, row, 0),
                            Self::vid(col + 1, row, 1),
                            Self::vid(col, row, 1),
                        );
                    }
                }
                MaterialSlotKind::Front => {
                    for col in 0..segments {
                        quad(
                            &mut indices,
                            Self::vid(col, 0, 0),
                            Self::vid(col + 1, 0, 0),
                            Self::vid(col + 1, 1, 0),
                            Self::vid(col, 1, 0),
                        );
                    }
                }
                MaterialSlotKind::Back => {
                    for col in 0..segments {
                        quad(
                            &mut indices,
                            Self::vid(col, 0, 1),
                            Self::vid(col, 1, 1),
                            Self::vid(col + 1, 1, 1),
                            Self::vid(col + 1, 0, 1),
                        );
                    }
                }
            }
            groups.push(FaceGroup {
                slot,
                start,
                count: indices.len() - start,
            });
        }

        Self {
            positions,
            skins,
            indices,
            groups,
            segments,
            segment_width,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn group(&self, slot: MaterialSlotKind) -> Option<&FaceGroup> {
        self.groups.iter().find(|g| g.slot == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_splits_between_neighbours() {
        let b = skin_binding(0.3125, 0.125, 30);
        assert_eq!(b.index, 2);
        assert_eq!(b.next, 3);
        assert_eq!(b.weight, 0.5);
    }

    #[test]
    fn binding_at_spine_and_tip() {
        let spine = skin_binding(0.0, 0.125, 30);
        assert_eq!((spine.index, spine.weight), (0, 0.0));
        let tip = skin_binding(3.75, 0.125, 30);
        assert_eq!(tip.index, 30);
        assert_eq!(tip.next, 30);
    }

    #[test]
    fn box_counts() {
        let g = PageGeometry::build(&PageDimensions::default());
        assert_eq!(g.vertex_count(), 31 * 4);
        assert_eq!(g.triangle_count(), 8 * 30 + 4);
        assert_eq!(g.groups.len(), 6);
        assert_eq!(g.group(MaterialSlotKind::Front).unwrap().count, 30 * 6);
        let max = g.vertex_count() as u32;
        assert!(g.indices.iter().all(|i| *i < max));
    }

    #[test]
    fn skins_stay_in_range() {
        let g = PageGeometry::build(&PageDimensions::default());
        for s in &g.skins {
            assert!(s.index <= g.segments && s.next <= g.segments);
            assert!((0.0..1.0).contains(&s.weight));
        }
    }
}
