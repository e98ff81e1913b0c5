use glam::{IVec3, IVec4};

pub const MAX_CHILDREN: usize = 8;

/// Offsets of the eight children inside their parent, in child index order.
pub const CHILD_OFFSETS: [IVec3; MAX_CHILDREN] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 1),
    IVec3::new(0, 1, 1),
    IVec3::new(1, 1, 1),
];

/// Child slot `[0, 7]` selected by the lowest bit of each axis.
#[inline(always)]
pub const fn child_index(position: &IVec3) -> usize {
    ((position.x & 1) | ((position.y & 1) << 1) | ((position.z & 1) << 2)) as usize
}

/// Child slot of the cell `position` (given at `target_level`) inside a node
/// whose children live at `child_level`.
#[inline(always)]
pub const fn child_index_at(position: &IVec3, target_level: i32, child_level: i32) -> usize {
    let shift = child_level - target_level;

    (((position.x >> shift) & 1)
        | (((position.y >> shift) & 1) << 1)
        | (((position.z >> shift) & 1) << 2)) as usize
}

/// Grid position and level of child `index` of the node at `parent`.
#[inline(always)]
pub fn child_position(parent: &IVec4, index: usize) -> IVec4 {
    let offset = CHILD_OFFSETS[index];

    IVec4::new(
        (parent.x << 1) + offset.x,
        (parent.y << 1) + offset.y,
        (parent.z << 1) + offset.z,
        parent.w - 1,
    )
}
