use bitflags::bitflags;
use glam::IVec3;

use crate::{
    VoxelTrait,
    spatial::OctreeOpsRead,
    utils::common::{CHILD_OFFSETS, MAX_CHILDREN},
};

use super::{
    CHUNK_DEPTH, CHUNK_SIZE,
    surface::{Faces, VoxelVertex},
};

/// First node of each level in the flat node array.
pub const LEVEL_OFFSETS: [usize; CHUNK_DEPTH as usize + 1] = [0, 1, 9, 73, 585, 4681];

/// `8^0 + 8^1 + ... + 8^5`
pub const NUM_CHUNK_NODES: usize = 37449;

bitflags! {
  #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
  pub struct ChunkFlags: u8 {
    /// No child kind is empty.
    const SOLID = 0b01;
    /// Every voxel below holds the node's kind.
    const UNIFORM = 0b10;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkNode<T> {
    kind: T,
    flags: ChunkFlags,
}

impl<T: VoxelTrait> ChunkNode<T> {
    /// A node whose whole region holds `kind`.
    #[inline(always)]
    pub fn uniform(kind: T) -> Self {
        let flags = if kind.is_solid() {
            ChunkFlags::SOLID | ChunkFlags::UNIFORM
        } else {
            ChunkFlags::UNIFORM
        };

        Self { kind, flags }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self::uniform(T::default())
    }

    #[inline(always)]
    pub fn kind(&self) -> T {
        self.kind
    }

    #[inline(always)]
    pub fn flags(&self) -> ChunkFlags {
        self.flags
    }

    #[inline(always)]
    pub fn is_solid(&self) -> bool {
        self.flags.contains(ChunkFlags::SOLID)
    }

    #[inline(always)]
    pub fn is_uniform(&self) -> bool {
        self.flags.contains(ChunkFlags::UNIFORM)
    }
}

impl<T: VoxelTrait> Default for ChunkNode<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[inline(always)]
fn node_index(position: IVec3, level: i32) -> usize {
    let size = 1 << level;

    LEVEL_OFFSETS[level as usize] + (position.x + size * (position.y + size * position.z)) as usize
}

#[inline(always)]
fn in_level(position: IVec3, level: i32) -> bool {
    position.cmpge(IVec3::ZERO).all() && position.cmplt(IVec3::splat(1 << level)).all()
}

/// Boyer-Moore majority vote: the surviving candidate and its final count.
/// A count of 8 means all kinds are equal.
fn vote<T: VoxelTrait>(kinds: &[T; MAX_CHILDREN]) -> (T, usize) {
    let mut candidate = kinds[0];
    let mut count = 1;

    for &kind in &kinds[1..] {
        if kind == candidate {
            count += 1;
        } else {
            count -= 1;
        }

        if count == 0 {
            candidate = kind;
            count = 1;
        }
    }

    (candidate, count)
}

/// A fixed-depth octree over one 32³ render chunk.
///
/// All six levels are stored in one flat array. Level 0 is the single node
/// covering the whole chunk and level 5 holds the individual voxels; note
/// that levels count downward here, unlike in
/// [`SparseVoxelOctree`](crate::SparseVoxelOctree).
#[derive(Clone)]
pub struct Chunk<T> {
    nodes: Box<[ChunkNode<T>]>,
}

impl<T: VoxelTrait> Chunk<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![ChunkNode::empty(); NUM_CHUNK_NODES].into_boxed_slice(),
        }
    }

    /// Samples the `32³` voxels below the octree cell at
    /// `(root_position, root_level)`.
    ///
    /// # Panics
    ///
    /// Panics if `root_level` is below the chunk depth.
    pub fn from_octree<O>(octree: &O, root_position: IVec3, root_level: i32) -> Self
    where
        O: OctreeOpsRead<T> + ?Sized,
    {
        assert!(
            root_level >= CHUNK_DEPTH,
            "Chunk root level {root_level} must be at least {CHUNK_DEPTH}"
        );

        let mut chunk = Self::new();
        let level = root_level - CHUNK_DEPTH;
        let origin = root_position << CHUNK_DEPTH;

        for z in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let local = IVec3::new(x, y, z);
                    let kind = octree.get(origin + local, level);
                    chunk.nodes[node_index(local, CHUNK_DEPTH)] = ChunkNode::uniform(kind);
                }
            }
        }

        chunk.rebuild();

        log::debug!("Sampled chunk from octree cell {root_position} at level {root_level}");

        chunk
    }

    /// Node at `(position, level)`; positions outside the chunk read as
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not in `0..=5`.
    pub fn get(&self, position: IVec3, level: i32) -> ChunkNode<T> {
        assert!(
            (0..=CHUNK_DEPTH).contains(&level),
            "Chunk level {level} out of range [0, {CHUNK_DEPTH}]"
        );

        if !in_level(position, level) {
            return ChunkNode::empty();
        }

        self.nodes[node_index(position, level)]
    }

    #[inline(always)]
    pub fn get_voxel(&self, position: IVec3) -> T {
        self.get(position, CHUNK_DEPTH).kind
    }

    /// Fills the region of `(position, level)` with `kind`, down to the
    /// voxels, and re-aggregates every ancestor.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not in `0..=5` or `position` is outside the
    /// chunk.
    pub fn set(&mut self, position: IVec3, level: i32, kind: T) {
        assert!(
            (0..=CHUNK_DEPTH).contains(&level),
            "Chunk level {level} out of range [0, {CHUNK_DEPTH}]"
        );
        assert!(
            in_level(position, level),
            "Position {position} is outside of chunk level {level}"
        );

        let node = ChunkNode::uniform(kind);

        for fill_level in level..=CHUNK_DEPTH {
            let shift = fill_level - level;
            let min = position << shift;
            let size = 1 << shift;

            for z in 0..size {
                for y in 0..size {
                    for x in 0..size {
                        self.nodes[node_index(min + IVec3::new(x, y, z), fill_level)] = node;
                    }
                }
            }
        }

        let mut cell = position;
        let mut child_level = level;

        while child_level > 0 {
            cell = cell >> 1;
            child_level -= 1;
            self.update_node(cell, child_level);
        }
    }

    #[inline(always)]
    pub fn set_voxel(&mut self, position: IVec3, kind: T) {
        self.set(position, CHUNK_DEPTH, kind);
    }

    /// Recomputes every aggregate node from the voxel level up.
    pub fn rebuild(&mut self) {
        for level in (0..CHUNK_DEPTH).rev() {
            let size = 1 << level;

            for z in 0..size {
                for y in 0..size {
                    for x in 0..size {
                        self.update_node(IVec3::new(x, y, z), level);
                    }
                }
            }
        }
    }

    fn update_node(&mut self, position: IVec3, level: i32) {
        let base = position << 1;
        let children: [ChunkNode<T>; MAX_CHILDREN] = std::array::from_fn(|i| {
            self.nodes[node_index(base + CHILD_OFFSETS[i], level + 1)]
        });
        let kinds = children.map(|child| child.kind);

        let (kind, count) = vote(&kinds);

        let mut flags = ChunkFlags::empty();
        flags.set(
            ChunkFlags::SOLID,
            kinds.iter().all(|kind| kind.is_solid()),
        );
        flags.set(
            ChunkFlags::UNIFORM,
            count == MAX_CHILDREN && children.iter().all(ChunkNode::is_uniform),
        );

        self.nodes[node_index(position, level)] = ChunkNode { kind, flags };
    }

    /// Largest uniform solid nodes with at least one exposed face.
    ///
    /// The walk stops at empty uniform nodes and does not descend into
    /// uniform ones; a face counts as exposed when the same-level neighbour
    /// behind it is not solid or lies outside the chunk.
    pub fn surface_voxels(&self) -> Vec<VoxelVertex> {
        let mut vertices = Vec::new();
        self.collect_surface(IVec3::ZERO, 0, &mut vertices);
        vertices
    }

    fn collect_surface(&self, position: IVec3, level: i32, vertices: &mut Vec<VoxelVertex>) {
        let node = self.get(position, level);

        if !node.kind.is_solid() && node.is_uniform() {
            return;
        }

        let has_children = !node.is_uniform() && level < CHUNK_DEPTH;

        if !has_children {
            let mut faces = Faces::empty();

            for (face, direction) in Faces::NEIGHBOURS {
                if !self.get(position + direction, level).is_solid() {
                    faces |= face;
                }
            }

            if !faces.is_empty() {
                vertices.push(VoxelVertex::new(
                    faces,
                    CHUNK_DEPTH - level,
                    position,
                    node.kind.material_id(),
                ));
            }

            return;
        }

        for offset in CHILD_OFFSETS {
            self.collect_surface((position << 1) + offset, level + 1, vertices);
        }
    }
}

impl<T: VoxelTrait> Default for Chunk<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: VoxelTrait> std::fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("root", &self.nodes[0])
            .finish()
    }
}
