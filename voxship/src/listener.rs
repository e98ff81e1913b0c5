//! Module `listener`
//!
//! Change notification for voxel octrees. Every net change of a leaf region
//! during a write reaches the tree's [`Listener`] exactly once, so dependent
//! systems (meshing, physics, ship systems) can update incrementally instead
//! of rebuilding from scratch.

use glam::{IVec3, IVec4};
use rustc_hash::FxHashSet;

use crate::world::CHUNK_DEPTH;

/// Receives voxel changes from an octree.
///
/// `position` holds the grid coordinate in `x, y, z` and the level in `w`; a
/// change at level `w` covers `2^w` voxels per axis. The listener runs
/// synchronously inside the write and must not touch the octree that calls it.
pub trait Listener<T> {
    fn update(&mut self, position: IVec4, old: T, new: T);
}

/// Ignores every change.
impl<T> Listener<T> for () {
    #[inline(always)]
    fn update(&mut self, _position: IVec4, _old: T, _new: T) {}
}

impl<T, L: Listener<T> + ?Sized> Listener<T> for &mut L {
    #[inline(always)]
    fn update(&mut self, position: IVec4, old: T, new: T) {
        (**self).update(position, old, new);
    }
}

impl<T, L: Listener<T> + ?Sized> Listener<T> for Box<L> {
    #[inline(always)]
    fn update(&mut self, position: IVec4, old: T, new: T) {
        (**self).update(position, old, new);
    }
}

/// Adapts a closure into a [`Listener`].
///
/// ```rust
/// use glam::{IVec3, IVec4};
/// use voxship::{FnListener, SparseVoxelOctree};
///
/// let mut changes = 0;
/// let listener = FnListener(|_: IVec4, _: u8, _: u8| changes += 1);
/// let mut octree = SparseVoxelOctree::new(0u8, listener);
/// octree.set(IVec3::new(1, 2, 3), 0, 7);
/// drop(octree);
/// assert_eq!(changes, 1);
/// ```
pub struct FnListener<F>(pub F);

impl<T, F: FnMut(IVec4, T, T)> Listener<T> for FnListener<F> {
    #[inline(always)]
    fn update(&mut self, position: IVec4, old: T, new: T) {
        (self.0)(position, old, new);
    }
}

impl<F> std::fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnListener")
    }
}

/// Collects the render chunks touched by voxel changes.
///
/// A chunk covers `2^chunk_depth` level 0 voxels per axis and is addressed by
/// its chunk grid coordinate. A change at or below the chunk level marks the
/// one chunk holding it. A coarser change is kept as a single region: its
/// cell in `x, y, z` and its height above the chunk level in `w`, so one
/// region spans `2^w` chunks per axis.
#[derive(Debug, Clone)]
pub struct DirtyChunks {
    chunk_depth: i32,
    chunks: FxHashSet<IVec3>,
    regions: FxHashSet<IVec4>,
}

impl DirtyChunks {
    pub fn new() -> Self {
        Self::with_chunk_depth(CHUNK_DEPTH)
    }

    pub fn with_chunk_depth(chunk_depth: i32) -> Self {
        assert!(chunk_depth >= 0, "Chunk depth must not be negative");

        Self {
            chunk_depth,
            chunks: FxHashSet::default(),
            regions: FxHashSet::default(),
        }
    }

    #[inline(always)]
    pub fn chunk_depth(&self) -> i32 {
        self.chunk_depth
    }

    pub fn mark(&mut self, position: IVec4) {
        let cell = position.truncate();
        let level = position.w;

        if level <= self.chunk_depth {
            self.chunks.insert(cell >> (self.chunk_depth - level));
        } else {
            self.regions.insert(cell.extend(level - self.chunk_depth));
        }
    }

    /// Whether `chunk` was marked on its own or lies inside a marked region.
    pub fn contains(&self, chunk: &IVec3) -> bool {
        self.chunks.contains(chunk)
            || self
                .regions
                .iter()
                .any(|region| *chunk >> region.w == region.truncate())
    }

    /// Chunks marked one by one.
    #[inline(always)]
    pub fn chunks(&self) -> impl Iterator<Item = &IVec3> {
        self.chunks.iter()
    }

    /// Coarse regions, see the type docs for their layout.
    #[inline(always)]
    pub fn regions(&self) -> impl Iterator<Item = &IVec4> {
        self.regions.iter()
    }

    /// Number of marked chunks plus marked regions.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chunks.len() + self.regions.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.regions.is_empty()
    }

    /// Hands out everything marked so far and starts afresh.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::with_chunk_depth(self.chunk_depth))
    }
}

impl Default for DirtyChunks {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listener<T> for DirtyChunks {
    #[inline(always)]
    fn update(&mut self, position: IVec4, _old: T, _new: T) {
        self.mark(position);
    }
}
