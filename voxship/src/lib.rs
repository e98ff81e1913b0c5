//! Sparse voxel octrees for voxel ships and asteroids.
//!
//! [`SparseVoxelOctree`] stores an unbounded, sparse voxel volume with
//! level-of-detail reads and reports every change to a [`Listener`]. The
//! fixed-depth [`Chunk`] keeps one `32³` render chunk in a flat array and
//! extracts its visible surface.

pub mod core;
pub mod listener;
pub mod spatial;
pub mod utils;
pub mod voxel;
pub mod world;

pub use self::core::BlockId;
pub use listener::{DirtyChunks, FnListener, Listener};
pub use spatial::{
    MAX_LEVEL, NodeBlock, OctreeNode, OctreeOps, OctreeOpsRead, OctreeOpsState, OctreeOpsWrite,
    SparseVoxelOctree,
};
pub use voxel::{ComponentType, VoxelTrait};
pub use world::{CHUNK_DEPTH, CHUNK_SIZE, Chunk, ChunkNode, VoxelVertex};

pub use voxship_memory::{AllocatorStats, BlockAllocator, PoolAllocator};
