mod chunk;
mod surface;

pub use chunk::{Chunk, ChunkFlags, ChunkNode, LEVEL_OFFSETS, NUM_CHUNK_NODES};
pub use surface::{Faces, VoxelVertex};

/// Levels of one render chunk below its root node.
pub const CHUNK_DEPTH: i32 = 5;

/// Voxels per axis of one render chunk.
pub const CHUNK_SIZE: i32 = 1 << CHUNK_DEPTH;
