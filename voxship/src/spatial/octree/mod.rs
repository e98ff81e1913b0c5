mod iterator;
mod node;
mod ops;
mod svo;

pub use iterator::OctreeIterator;
pub use node::{NodeBlock, OctreeNode, is_uniform, major_voxel_type};
pub use ops::{OctreeOps, OctreeOpsRead, OctreeOpsState, OctreeOpsWrite};
pub use svo::{MAX_LEVEL, SparseVoxelOctree};
