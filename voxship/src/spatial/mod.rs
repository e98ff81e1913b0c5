mod octree;

pub use octree::{
    MAX_LEVEL, NodeBlock, OctreeIterator, OctreeNode, OctreeOps, OctreeOpsRead, OctreeOpsState,
    OctreeOpsWrite, SparseVoxelOctree, is_uniform, major_voxel_type,
};
