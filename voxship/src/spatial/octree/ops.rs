use glam::IVec3;

use crate::VoxelTrait;

/// Level-of-detail reads: `level` 0 is voxel resolution, every level above
/// halves the resolution per axis.
pub trait OctreeOpsRead<T: VoxelTrait> {
    fn get(&self, position: IVec3, level: i32) -> T;
}

pub trait OctreeOpsWrite<T: VoxelTrait> {
    /// Overwrites the whole cell at `(position, level)` with `value`.
    fn set(&mut self, position: IVec3, level: i32, value: T);
}

pub trait OctreeOpsState {
    fn is_empty(&self) -> bool;
}

pub trait OctreeOps<T: VoxelTrait>: OctreeOpsRead<T> + OctreeOpsWrite<T> + OctreeOpsState {}

impl<T: VoxelTrait, O> OctreeOps<T> for O where
    O: OctreeOpsRead<T> + OctreeOpsWrite<T> + OctreeOpsState
{
}
