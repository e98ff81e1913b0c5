use crate::{BlockId, VoxelTrait, utils::common::MAX_CHILDREN};

/// A single octree node: the aggregate value of the region it covers plus an
/// optional link to its block of eight children.
///
/// A childless node stands for a region filled uniformly with `value`. A node
/// with children caches the majority of its solid children in `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeNode<T> {
    pub(crate) value: T,
    pub(crate) children: BlockId,
}

/// The unit of allocation: the eight children of one node.
pub type NodeBlock<T> = [OctreeNode<T>; MAX_CHILDREN];

impl<T: VoxelTrait> OctreeNode<T> {
    #[inline(always)]
    pub const fn leaf(value: T) -> Self {
        Self {
            value,
            children: BlockId::NONE,
        }
    }

    #[inline(always)]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline(always)]
    pub fn children(&self) -> BlockId {
        self.children
    }

    #[inline(always)]
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}

#[inline(always)]
pub(crate) fn new_block<T: VoxelTrait>(value: T) -> NodeBlock<T> {
    [OctreeNode::leaf(value); MAX_CHILDREN]
}

/// True iff all eight nodes are childless and hold the same value. A block
/// where any node has children of its own is never uniform.
#[inline(always)]
pub fn is_uniform<T: VoxelTrait>(block: &NodeBlock<T>) -> bool {
    let first = block[0].value;

    block
        .iter()
        .all(|node| node.children.is_none() && node.value == first)
}

/// Majority value of the solid nodes in `block`.
///
/// # Panics
///
/// Panics if no node in the block is solid.
#[inline(always)]
pub fn major_voxel_type<T: VoxelTrait>(block: &NodeBlock<T>) -> T {
    let values: [T; MAX_CHILDREN] = std::array::from_fn(|i| block[i].value);
    T::majority(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_is_uniform() {
        let block = new_block(3u8);
        assert!(is_uniform(&block));
        assert!(block.iter().all(|node| !node.has_children()));
        assert_eq!(block[5].value(), 3);
    }

    #[test]
    fn test_differing_values_are_not_uniform() {
        let mut block = new_block(3u8);
        block[7].value = 4;
        assert!(!is_uniform(&block));
    }

    #[test]
    fn test_structured_child_is_not_uniform() {
        let mut block = new_block(3u8);
        block[2].children = BlockId::new(9);
        assert!(!is_uniform(&block));

        let mut block = new_block(3u8);
        block[0].children = BlockId::new(9);
        assert!(!is_uniform(&block));
    }

    #[test]
    fn test_major_voxel_type() {
        let mut block = new_block(0u8);
        for (i, value) in [2u8, 3, 1, 2, 1, 3, 2, 1].into_iter().enumerate() {
            block[i].value = value;
        }
        assert_eq!(major_voxel_type(&block), 1);

        let mut block = new_block(0u8);
        block[6].value = 9;
        assert_eq!(major_voxel_type(&block), 9);
    }
}
