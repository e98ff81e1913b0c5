use glam::IVec4;
use voxship_memory::BlockAllocator;

use crate::{
    BlockId, VoxelTrait,
    utils::common::{MAX_CHILDREN, child_position},
};

use super::node::{NodeBlock, OctreeNode};

/// Pre-order walk over every non-empty node of a
/// [`SparseVoxelOctree`](super::SparseVoxelOctree).
///
/// Yields `(position, value)` with the level in `position.w`; parents come
/// before their children and siblings in child index order.
pub struct OctreeIterator<'a, T, A> {
    allocator: &'a A,
    default_value: T,
    stack: Vec<(IVec4, OctreeNode<T>)>,
}

impl<'a, T, A> OctreeIterator<'a, T, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    pub(crate) fn new(allocator: &'a A, default_value: T, roots: BlockId, parent: IVec4) -> Self {
        let mut iterator = Self {
            allocator,
            default_value,
            stack: Vec::new(),
        };

        if roots.is_some() {
            iterator.push_block(roots, parent);
        }

        iterator
    }

    fn push_block(&mut self, block: BlockId, parent: IVec4) {
        let nodes = self.allocator.get(block.index());

        for index in (0..MAX_CHILDREN).rev() {
            let node = nodes[index];

            if node.value != self.default_value {
                self.stack.push((child_position(&parent, index), node));
            }
        }
    }
}

impl<T, A> Iterator for OctreeIterator<'_, T, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    type Item = (IVec4, T);

    fn next(&mut self) -> Option<Self::Item> {
        let (position, node) = self.stack.pop()?;

        if node.children.is_some() {
            self.push_block(node.children, position);
        }

        Some((position, node.value))
    }
}
