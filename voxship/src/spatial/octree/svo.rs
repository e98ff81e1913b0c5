use glam::{IVec3, IVec4};
use voxship_memory::{BlockAllocator, PoolAllocator};

use crate::{
    BlockId, VoxelTrait,
    listener::Listener,
    utils::common::{child_index, child_index_at, child_position},
};

use super::{
    OctreeOpsRead, OctreeOpsState, OctreeOpsWrite,
    iterator::OctreeIterator,
    node::{NodeBlock, OctreeNode, is_uniform, major_voxel_type, new_block},
};

/// Coarsest level a write may address.
pub const MAX_LEVEL: i32 = 30;

/// Sparse voxel octree with level-of-detail reads and change notification.
///
/// The tree grows upward on demand: the root block always covers the cells
/// `2 * root_position + offset` at `root_level` and is rebuilt one level up
/// whenever a write lands outside of it or above it. Nodes live in blocks of
/// eight handed out by `A`; a block whose eight nodes are childless and equal
/// is folded back into its parent, so the tree stays minimal after every
/// write.
///
/// Only non-negative positions are addressable.
pub struct SparseVoxelOctree<T, L = (), A = PoolAllocator<NodeBlock<T>>> {
    default_value: T,
    listener: L,
    allocator: A,
    roots: BlockId,
    root_position: IVec3,
    root_level: i32,
}

impl<T, L> SparseVoxelOctree<T, L>
where
    T: VoxelTrait,
{
    pub fn new(default_value: T, listener: L) -> Self {
        Self::with_allocator(default_value, listener, PoolAllocator::default())
    }
}

impl<T, L> Default for SparseVoxelOctree<T, L>
where
    T: VoxelTrait,
    L: Default,
{
    fn default() -> Self {
        Self::new(T::default(), L::default())
    }
}

impl<T, L, A> SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    /// # Panics
    ///
    /// Panics if `default_value` is solid.
    pub fn with_allocator(default_value: T, listener: L, allocator: A) -> Self {
        assert!(
            !default_value.is_solid(),
            "Default voxel value must not be solid"
        );

        Self {
            default_value,
            listener,
            allocator,
            roots: BlockId::NONE,
            root_position: IVec3::ZERO,
            root_level: -1,
        }
    }

    #[inline(always)]
    pub fn default_value(&self) -> T {
        self.default_value
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.roots.is_none()
    }

    /// Level of the root block's nodes, `None` before the first write.
    #[inline(always)]
    pub fn root_level(&self) -> Option<i32> {
        self.roots.is_some().then_some(self.root_level)
    }

    /// Parent coordinate of the root block at `root_level + 1`.
    #[inline(always)]
    pub fn root_position(&self) -> IVec3 {
        self.root_position
    }

    #[inline(always)]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    #[inline(always)]
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    #[inline(always)]
    fn block(&self, id: BlockId) -> &NodeBlock<T> {
        self.allocator.get(id.index())
    }

    #[inline(always)]
    fn root_parent(&self) -> IVec4 {
        self.root_position.extend(self.root_level + 1)
    }

    /// Value of the cell at `(position, level)`.
    ///
    /// Cells outside the tree and negative coordinates read as the default
    /// value. When the walk ends on a childless node above `level`, that
    /// node's uniform value is the answer; when `level` is above a structured
    /// region, the cached majority is returned.
    pub fn get(&self, position: IVec3, level: i32) -> T {
        if self.roots.is_none()
            || level < 0
            || level > self.root_level
            || position.min_element() < 0
        {
            return self.default_value;
        }

        let mut scale = self.root_level - level;
        let mut cell = position >> scale;

        if cell >> 1 != self.root_position {
            return self.default_value;
        }

        let mut node = &self.block(self.roots)[child_index(&cell)];

        while scale > 0 && node.children.is_some() {
            debug_assert!(node.value.is_solid(), "Empty node with children");

            scale -= 1;
            cell = position >> scale;
            node = &self.block(node.children)[child_index(&cell)];
        }

        node.value
    }

    #[inline(always)]
    pub fn get_voxel(&self, position: IVec3) -> T {
        self.get(position, 0)
    }

    /// Depth-first pre-order walk over all non-empty nodes.
    ///
    /// `callback` receives each node's position (level in `w`) and value; the
    /// node's children are visited only if it returns `true`.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(IVec4, T) -> bool,
    {
        if self.roots.is_none() {
            return;
        }

        self.traverse_block(self.roots, self.root_parent(), &mut callback);
    }

    fn traverse_block<F>(&self, block: BlockId, parent: IVec4, callback: &mut F)
    where
        F: FnMut(IVec4, T) -> bool,
    {
        for (index, node) in self.block(block).iter().enumerate() {
            if node.value == self.default_value {
                debug_assert!(node.children.is_none(), "Empty node with children");
                continue;
            }

            let position = child_position(&parent, index);

            if callback(position, node.value) && node.children.is_some() {
                self.traverse_block(node.children, position, callback);
            }
        }
    }

    /// Same order as [`traverse`](Self::traverse) without pruning.
    pub fn iter(&self) -> OctreeIterator<'_, T, A> {
        OctreeIterator::new(
            &self.allocator,
            self.default_value,
            self.roots,
            self.root_parent(),
        )
    }

    /// Number of node blocks reachable from the root.
    pub fn block_count(&self) -> usize {
        if self.roots.is_none() {
            return 0;
        }

        self.count_blocks(self.roots)
    }

    fn count_blocks(&self, block: BlockId) -> usize {
        1 + self
            .block(block)
            .iter()
            .filter(|node| node.children.is_some())
            .map(|node| self.count_blocks(node.children))
            .sum::<usize>()
    }

    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.block_count() * 8
    }

    pub fn memory_usage(&self) -> usize {
        self.block_count() * size_of::<NodeBlock<T>>()
    }
}

impl<T, L, A> SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    L: Listener<T>,
    A: BlockAllocator<NodeBlock<T>>,
{
    /// Overwrites the cell at `(position, level)` with `value`.
    ///
    /// Every leaf region whose value actually changes is reported to the
    /// listener once, at its own position and level. Writing the value a
    /// region already holds reports nothing.
    ///
    /// # Panics
    ///
    /// Panics if `level` is outside `0..=MAX_LEVEL`, if `position` has a
    /// negative component, or if the cell does not fit in `i32` voxel space.
    pub fn set(&mut self, position: IVec3, level: i32, value: T) {
        assert!(
            (0..=MAX_LEVEL).contains(&level),
            "Level {level} out of range [0, {MAX_LEVEL}]"
        );
        assert!(
            position.min_element() >= 0,
            "Negative positions are not supported: {position}"
        );
        assert!(
            ((position.max_element() as i64) << level) <= i32::MAX as i64,
            "Position {position} at level {level} is out of range"
        );

        if self.roots.is_none() {
            self.roots = self.allocate_block(new_block(self.default_value));
            self.root_position = position >> 1;
            self.root_level = level;
        }

        self.grow_to(position, level);

        let cell = position >> (self.root_level - level);
        self.set_node(
            self.roots,
            child_index(&cell),
            self.root_level,
            position,
            level,
            value,
        );
    }

    #[inline(always)]
    pub fn set_voxel(&mut self, position: IVec3, value: T) {
        self.set(position, 0, value);
    }

    /// Empties the tree, reporting every solid leaf region as reset to the
    /// default value, and releases all blocks.
    pub fn clear(&mut self) {
        if self.roots.is_none() {
            return;
        }

        let parent = self.root_parent();
        self.remove_subtree(self.roots, parent, Some(self.default_value));

        log::debug!(
            "Cleared octree rooted at {} level {}",
            self.root_position,
            self.root_level
        );

        self.roots = BlockId::NONE;
        self.root_position = IVec3::ZERO;
        self.root_level = -1;
    }

    #[inline(always)]
    fn allocate_block(&mut self, block: NodeBlock<T>) -> BlockId {
        BlockId::new(self.allocator.allocate(block))
    }

    #[inline(always)]
    fn free_block(&mut self, id: BlockId) {
        self.allocator.deallocate(id.index());
    }

    #[inline(always)]
    fn node_mut(&mut self, block: BlockId, index: usize) -> &mut OctreeNode<T> {
        &mut self.allocator.get_mut(block.index())[index]
    }

    fn grow_to(&mut self, position: IVec3, level: i32) {
        while level > self.root_level
            || (position >> (self.root_level - level)) >> 1 != self.root_position
        {
            self.reroot();
        }
    }

    /// Pushes the root block one level down under a fresh root block.
    fn reroot(&mut self) {
        assert!(self.root_level < MAX_LEVEL, "Octree root level overflow");

        let old_roots = self.roots;
        let old_block = *self.block(old_roots);

        let mut block = new_block(self.default_value);
        let index = child_index(&self.root_position);

        if is_uniform(&old_block) {
            block[index] = OctreeNode::leaf(old_block[0].value);
            self.free_block(old_roots);
        } else {
            block[index] = OctreeNode {
                value: major_voxel_type(&old_block),
                children: old_roots,
            };
        }

        self.roots = self.allocate_block(block);
        self.root_position = self.root_position >> 1;
        self.root_level += 1;

        log::trace!(
            "Octree re-rooted to level {} at {}",
            self.root_level,
            self.root_position
        );
    }

    fn set_node(
        &mut self,
        block: BlockId,
        index: usize,
        current_level: i32,
        position: IVec3,
        target_level: i32,
        value: T,
    ) {
        let node = self.block(block)[index];

        if current_level == target_level {
            let cell = position.extend(target_level);

            if node.children.is_some() {
                self.remove_subtree(node.children, cell, Some(value));
            } else if node.value != value {
                self.listener.update(cell, node.value, value);
            }

            *self.node_mut(block, index) = OctreeNode::leaf(value);
            return;
        }

        // Nothing to split: the region already holds the value.
        if node.children.is_none() && node.value == value {
            return;
        }

        let children = if node.children.is_some() {
            node.children
        } else {
            let children = self.allocate_block(new_block(node.value));
            self.node_mut(block, index).children = children;
            children
        };

        let child_level = current_level - 1;
        let child = child_index_at(&position, target_level, child_level);
        self.set_node(children, child, child_level, position, target_level, value);

        let child_block = *self.block(children);

        if is_uniform(&child_block) {
            self.free_block(children);
            *self.node_mut(block, index) = OctreeNode::leaf(child_block[0].value);
        } else {
            self.node_mut(block, index).value = major_voxel_type(&child_block);
        }
    }

    /// Frees `block` and everything below it. With a `replacement`, each
    /// childless node that differs from it is reported as changing to it.
    fn remove_subtree(&mut self, block: BlockId, parent: IVec4, replacement: Option<T>) {
        let nodes = *self.block(block);

        for (index, node) in nodes.iter().enumerate() {
            let position = child_position(&parent, index);

            if node.children.is_some() {
                self.remove_subtree(node.children, position, replacement);
            } else if let Some(new) = replacement
                && node.value != new
            {
                self.listener.update(position, node.value, new);
            }
        }

        self.free_block(block);
    }
}

impl<T, L, A> OctreeOpsRead<T> for SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    #[inline(always)]
    fn get(&self, position: IVec3, level: i32) -> T {
        SparseVoxelOctree::get(self, position, level)
    }
}

impl<T, L, A> OctreeOpsWrite<T> for SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    L: Listener<T>,
    A: BlockAllocator<NodeBlock<T>>,
{
    #[inline(always)]
    fn set(&mut self, position: IVec3, level: i32, value: T) {
        SparseVoxelOctree::set(self, position, level, value);
    }
}

impl<T, L, A> OctreeOpsState for SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    #[inline(always)]
    fn is_empty(&self) -> bool {
        SparseVoxelOctree::is_empty(self)
    }
}

impl<T, L, A> std::fmt::Debug for SparseVoxelOctree<T, L, A>
where
    T: VoxelTrait,
    A: BlockAllocator<NodeBlock<T>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseVoxelOctree")
            .field("default_value", &self.default_value)
            .field("root_position", &self.root_position)
            .field("root_level", &self.root_level)
            .field("blocks", &self.block_count())
            .finish()
    }
}
