/// # BlockId
///
/// Index of an 8-node child block inside the octree's block pool.
///
/// A node without children stores [`BlockId::NONE`] (all bits set) instead of
/// an index, so the link fits in 32 bits without an `Option` wrapper.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

impl BlockId {
    /// The absent child block.
    pub const NONE: BlockId = BlockId(u32::MAX);

    /// Maximum index a block can have (2^32 - 2)
    pub const MAX_INDEX: u32 = u32::MAX - 1;

    /// Wraps a pool index.
    ///
    /// # Panics
    ///
    /// Panics if `index` collides with the [`BlockId::NONE`] sentinel.
    #[inline(always)]
    pub const fn new(index: u32) -> Self {
        assert!(index <= Self::MAX_INDEX, "Block index out of range");
        BlockId(index)
    }

    /// Retrieves the pool index of this block
    #[inline(always)]
    pub const fn index(&self) -> u32 {
        debug_assert!(self.is_some());
        self.0
    }

    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        self.0 == Self::NONE.0
    }

    #[inline(always)]
    pub const fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts into `Option<u32>`, `None` for the sentinel.
    #[inline(always)]
    pub const fn get(&self) -> Option<u32> {
        if self.is_none() { None } else { Some(self.0) }
    }
}

impl Default for BlockId {
    #[inline(always)]
    fn default() -> Self {
        Self::NONE
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Id(NONE)")
        } else {
            write!(f, "Id({:08X})", self.0)
        }
    }
}
