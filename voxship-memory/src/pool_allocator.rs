use super::{AllocatorStats, BlockAllocator};

enum Slot<B> {
    Occupied(B),
    Free(Option<u32>),
}

/// A pool of fixed-size blocks addressed by `u32` index.
///
/// Freed blocks are kept on an intrusive LIFO free list and are recycled
/// before the pool grows. The pool grows in pages of `page_size` blocks up to
/// `max_blocks`; past that limit allocation panics with `"Out of memory"`.
pub struct PoolAllocator<B> {
    slots: Vec<Slot<B>>,
    free_head: Option<u32>,
    page_size: usize,
    max_blocks: usize,
    stats: AllocatorStats,
}

impl<B> PoolAllocator<B> {
    pub const DEFAULT_PAGE_SIZE: usize = 1024;

    #[inline(always)]
    pub const fn block_size() -> usize {
        std::mem::size_of::<B>()
    }

    #[inline(always)]
    pub const fn align() -> usize {
        std::mem::align_of::<B>()
    }

    /// Creates a pool that grows without bound, one page at a time.
    pub fn new(page_size: usize) -> Self {
        Self::with_limit(page_size, u32::MAX as usize)
    }

    /// Creates a pool that never holds more than `max_blocks` live blocks.
    pub fn with_limit(page_size: usize, max_blocks: usize) -> Self {
        assert!(page_size > 0, "Page size must be greater than 0");
        assert!(max_blocks > 0, "Capacity must be greater than 0");
        assert!(
            max_blocks <= u32::MAX as usize,
            "Capacity must be less than or equal to u32::MAX"
        );

        let slots: Vec<Slot<B>> = Vec::with_capacity(page_size.min(max_blocks));

        let stats = AllocatorStats {
            block_size: Self::block_size(),
            block_align: Self::align(),
            memory_budget: slots.capacity() * Self::block_size(),
            ..Default::default()
        };

        Self {
            slots,
            free_head: None,
            page_size,
            max_blocks,
            stats,
        }
    }

    #[inline(always)]
    pub fn stats(&self) -> &AllocatorStats {
        &self.stats
    }

    /// Number of blocks currently handed out.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.stats.allocated_blocks
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.stats.allocated_blocks == 0
    }

    /// Number of blocks the pool can hold before it has to grow.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    fn grow(&mut self) {
        let additional = self.page_size.min(self.max_blocks - self.slots.len());
        self.slots.reserve_exact(additional);
        self.stats.memory_budget = self.slots.capacity() * Self::block_size();

        log::trace!(
            "Pool grew by {} blocks to a capacity of {} ({} bytes)",
            additional,
            self.slots.capacity(),
            self.stats.memory_budget
        );
    }

    pub fn allocate(&mut self, block: B) -> u32 {
        self.stats.total_allocations += 1;
        self.stats.allocated_blocks += 1;

        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];

            let Slot::Free(next_free) = *slot else {
                unreachable!("Free list points at an occupied block: {index}");
            };

            self.free_head = next_free;
            *slot = Slot::Occupied(block);
            self.stats.free_blocks -= 1;

            return index;
        }

        if self.slots.len() >= self.max_blocks {
            panic!("Out of memory");
        }

        if self.slots.len() == self.slots.capacity() {
            self.grow();
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied(block));

        index
    }

    pub fn deallocate(&mut self, index: u32) {
        assert!(
            (index as usize) < self.slots.len(),
            "Block index out of bounds index: {} len: {}",
            index,
            self.slots.len()
        );

        let slot = &mut self.slots[index as usize];

        if matches!(slot, Slot::Free(_)) {
            panic!("Double free detected");
        }

        *slot = Slot::Free(self.free_head);
        self.free_head = Some(index);

        self.stats.allocated_blocks -= 1;
        self.stats.free_blocks += 1;
        self.stats.total_deallocations += 1;
    }

    #[inline(always)]
    pub fn get(&self, index: u32) -> &B {
        match &self.slots[index as usize] {
            Slot::Occupied(block) => block,
            Slot::Free(_) => panic!("Access to a freed block: {index}"),
        }
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: u32) -> &mut B {
        match &mut self.slots[index as usize] {
            Slot::Occupied(block) => block,
            Slot::Free(_) => panic!("Access to a freed block: {index}"),
        }
    }
}

impl<B> Default for PoolAllocator<B> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}

impl<B> std::fmt::Debug for PoolAllocator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("page_size", &self.page_size)
            .field("max_blocks", &self.max_blocks)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<B> BlockAllocator<B> for PoolAllocator<B> {
    #[inline(always)]
    fn allocate(&mut self, block: B) -> u32 {
        PoolAllocator::allocate(self, block)
    }

    #[inline(always)]
    fn deallocate(&mut self, index: u32) {
        PoolAllocator::deallocate(self, index);
    }

    #[inline(always)]
    fn get(&self, index: u32) -> &B {
        PoolAllocator::get(self, index)
    }

    #[inline(always)]
    fn get_mut(&mut self, index: u32) -> &mut B {
        PoolAllocator::get_mut(self, index)
    }
}
