mod allocator_stats;
mod block_allocator;
mod pool_allocator;

pub use allocator_stats::AllocatorStats;
pub use block_allocator::BlockAllocator;
pub use pool_allocator::PoolAllocator;
