/// Index-addressed storage for fixed-size blocks.
///
/// Blocks are handed out as `u32` indices instead of pointers. An index stays
/// valid until it is passed to [`BlockAllocator::deallocate`], after which it
/// may be recycled by the next allocation.
///
/// Implementations either succeed or abort: running out of memory is fatal
/// and panics, there is no recoverable error path.
pub trait BlockAllocator<B> {
    /// Stores `block` and returns its index.
    fn allocate(&mut self, block: B) -> u32;

    /// Releases the block at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range or already free.
    fn deallocate(&mut self, index: u32);

    fn get(&self, index: u32) -> &B;

    fn get_mut(&mut self, index: u32) -> &mut B;
}
