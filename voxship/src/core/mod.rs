mod block_id;

pub use block_id::BlockId;
