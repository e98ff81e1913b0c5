mod component;
mod traits;

pub use component::ComponentType;
pub use traits::{VoxelTrait, calc_majority};
