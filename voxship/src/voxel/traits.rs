use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::utils::common::MAX_CHILDREN;

/// A value stored in a voxel octree.
///
/// `Default` is the empty voxel. Values are totally ordered so that the
/// majority vote over a node's children is deterministic.
pub trait VoxelTrait:
    Default + Copy + Clone + Hash + PartialEq + Eq + PartialOrd + Ord + Display + Debug
{
    /// Whether the voxel occupies space. Only solid voxels take part in the
    /// majority vote of their parent.
    #[inline(always)]
    fn is_solid(&self) -> bool {
        *self != Self::default()
    }

    /// Index used to pick a texture/material when the voxel is rendered.
    fn material_id(&self) -> usize;

    #[inline(always)]
    fn majority(children: &[Self]) -> Self {
        calc_majority(children)
    }
}

macro_rules! impl_voxel_trait_for_numerics {
    ($($t:ty),+) => {
        $(
            #[cfg(feature = "numeric_voxel_impls")]
            impl VoxelTrait for $t {
                #[inline(always)]
                fn material_id(&self) -> usize {
                    *self as usize
                }
            }
        )+
    };
}

impl_voxel_trait_for_numerics!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Majority value among the solid entries of `children`.
///
/// The solid values are sorted and the longest run of equal values wins. On a
/// tie the run seen first, i.e. the smallest value, wins.
///
/// # Panics
///
/// Panics if no child is solid.
#[inline(always)]
pub fn calc_majority<T>(children: &[T]) -> T
where
    T: VoxelTrait,
{
    assert!(children.len() <= MAX_CHILDREN);

    let mut values: [T; MAX_CHILDREN] = [T::default(); MAX_CHILDREN];
    let mut num = 0;

    for &child in children {
        if child.is_solid() {
            values[num] = child;
            num += 1;
        }
    }

    assert!(num > 0, "Majority vote needs at least one solid child");

    let values = &mut values[..num];
    values.sort_unstable();

    let mut best = values[0];
    let mut best_count = 0;
    let mut run_count = 0;

    for i in 0..num {
        if i > 0 && values[i] == values[i - 1] {
            run_count += 1;
        } else {
            run_count = 1;
        }

        if run_count > best_count {
            best = values[i];
            best_count = run_count;
        }
    }

    best
}
