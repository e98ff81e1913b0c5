use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::IVec3;
use voxship::{Chunk, DirtyChunks, SparseVoxelOctree};

pub fn generate_test_sphere<L: voxship::Listener<u8>>(
    octree: &mut SparseVoxelOctree<u8, L>,
    voxels_per_axis: i32,
    center: IVec3,
    radius: i32,
    value: u8,
) {
    let radius_squared = radius * radius;

    for y in 0..voxels_per_axis {
        for z in 0..voxels_per_axis {
            for x in 0..voxels_per_axis {
                let d = IVec3::new(x, y, z) - center;

                if d.length_squared() <= radius_squared {
                    octree.set_voxel(IVec3::new(x, y, z), value);
                }
            }
        }
    }
}

fn sphere_octree(voxels_per_axis: i32) -> SparseVoxelOctree<u8> {
    let mut octree = SparseVoxelOctree::new(0, ());
    let r = voxels_per_axis / 2;
    generate_test_sphere(&mut octree, voxels_per_axis, IVec3::splat(r - 1), r, 1);
    octree
}

fn benchmark_octree(c: &mut Criterion) {
    let voxels_per_axis = 64;

    c.bench_function("octree_set_value", |b| {
        b.iter(|| {
            let mut octree = SparseVoxelOctree::new(0u8, ());
            for x in 0..voxels_per_axis {
                for y in 0..voxels_per_axis {
                    for z in 0..voxels_per_axis {
                        octree.set_voxel(black_box(IVec3::new(x, y, z)), black_box(1));
                    }
                }
            }
            octree
        })
    });

    c.bench_function("octree_set_sum", |b| {
        b.iter(|| {
            let mut octree = SparseVoxelOctree::new(0u8, ());
            for x in 0..voxels_per_axis {
                for y in 0..voxels_per_axis {
                    for z in 0..voxels_per_axis {
                        octree.set_voxel(
                            black_box(IVec3::new(x, y, z)),
                            black_box(((x + y + z) % 255) as u8 + 1),
                        );
                    }
                }
            }
            octree
        })
    });

    c.bench_function("octree_set_sphere_dirty_chunks", |b| {
        b.iter(|| {
            let mut octree = SparseVoxelOctree::new(0u8, DirtyChunks::new());
            generate_test_sphere(
                &mut octree,
                voxels_per_axis,
                IVec3::splat(voxels_per_axis / 2 - 1),
                voxels_per_axis / 2,
                1,
            );
            octree.into_listener().len()
        })
    });

    let octree = sphere_octree(voxels_per_axis);

    c.bench_function("octree_get_lod", |b| {
        b.iter(|| {
            let mut solid = 0;
            for level in 0..4 {
                let cells = voxels_per_axis >> level;
                for x in 0..cells {
                    for y in 0..cells {
                        for z in 0..cells {
                            if octree.get(black_box(IVec3::new(x, y, z)), level) != 0 {
                                solid += 1;
                            }
                        }
                    }
                }
            }
            solid
        })
    });

    c.bench_function("octree_traverse", |b| {
        b.iter(|| {
            let mut nodes = 0;
            octree.traverse(|_, _| {
                nodes += 1;
                true
            });
            nodes
        })
    });

    c.bench_function("chunk_surface_from_octree", |b| {
        b.iter(|| {
            let chunk = Chunk::from_octree(&octree, IVec3::new(1, 1, 1), 5);
            chunk.surface_voxels().len()
        })
    });
}

criterion_group!(benches, benchmark_octree);
criterion_main!(benches);
