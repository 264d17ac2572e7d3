use std::hint::black_box;

use cgmath::Vector3;
use criterion::{criterion_group, criterion_main, Criterion};
use itertools::{iproduct, Itertools};
use voxel::{BoundaryFaces, Chunk, ChunkLocation, SimplexNoise, World, WorldConfig};

const SIZE: usize = 32;

fn locations() -> Vec<ChunkLocation> {
    iproduct!(-1..1, -1..1, -1..1)
        .map(|(x, y, z)| ChunkLocation::new(x, y, z))
        .collect_vec()
}

fn gen_chunks(noise: &SimplexNoise, locations: &[ChunkLocation]) -> Vec<Chunk<SIZE>> {
    locations
        .iter()
        .map(|&location| Chunk::generated(location, noise, BoundaryFaces::Hidden))
        .collect_vec()
}

fn criterion_benchmark(c: &mut Criterion) {
    let noise = SimplexNoise::new(0);
    let locations = locations();

    c.bench_function("generate chunks", |b| b.iter(|| gen_chunks(&noise, black_box(&locations))));

    let chunk = Chunk::<SIZE>::generated(ChunkLocation::ORIGIN, &noise, BoundaryFaces::Hidden);
    c.bench_function("build chunk mesh", |b| {
        b.iter(|| {
            let mut chunk = chunk.clone();
            chunk.mark_dirty();
            chunk.ensure_mesh().map(|mesh| mesh.num_quads())
        })
    });

    let mut group = c.benchmark_group("window shift");
    group.sample_size(10);
    for parallel_generation in [false, true] {
        let config = WorldConfig {
            parallel_generation,
            ..WorldConfig::default()
        };
        let mut world = World::<_, SIZE>::new(SimplexNoise::new(0), config);
        let mut step = 0.0;

        group.bench_function(format!("parallel={parallel_generation}"), |b| {
            b.iter(|| {
                step += SIZE as f32;
                world.update_focus(black_box(Vector3::new(0.0, 0.0, step)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
