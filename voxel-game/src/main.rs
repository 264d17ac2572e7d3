mod camera;
mod timing;

use anyhow::Result;
use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, Vector3};
use clap::Parser;
use log::LevelFilter;
use voxel::{BoundaryFaces, FocusUpdate, GridDimensions, MeshConsumer, SimplexNoise, World, WorldConfig, CHUNK_SIZE};

use crate::camera::{FlyCamera, Projection};
use crate::timing::TimerManager;

/// Flies a camera across a noise-generated voxel world and reports what the chunk window does.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Chunks along the X axis of the window
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Chunks along the Y axis of the window
    #[arg(long, default_value_t = 2)]
    height: usize,

    /// Chunks along the Z axis of the window
    #[arg(long, default_value_t = 4)]
    depth: usize,

    #[arg(long, default_value_t = 0)]
    seed: u32,

    /// Number of simulated frames
    #[arg(long, default_value_t = 64)]
    steps: u32,

    /// Distance flown per frame in voxels
    #[arg(long, default_value_t = 16.0)]
    speed: f32,

    /// Flight direction in degrees, 0 is +X
    #[arg(long, default_value_t = 30.0)]
    heading: f32,

    /// Mesh the faces on chunk borders instead of leaving them out
    #[arg(long)]
    exposed_boundaries: bool,

    /// Generate new chunks on all cores
    #[arg(long)]
    parallel: bool,

    /// Stream new chunks on worker threads instead of blocking the frame
    #[arg(long)]
    background: bool,

    #[arg(long, default_value_t = 4)]
    workers: usize,
}

impl Args {
    fn world_config(&self) -> WorldConfig {
        WorldConfig {
            dimensions: GridDimensions::new(self.width, self.height, self.depth),
            boundary_faces: if self.exposed_boundaries {
                BoundaryFaces::Exposed
            } else {
                BoundaryFaces::Hidden
            },
            parallel_generation: self.parallel,
            render_empty_chunks: false,
            background_workers: self.workers,
        }
    }
}

/// Stands in for a GPU upload and only records what would have been drawn.
#[derive(Default)]
struct FrameStats {
    chunks: usize,
    quads: usize,
    vertex_bytes: usize,
    visible_chunks: usize,
}

impl MeshConsumer for FrameStats {
    fn submit(&mut self, vertices: &[f32], indices: &[u32], transform: Matrix4<f32>, _tint: Vector3<f32>) {
        self.chunks += 1;
        self.quads += indices.len() / 6;
        self.vertex_bytes += std::mem::size_of_val(vertices);

        // Chunk origin in clip space
        let origin = transform.w;
        if origin.w > 0.0 && origin.z <= origin.w {
            self.visible_chunks += 1;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    log::info!("starting with {:?}", args);

    let mut timer = TimerManager::new();

    timer.start("initial_generation");
    let mut world = World::<_, CHUNK_SIZE>::new(SimplexNoise::new(args.seed), args.world_config());
    timer.end("initial_generation");
    log::info!(
        "generated {} chunks with seed {}",
        world.chunks().len(),
        world.noise().seed()
    );

    let mut camera = FlyCamera::new(
        Point3::new(0.0, CHUNK_SIZE as f32 * 0.75, 0.0),
        Deg(args.heading),
        Deg(-20.0),
        Projection::default(),
    );

    let mut shifts = 0;
    let mut regenerations = 0;

    for step in 0..args.steps {
        timer.start("frame");
        camera.advance(args.speed);

        timer.start("update_world");
        let update = if args.background {
            world.request_focus_update(camera.position.to_vec());
            world.poll_streaming()
        } else {
            Some(world.update_from_camera(&camera))
        };
        timer.end("update_world");

        match update {
            Some(FocusUpdate::Shifted { .. }) => shifts += 1,
            Some(FocusUpdate::Regenerated { .. }) => regenerations += 1,
            Some(FocusUpdate::Unchanged) | None => {}
        }

        timer.start("render");
        let mut stats = FrameStats::default();
        world.render(&camera, &mut stats)?;
        timer.end("render");

        timer.end("frame");

        log::debug!(
            "step {step}: focus {:?}, {} chunks submitted ({} in front), {} quads, {} KiB of vertices",
            *world.focus(),
            stats.chunks,
            stats.visible_chunks,
            stats.quads,
            stats.vertex_bytes / 1024
        );
    }

    if world.is_streaming() {
        log::info!("waiting for background generation to finish");
        world.wait_for_streaming();
        if let Some(update) = world.poll_streaming() {
            log::info!("final streamed update: {:?}", update);
        }
    }

    log::info!(
        "flew to {:?}: focus {:?}, {} shifts, {} regenerations, {} blocks, {} vertices, {} triangles",
        camera.position,
        *world.focus(),
        shifts,
        regenerations,
        world.block_count(),
        world.total_vertices(),
        world.total_indices() / 3
    );

    for (name, total) in timer.get_all() {
        log::info!(
            "{name:>20}: {:>4} runs, mean {:>8.3} ms, max {:>8.3} ms",
            total.count,
            total.mean_secs() * 1000.0,
            total.max_secs * 1000.0
        );
    }

    Ok(())
}
