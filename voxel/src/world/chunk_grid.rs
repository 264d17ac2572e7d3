use std::mem;
use std::sync::Arc;

use anyhow::Result;
use cgmath::Vector3;
use hashbrown::HashMap;
use itertools::Itertools;
use rayon::prelude::*;

use crate::rendering::{chunk_tint, Camera, MeshConsumer};
use crate::world::block::Block;
use crate::world::chunk::Chunk;
use crate::world::location::ChunkLocation;
use crate::world::streaming::ChunkStreamer;
use crate::world::worldgen::NoiseSource;
use crate::world::{WorldConfig, CHUNK_SIZE};

/// Outcome of moving the focus of a [World].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FocusUpdate {
    /// The focus chunk did not change, nothing was touched.
    Unchanged,
    /// Chunks still inside the window were kept and only the newly exposed ones were generated.
    Shifted {
        delta: Vector3<i32>,
        retained: usize,
        generated: usize,
    },
    /// The focus moved too far for any chunk to stay inside the window.
    Regenerated { generated: usize },
}

/// A fixed-size window of chunks centered on a focus chunk.
///
/// Array slot `(i, j, k)` holds the chunk at `(i, j, k) - dimensions / 2 + focus`. The window is never
/// mutated in place: moving the focus assembles a new chunk array and swaps it in.
pub struct World<N: NoiseSource, const SIZE: usize = CHUNK_SIZE> {
    config: WorldConfig,
    noise: Arc<N>,
    focus: ChunkLocation,
    chunks: Vec<Chunk<SIZE>>,
    revision: u64,
    streamer: Option<ChunkStreamer<SIZE>>,
}

impl<N: NoiseSource + 'static, const SIZE: usize> World<N, SIZE> {
    /// Generates the full window around the origin chunk.
    pub fn new(noise: N, config: WorldConfig) -> Self {
        Self::with_focus(noise, config, ChunkLocation::ORIGIN)
    }

    pub fn with_focus(noise: N, config: WorldConfig, focus: ChunkLocation) -> Self {
        let mut world = Self {
            config,
            noise: Arc::new(noise),
            focus,
            chunks: Vec::new(),
            revision: 0,
            streamer: None,
        };

        world.chunks = world.generate_window(focus);
        log::info!(
            "generated {} chunks around {:?} ({}x{}x{})",
            world.chunks.len(),
            *focus,
            config.dimensions.width,
            config.dimensions.height,
            config.dimensions.depth
        );

        world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn focus(&self) -> ChunkLocation {
        self.focus
    }

    /// Incremented every time the chunk array is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// The chunk array in slot order.
    pub fn chunks(&self) -> &[Chunk<SIZE>] {
        &self.chunks
    }

    pub fn chunks_mut(&mut self) -> &mut [Chunk<SIZE>] {
        &mut self.chunks
    }

    /// Grid location of the first array slot for a window around `focus`.
    pub fn window_origin(&self, focus: ChunkLocation) -> ChunkLocation {
        focus - ChunkLocation::from_vec(self.config.dimensions.half())
    }

    /// Grid location held by an array slot of the current window.
    pub fn grid_location_of(&self, slot: Vector3<i32>) -> ChunkLocation {
        self.window_origin(self.focus) + ChunkLocation::from_vec(slot)
    }

    /// All grid locations of a window around `focus`, in slot order.
    pub fn window_locations(&self, focus: ChunkLocation) -> impl Iterator<Item = ChunkLocation> {
        let origin = self.window_origin(focus);
        self.config
            .dimensions
            .slots()
            .map(move |slot| origin + ChunkLocation::from_vec(slot))
    }

    pub fn contains(&self, location: ChunkLocation) -> bool {
        self.slot_of(location).is_some()
    }

    /// Looks a chunk up by its grid location.
    pub fn chunk_at(&self, location: ChunkLocation) -> Option<&Chunk<SIZE>> {
        self.slot_of(location)
            .map(|slot| &self.chunks[self.config.dimensions.slot_index(slot)])
    }

    /// The block at an integer world voxel position, if its chunk is part of the window.
    pub fn block_at(&self, position: Vector3<i32>) -> Option<&Block> {
        let (location, local) = ChunkLocation::split_voxel_position::<SIZE>(position);
        self.chunk_at(location)?.block_at(local)
    }

    /// The focus chunk for a world position. Vertical streaming is not supported, so Y is always 0.
    pub fn focus_for_position(position: Vector3<f32>) -> ChunkLocation {
        let location = ChunkLocation::from_world_position::<SIZE>(position);
        ChunkLocation::new(location.x, 0, location.z)
    }

    pub fn update_focus(&mut self, position: Vector3<f32>) -> FocusUpdate {
        self.move_focus(Self::focus_for_position(position))
    }

    pub fn update_from_camera(&mut self, camera: &impl Camera) -> FocusUpdate {
        self.update_focus(camera.world_position())
    }

    /// Recenters the window on `target`.
    ///
    /// All axes are handled at once: every chunk that is still inside the new window is moved over and only the
    /// newly exposed chunks are generated. If the focus moves by at least the window size along any axis, nothing
    /// can be kept and the whole window is regenerated.
    pub fn move_focus(&mut self, target: ChunkLocation) -> FocusUpdate {
        if target == self.focus {
            return FocusUpdate::Unchanged;
        }

        if let Some(streamer) = &mut self.streamer {
            streamer.cancel();
        }

        let delta = *(target - self.focus);
        let dimensions = self.config.dimensions.to_vec();
        let too_far = delta.x.abs() >= dimensions.x || delta.y.abs() >= dimensions.y || delta.z.abs() >= dimensions.z;

        if too_far {
            return self.regenerate(target);
        }

        let missing = self.missing_locations(target);
        let fresh = self.generate_fresh(&missing);
        let (retained, generated) = self.swap_in_window(target, fresh);

        log::debug!(
            "shifted window by {:?} to {:?}: kept {} chunks, generated {}",
            delta,
            *target,
            retained,
            generated
        );

        FocusUpdate::Shifted {
            delta,
            retained,
            generated,
        }
    }

    /// Discards every chunk and generates the window around `target` from scratch.
    pub fn regenerate(&mut self, target: ChunkLocation) -> FocusUpdate {
        if let Some(streamer) = &mut self.streamer {
            streamer.cancel();
        }

        self.chunks.clear();
        self.chunks = self.generate_window(target);
        self.focus = target;
        self.revision += 1;

        log::info!("regenerated all {} chunks around {:?}", self.chunks.len(), *target);

        FocusUpdate::Regenerated {
            generated: self.chunks.len(),
        }
    }

    /// Starts generating the chunks for the focus at `position` in the background.
    /// The current window stays in place until [World::poll_streaming] swaps in the new one.
    /// Returns whether a new request was issued.
    pub fn request_focus_update(&mut self, position: Vector3<f32>) -> bool {
        let target = Self::focus_for_position(position);
        let missing = self.missing_locations(target);
        let num_workers = self.config.background_workers;
        let streamer = self
            .streamer
            .get_or_insert_with(|| ChunkStreamer::new(num_workers));

        if target == self.focus {
            streamer.cancel();
            return false;
        }

        if streamer.pending_target() == Some(target) {
            return false;
        }

        log::debug!("streaming {} chunks for focus {:?}", missing.len(), *target);
        streamer.request(target, missing, &self.noise, self.config.boundary_faces);

        true
    }

    /// Swaps in the window requested by [World::request_focus_update] once all of its chunks are ready.
    pub fn poll_streaming(&mut self) -> Option<FocusUpdate> {
        let pending = self.streamer.as_mut()?.poll()?;
        let target = pending.target;
        let delta = *(target - self.focus);

        let (retained, generated) = self.swap_in_window(target, pending.into_received());
        log::debug!("streamed in window around {:?}: kept {} chunks, generated {}", *target, retained, generated);

        Some(if retained == 0 {
            FocusUpdate::Regenerated { generated }
        } else {
            FocusUpdate::Shifted {
                delta,
                retained,
                generated,
            }
        })
    }

    pub fn is_streaming(&self) -> bool {
        self.streamer
            .as_ref()
            .is_some_and(|streamer| streamer.pending_target().is_some())
    }

    /// Blocks until the background workers are idle.
    pub fn wait_for_streaming(&self) {
        if let Some(streamer) = &self.streamer {
            streamer.wait();
        }
    }

    /// Hands every chunk's mesh to the consumer, rebuilding stale meshes first.
    /// Nothing is submitted if any mesh fails to build. Returns the number of submitted chunks.
    pub fn render(&mut self, camera: &impl Camera, consumer: &mut impl MeshConsumer) -> Result<usize> {
        for chunk in &mut self.chunks {
            chunk.ensure_mesh()?;
        }

        let view_projection = camera.view_projection();
        let mut submitted = 0;

        for chunk in &self.chunks {
            let Some(mesh) = chunk.mesh() else {
                continue;
            };
            if mesh.is_empty() && !self.config.render_empty_chunks {
                continue;
            }

            let transform = view_projection * chunk.model_matrix();
            let tint = chunk_tint(chunk.location());

            consumer.submit(mesh.vertex_data(), &mesh.indices, transform, tint);
            submitted += 1;
        }

        Ok(submitted)
    }

    pub fn block_count(&self) -> usize {
        self.chunks
            .iter()
            .map(Chunk::block_count)
            .sum()
    }

    pub fn total_vertices(&self) -> usize {
        self.chunks
            .iter()
            .filter_map(Chunk::mesh)
            .map(|mesh| mesh.vertices.len())
            .sum()
    }

    pub fn total_indices(&self) -> usize {
        self.chunks
            .iter()
            .filter_map(Chunk::mesh)
            .map(|mesh| mesh.indices.len())
            .sum()
    }

    fn slot_of(&self, location: ChunkLocation) -> Option<Vector3<i32>> {
        let slot = *(location - self.window_origin(self.focus));
        self.config
            .dimensions
            .contains(slot)
            .then_some(slot)
    }

    /// Locations of a window around `target` that are not part of the current window.
    fn missing_locations(&self, target: ChunkLocation) -> Vec<ChunkLocation> {
        self.window_locations(target)
            .filter(|&location| !self.contains(location))
            .collect()
    }

    fn generate_window(&self, focus: ChunkLocation) -> Vec<Chunk<SIZE>> {
        let locations = self.window_locations(focus).collect_vec();
        self.generate_chunks(&locations)
    }

    /// Generates chunks in the given order, on the rayon pool if parallel generation is enabled.
    fn generate_chunks(&self, locations: &[ChunkLocation]) -> Vec<Chunk<SIZE>> {
        let boundary_faces = self.config.boundary_faces;
        let noise = &*self.noise;

        if self.config.parallel_generation {
            locations
                .par_iter()
                .map(|&location| Chunk::generated(location, noise, boundary_faces))
                .collect()
        } else {
            locations
                .iter()
                .map(|&location| Chunk::generated(location, noise, boundary_faces))
                .collect()
        }
    }

    fn generate_fresh(&self, locations: &[ChunkLocation]) -> HashMap<ChunkLocation, Chunk<SIZE>> {
        self.generate_chunks(locations)
            .into_iter()
            .map(|chunk| (chunk.location(), chunk))
            .collect()
    }

    /// Builds the window around `target` from the chunks of the current window and `fresh` chunks, then swaps it in.
    /// Returns how many chunks were kept and how many were taken from `fresh`.
    fn swap_in_window(&mut self, target: ChunkLocation, mut fresh: HashMap<ChunkLocation, Chunk<SIZE>>) -> (usize, usize) {
        let dimensions = self.config.dimensions;
        let old_origin = self.window_origin(self.focus);
        let new_locations = self.window_locations(target).collect_vec();
        let mut old: Vec<Option<Chunk<SIZE>>> = mem::take(&mut self.chunks)
            .into_iter()
            .map(Some)
            .collect();

        let mut retained = 0;
        let mut generated = 0;
        let chunks = new_locations
            .into_iter()
            .map(|location| {
                let old_slot = *(location - old_origin);
                let kept = dimensions
                    .contains(old_slot)
                    .then(|| old[dimensions.slot_index(old_slot)].take())
                    .flatten();

                if let Some(chunk) = kept {
                    retained += 1;
                    return chunk;
                }

                generated += 1;
                fresh.remove(&location).unwrap_or_else(|| {
                    log::warn!("chunk {:?} was not generated in advance", *location);
                    Chunk::generated(location, &*self.noise, self.config.boundary_faces)
                })
            })
            .collect();

        self.chunks = chunks;
        self.focus = target;
        self.revision += 1;

        (retained, generated)
    }
}
