use std::fmt::{Debug, Formatter};

use anyhow::{bail, Context, Result};
use cgmath::Matrix4;
use enum_map::EnumMap;

use crate::world::block::Block;
use crate::world::direction::Direction;
use crate::world::location::{ChunkLocation, LocalChunkLocation, WithinBounds};
use crate::world::meshing::ChunkMesh;
use crate::world::worldgen::NoiseSource;
use crate::world::CHUNK_SIZE;

/// How faces whose neighboring cell lies in another chunk are treated by the visibility pass.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BoundaryFaces {
    /// Faces on the chunk border are never visible. Neighbor chunks are not consulted.
    #[default]
    Hidden,
    /// Cells outside of the chunk count as empty, so the chunk shell gets meshed.
    Exposed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChunkStage {
    Allocated,
    Generated,
    VisibilityComputed,
}

#[derive(Clone)]
pub struct Chunk<const SIZE: usize = CHUNK_SIZE> {
    location: ChunkLocation,
    blocks: Box<[Option<Block>]>,
    stage: ChunkStage,
    mesh: Option<ChunkMesh>,
    mesh_dirty: bool,
}

impl<const SIZE: usize> Debug for Chunk<SIZE> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chunk{{location: {:?}, stage: {:?}}}", *self.location, self.stage)
    }
}

impl<const SIZE: usize> Chunk<SIZE> {
    pub const VOLUME: usize = SIZE * SIZE * SIZE;

    /// Creates a chunk without any blocks. It has to be generated before it can be used.
    pub fn new(location: ChunkLocation) -> Self {
        Self {
            location,
            blocks: vec![None; Self::VOLUME].into_boxed_slice(),
            stage: ChunkStage::Allocated,
            mesh: None,
            mesh_dirty: true,
        }
    }

    /// Runs occupancy generation, the visibility pass and mesh building, in that order.
    pub fn generated<N: NoiseSource + ?Sized>(location: ChunkLocation, noise: &N, boundary_faces: BoundaryFaces) -> Self {
        let mut chunk = Self::new(location);
        chunk.generate(noise);
        chunk.compute_visibility(boundary_faces);
        chunk.rebuild_mesh();

        chunk
    }

    /// Fills every cell for which the noise source reports solid ground with a new block.
    /// Any previously computed visibility and mesh is discarded.
    pub fn generate<N: NoiseSource + ?Sized>(&mut self, noise: &N) {
        let origin = self.location.to_world_location_f64::<SIZE>();

        self.blocks = LocalChunkLocation::<SIZE>::iter()
            .map(|local| noise.is_solid(local.to_f64() + origin).then(|| Block::new(*local)))
            .collect();

        self.stage = ChunkStage::Generated;
        self.mesh_dirty = true;
    }

    pub fn update_visibility(&mut self) -> Result<()> {
        self.update_visibility_with(BoundaryFaces::default())
    }

    pub fn update_visibility_with(&mut self, boundary_faces: BoundaryFaces) -> Result<()> {
        if self.stage == ChunkStage::Allocated {
            bail!("cannot compute face visibility of a chunk that was never generated: self={:?}", self);
        }

        self.compute_visibility(boundary_faces);
        Ok(())
    }

    /// Rebuilds the mesh from the current face visibility.
    pub fn build_mesh(&mut self) -> Result<&ChunkMesh> {
        if self.stage != ChunkStage::VisibilityComputed {
            bail!("cannot build the mesh of a chunk before its face visibility is computed: self={:?}", self);
        }

        self.rebuild_mesh();
        self.mesh
            .as_ref()
            .context("chunk has no mesh right after building it")
    }

    /// Returns the mesh, rebuilding it first if it is stale.
    pub fn ensure_mesh(&mut self) -> Result<&ChunkMesh> {
        if self.mesh_dirty || self.mesh.is_none() {
            return self.build_mesh();
        }

        self.mesh
            .as_ref()
            .context("clean chunk without a mesh")
    }

    /// The current mesh, if it was built and is not stale.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh
            .as_ref()
            .filter(|_| !self.mesh_dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.mesh_dirty = true;
    }

    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    pub fn location(&self) -> ChunkLocation {
        self.location
    }

    pub fn stage(&self) -> ChunkStage {
        self.stage
    }

    /// Translation of the chunk origin to world space. Chunks are never rotated or scaled.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.location.to_world_location_f32::<SIZE>())
    }

    /// All blocks in slot order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().flatten()
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    pub fn block_at(&self, location: LocalChunkLocation<SIZE, WithinBounds>) -> Option<&Block> {
        self.block_at_index(location.to_index())
    }

    pub fn block_at_index(&self, index: usize) -> Option<&Block> {
        assert!(index < Self::VOLUME, "slot index {index} is outside of a chunk with {} slots", Self::VOLUME);

        self.blocks[index].as_ref()
    }

    pub fn is_solid(&self, location: LocalChunkLocation<SIZE, WithinBounds>) -> bool {
        self.block_at(location).is_some()
    }

    fn compute_visibility(&mut self, boundary_faces: BoundaryFaces) {
        for index in 0..Self::VOLUME {
            if self.blocks[index].is_none() {
                continue;
            }

            let location = LocalChunkLocation::<SIZE, WithinBounds>::from_index(index);
            let faces: EnumMap<Direction, bool> =
                EnumMap::from_fn(|direction| self.is_face_exposed(location, direction, boundary_faces));

            if let Some(block) = &mut self.blocks[index] {
                for (direction, visible) in faces {
                    block.set_face_visible(direction, visible);
                }
            }
        }

        self.stage = ChunkStage::VisibilityComputed;
        self.mesh_dirty = true;
    }

    fn is_face_exposed(
        &self,
        location: LocalChunkLocation<SIZE, WithinBounds>,
        direction: Direction,
        boundary_faces: BoundaryFaces,
    ) -> bool {
        if (location + direction).try_into_checked().is_none() {
            return boundary_faces == BoundaryFaces::Exposed;
        }

        let neighbor_index = location.to_index() as isize + direction.slot_offset::<SIZE>();
        self.block_at_index(neighbor_index as usize).is_none()
    }

    fn rebuild_mesh(&mut self) {
        let mesh = ChunkMesh::from_blocks(self.blocks());
        log::trace!(
            "built mesh for chunk {:?}: {} quads",
            *self.location,
            mesh.num_quads()
        );

        self.mesh = Some(mesh);
        self.mesh_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, Vector3, Vector4};
    use strum::IntoEnumIterator;

    use super::{BoundaryFaces, Chunk, ChunkStage};
    use crate::world::direction::Direction;
    use crate::world::location::{ChunkLocation, LocalChunkLocation};
    use crate::world::meshing::FLOATS_PER_VERTEX;
    use crate::world::worldgen::{ConstantNoise, NoiseSource, SimplexNoise};

    fn scattered(x: f64, y: f64, z: f64) -> f64 {
        ((x * 12.9898 + y * 78.233 + z * 37.719).sin() * 43758.5453).fract()
    }

    fn visible_faces<const SIZE: usize>(chunk: &Chunk<SIZE>) -> usize {
        chunk
            .blocks()
            .map(|block| block.num_visible_faces())
            .sum()
    }

    #[test]
    fn constant_solid_noise_fills_chunk_and_hides_every_face() {
        let mut chunk = Chunk::<4>::new(ChunkLocation::ORIGIN);
        chunk.generate(&ConstantNoise(0.5));
        assert_eq!(chunk.block_count(), 64);

        chunk.update_visibility().unwrap();

        // Interior faces touch solid neighbors and border faces are hidden by the boundary policy
        assert_eq!(visible_faces(&chunk), 0);

        let mesh = chunk.build_mesh().unwrap();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn exposed_boundary_meshes_the_chunk_shell() {
        let mut chunk = Chunk::<4>::new(ChunkLocation::ORIGIN);
        chunk.generate(&ConstantNoise(0.5));
        chunk
            .update_visibility_with(BoundaryFaces::Exposed)
            .unwrap();

        assert_eq!(visible_faces(&chunk), 6 * 4 * 4);

        let corner = chunk
            .block_at(LocalChunkLocation::from_index(0))
            .unwrap();
        assert!(corner.is_face_visible(Direction::XNeg));
        assert!(corner.is_face_visible(Direction::YNeg));
        assert!(corner.is_face_visible(Direction::ZNeg));
        assert!(!corner.is_face_visible(Direction::XPos));
    }

    #[test]
    fn empty_noise_gives_empty_chunk_and_mesh() {
        let mut chunk = Chunk::<4>::generated(ChunkLocation::new(3, -1, 2), &ConstantNoise(-1.0), BoundaryFaces::Hidden);

        assert_eq!(chunk.block_count(), 0);
        let mesh = chunk.build_mesh().unwrap();
        assert_eq!(mesh.vertices.len(), 0);
        assert_eq!(mesh.indices.len(), 0);
    }

    #[test]
    fn generation_is_deterministic() {
        let noise = SimplexNoise::new(42);
        let location = ChunkLocation::new(-2, 1, 5);

        let mut a = Chunk::<8>::new(location);
        let mut b = Chunk::<8>::new(location);
        a.generate(&noise);
        b.generate(&noise);
        assert_eq!(a.blocks().collect::<Vec<_>>(), b.blocks().collect::<Vec<_>>());

        // Regenerating in place yields the same blocks again
        let before = a.blocks().copied().collect::<Vec<_>>();
        a.generate(&noise);
        assert_eq!(a.blocks().copied().collect::<Vec<_>>(), before);
    }

    #[test]
    fn generation_samples_scaled_world_coordinates() {
        // Solid wherever world x > 10, i.e. sampled x > 1
        let noise = |x: f64, _y: f64, _z: f64| if x > 1.0 { 1.0 } else { -1.0 };

        let mut left = Chunk::<8>::new(ChunkLocation::new(1, 0, 0));
        left.generate(&noise);
        // world x 8..16, solid for 11..16
        assert_eq!(left.block_count(), 5 * 8 * 8);
        assert!(left.blocks().all(|block| block.position.x >= 3));

        let mut right = Chunk::<8>::new(ChunkLocation::new(2, 0, 0));
        right.generate(&noise);
        assert_eq!(right.block_count(), 8 * 8 * 8);
    }

    #[test]
    fn neighboring_blocks_hide_their_shared_face() {
        let mut chunk = Chunk::<8>::new(ChunkLocation::new(0, 1, 0));
        chunk.generate(&scattered);
        chunk.update_visibility().unwrap();

        let mut pairs = 0;
        for location in LocalChunkLocation::<8>::iter() {
            for direction in Direction::iter() {
                let Some(neighbor) = (location + direction).try_into_checked() else {
                    continue;
                };

                match (chunk.block_at(location), chunk.block_at(neighbor)) {
                    (Some(block), Some(other)) => {
                        pairs += 1;
                        assert!(!block.is_face_visible(direction));
                        assert!(!other.is_face_visible(direction.opposite()));
                    }
                    (Some(block), None) => assert!(block.is_face_visible(direction)),
                    (None, Some(other)) => assert!(other.is_face_visible(direction.opposite())),
                    (None, None) => {}
                }
            }
        }

        assert!(pairs > 0, "noise should produce some adjacent blocks");
    }

    #[test]
    fn border_faces_stay_hidden_by_default() {
        let mut chunk = Chunk::<8>::new(ChunkLocation::ORIGIN);
        chunk.generate(&scattered);
        chunk.update_visibility().unwrap();

        for block in chunk.blocks() {
            for direction in Direction::iter() {
                let neighbor = LocalChunkLocation::<8>::new(block.position + direction.to_vec());
                if neighbor.try_into_checked().is_none() {
                    assert!(!block.is_face_visible(direction));
                }
            }
        }
    }

    #[test]
    fn mesh_size_matches_visible_faces() {
        let mut chunk = Chunk::<8>::generated(ChunkLocation::new(1, 0, -1), &scattered, BoundaryFaces::Hidden);
        let faces = visible_faces(&chunk);
        assert!(faces > 0);

        let mesh = chunk.build_mesh().unwrap();
        assert_eq!(mesh.indices.len(), 6 * faces);
        assert_eq!(mesh.vertex_data().len(), 20 * faces);

        let num_vertices = (mesh.vertex_data().len() / FLOATS_PER_VERTEX) as u32;
        assert!(mesh.indices.iter().all(|&i| i < num_vertices));
    }

    #[test]
    fn stages_must_run_in_order() {
        let mut chunk = Chunk::<4>::new(ChunkLocation::ORIGIN);
        assert_eq!(chunk.stage(), ChunkStage::Allocated);
        assert!(chunk.update_visibility().is_err());
        assert!(chunk.build_mesh().is_err());

        chunk.generate(&ConstantNoise(1.0));
        assert_eq!(chunk.stage(), ChunkStage::Generated);
        assert!(chunk.build_mesh().is_err());
        assert!(chunk.mesh().is_none());

        chunk.update_visibility().unwrap();
        assert_eq!(chunk.stage(), ChunkStage::VisibilityComputed);
        assert!(chunk.build_mesh().is_ok());
    }

    #[test]
    fn mesh_is_only_rebuilt_when_dirty() {
        let mut chunk = Chunk::<4>::generated(ChunkLocation::ORIGIN, &scattered, BoundaryFaces::Exposed);
        assert!(!chunk.is_mesh_dirty());
        let built = chunk.mesh().cloned().unwrap();

        chunk.mark_dirty();
        assert!(chunk.mesh().is_none());

        let rebuilt = chunk.ensure_mesh().unwrap().clone();
        assert_eq!(rebuilt, built);
        assert!(!chunk.is_mesh_dirty());
    }

    #[test]
    #[should_panic]
    fn out_of_range_slot_query_panics() {
        let chunk = Chunk::<4>::new(ChunkLocation::ORIGIN);
        chunk.block_at_index(64);
    }

    #[test]
    fn model_matrix_is_a_pure_translation() {
        let chunk = Chunk::<4>::new(ChunkLocation::new(2, -1, 3));

        assert_eq!(chunk.model_matrix(), Matrix4::from_translation(Vector3::new(8.0, -4.0, 12.0)));
        assert_eq!(
            chunk.model_matrix() * Vector4::new(1.0, 1.0, 1.0, 1.0),
            Vector4::new(9.0, -3.0, 13.0, 1.0)
        );
    }

    #[test]
    fn noise_source_is_object_safe() {
        let noise: Box<dyn NoiseSource> = Box::new(ConstantNoise(0.5));
        let chunk = Chunk::<4>::generated(ChunkLocation::ORIGIN, noise.as_ref(), BoundaryFaces::Hidden);

        assert_eq!(chunk.block_count(), 64);
    }
}
