//! A voxel world streamed as a fixed window of chunks around a moving focus.
//!
//! Chunks are filled from a [NoiseSource], get their hidden faces culled and are meshed into quads.
//! The [World] keeps a window of them centered on the camera and hands their meshes to a [MeshConsumer].

pub mod rendering;
pub mod vector_utils;
pub mod world;

pub use rendering::{chunk_tint, Camera, MeshConsumer};
pub use world::block::Block;
pub use world::chunk::{BoundaryFaces, Chunk, ChunkStage};
pub use world::chunk_grid::{FocusUpdate, World};
pub use world::direction::Direction;
pub use world::location::{ChunkLocation, LocalChunkLocation};
pub use world::meshing::{ChunkMesh, Vertex};
pub use world::worldgen::{ConstantNoise, NoiseSource, SimplexNoise};
pub use world::{GridDimensions, WorldConfig, CHUNK_SIZE};
