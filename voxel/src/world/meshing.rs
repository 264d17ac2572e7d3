use bytemuck::{Pod, Zeroable};
use cgmath::Vector3;

use crate::vector_utils::MapElemWise;
use crate::world::block::Block;
use crate::world::meshing::face::{face_corners, FACE_INDICES, TEX_COORDS};

pub mod face;

/// Number of floats a single vertex occupies in the flat vertex buffer.
pub const FLOATS_PER_VERTEX: usize = 5;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<Vertex>(), FLOATS_PER_VERTEX * std::mem::size_of::<f32>());

impl Vertex {
    pub fn new(position: Vector3<f32>, tex_coords: [f32; 2]) -> Self {
        Self {
            position: position.into(),
            tex_coords,
        }
    }
}

/// Vertex and index buffer of a chunk, in chunk-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Emits one quad for every visible face of every block, in the order the blocks are given.
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        let mut mesh = ChunkMesh::default();

        for block in blocks {
            let origin = block.position.map_elem_wise(|c| c as f32);

            for direction in block.visible_faces() {
                let max_index = mesh.vertices.len() as u32;

                for (corner, tex_coords) in face_corners(direction).into_iter().zip(TEX_COORDS) {
                    mesh.vertices.push(Vertex::new(origin + corner, tex_coords));
                }

                mesh.indices
                    .extend(FACE_INDICES.iter().map(|i| max_index + i));
            }
        }

        mesh
    }

    /// The vertex buffer as a flat list of floats, 3 position and 2 texture coordinates per vertex.
    pub fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn num_quads(&self) -> usize {
        self.indices.len() / FACE_INDICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
