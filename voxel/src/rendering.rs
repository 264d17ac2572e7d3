use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use cgmath::{Matrix4, Vector3};
use fastrand::Rng;

use crate::world::location::ChunkLocation;

/// Read-only view of the camera driving the chunk window.
pub trait Camera {
    fn world_position(&self) -> Vector3<f32>;

    fn view_projection(&self) -> Matrix4<f32>;
}

/// Receives chunk meshes for upload and drawing. Never called with a stale mesh.
pub trait MeshConsumer {
    /// `vertices` holds 5 floats per vertex: 3 position and 2 texture coordinates.
    /// `transform` is the camera's view-projection combined with the chunk's model matrix.
    fn submit(&mut self, vertices: &[f32], indices: &[u32], transform: Matrix4<f32>, tint: Vector3<f32>);
}

/// A debug color derived from the chunk location. Equal locations always get the same color.
pub fn chunk_tint(location: ChunkLocation) -> Vector3<f32> {
    let mut hasher = DefaultHasher::new();
    location.hash(&mut hasher);
    let mut rng = Rng::with_seed(hasher.finish());

    Vector3::new(
        rand(&mut rng, 0.25..1.0),
        rand(&mut rng, 0.25..1.0),
        rand(&mut rng, 0.25..1.0),
    )
}

#[inline]
fn rand(rng: &mut Rng, range: Range<f32>) -> f32 {
    rng.f32() * (range.end - range.start) + range.start
}
