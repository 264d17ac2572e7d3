use cgmath::Vector3;

use crate::world::direction::Direction;

/// Texture coordinates shared by every face. Corner `i` of a face maps to `TEX_COORDS[i]`.
pub const TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two counter-clockwise triangles over the four corners of a face.
pub const FACE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Corners of a unit cube face, counter-clockwise when looking at the face from outside the block.
pub fn face_corners(direction: Direction) -> [Vector3<f32>; 4] {
    let corners: [[f32; 3]; 4] = match direction {
        Direction::XPos => [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
        Direction::XNeg => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
        Direction::YPos => [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        Direction::YNeg => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        Direction::ZPos => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
        Direction::ZNeg => [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    };

    corners.map(Vector3::from)
}
