use cgmath::Vector3;
use enum_map::EnumMap;

use crate::world::direction::Direction;

/// A solid cell of a chunk. Empty cells have no block at all.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub position: Vector3<i32>,
    faces: EnumMap<Direction, bool>,
}

impl Block {
    /// Creates a block with all faces hidden.
    pub fn new(position: Vector3<i32>) -> Self {
        Self {
            position,
            faces: EnumMap::default(),
        }
    }

    pub fn is_face_visible(&self, direction: Direction) -> bool {
        self.faces[direction]
    }

    pub fn set_face_visible(&mut self, direction: Direction, visible: bool) {
        self.faces[direction] = visible;
    }

    pub fn visible_faces(&self) -> impl Iterator<Item = Direction> + '_ {
        self.faces
            .iter()
            .filter(|&(_, &visible)| visible)
            .map(|(direction, _)| direction)
    }

    pub fn num_visible_faces(&self) -> usize {
        self.faces.values().filter(|&&visible| visible).count()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;
    use strum::IntoEnumIterator;

    use super::Block;
    use crate::world::direction::Direction;

    #[test]
    fn new_block_has_no_visible_faces() {
        let block = Block::new(Vector3::new(1, 2, 3));

        assert!(Direction::iter().all(|dir| !block.is_face_visible(dir)));
        assert_eq!(block.num_visible_faces(), 0);
    }

    #[test]
    fn faces_are_independent() {
        let mut block = Block::new(Vector3::new(0, 0, 0));
        block.set_face_visible(Direction::YPos, true);
        block.set_face_visible(Direction::ZNeg, true);

        assert_eq!(block.visible_faces().collect::<Vec<_>>(), vec![Direction::YPos, Direction::ZNeg]);

        block.set_face_visible(Direction::YPos, false);
        assert_eq!(block.num_visible_faces(), 1);
        assert!(block.is_face_visible(Direction::ZNeg));
    }
}
