use cgmath::Vector3;
use strum_macros::EnumIter;

/// One of the six axis-aligned directions a block face can point at.
#[derive(EnumIter, Copy, Clone, Debug, Eq, PartialEq, Hash, enum_map::Enum)]
pub enum Direction {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

impl Direction {
    pub fn to_vec(self) -> Vector3<i32> {
        match self {
            Direction::XPos => Vector3::unit_x(),
            Direction::XNeg => -Vector3::unit_x(),
            Direction::YPos => Vector3::unit_y(),
            Direction::YNeg => -Vector3::unit_y(),
            Direction::ZPos => Vector3::unit_z(),
            Direction::ZNeg => -Vector3::unit_z(),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::XPos => Direction::XNeg,
            Direction::XNeg => Direction::XPos,
            Direction::YPos => Direction::YNeg,
            Direction::YNeg => Direction::YPos,
            Direction::ZPos => Direction::ZNeg,
            Direction::ZNeg => Direction::ZPos,
        }
    }

    /// Offset between the slot indices of two neighboring cells in a chunk of edge length `SIZE`.
    pub fn slot_offset<const SIZE: usize>(self) -> isize {
        let size = SIZE as isize;
        match self {
            Direction::XPos => 1,
            Direction::XNeg => -1,
            Direction::YPos => size,
            Direction::YNeg => -size,
            Direction::ZPos => size * size,
            Direction::ZNeg => -size * size,
        }
    }
}

impl From<Direction> for Vector3<i32> {
    fn from(value: Direction) -> Self {
        value.to_vec()
    }
}
