use std::marker::PhantomData;
use std::ops::{Add, Deref, Sub};

use cgmath::Vector3;

use crate::vector_utils::{DivEuclid, MapElemWise, RemEuclid};

/// The location of a specific chunk in the chunk grid.
/// Each ChunkLocation unit will be equal to one chunk size when rendering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChunkLocation(Vector3<i32>);

impl ChunkLocation {
    pub const ORIGIN: ChunkLocation = ChunkLocation(Vector3 { x: 0, y: 0, z: 0 });

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn from_vec(location: Vector3<i32>) -> Self {
        Self(location)
    }

    /// The chunk containing a continuous world position, i.e. `floor(position / SIZE)` per axis.
    pub fn from_world_position<const SIZE: usize>(position: Vector3<f32>) -> Self {
        Self(position.map_elem_wise(|c| (c / SIZE as f32).floor() as i32))
    }

    /// Splits an integer world voxel position into its chunk and the local location inside of that chunk.
    pub fn split_voxel_position<const SIZE: usize>(
        position: Vector3<i32>,
    ) -> (Self, LocalChunkLocation<SIZE, WithinBounds>) {
        let chunk = Self(position.div_euclid(SIZE as i32));
        let local = LocalChunkLocation::new_unchecked(position.rem_euclid(SIZE as i32));

        (chunk, local)
    }

    pub fn to_world_location_f32<const SIZE: usize>(self) -> Vector3<f32> {
        let scaled = self.0 * SIZE as i32;
        Vector3::new(scaled.x as f32, scaled.y as f32, scaled.z as f32)
    }

    pub fn to_world_location_f64<const SIZE: usize>(self) -> Vector3<f64> {
        let scaled = self.0 * SIZE as i32;
        Vector3::new(scaled.x as f64, scaled.y as f64, scaled.z as f64)
    }

    pub fn to_vec(self) -> Vector3<i32> {
        self.0
    }
}

impl Add for ChunkLocation {
    type Output = ChunkLocation;

    fn add(self, rhs: Self) -> Self::Output {
        ChunkLocation(self.0 + rhs.0)
    }
}

impl Sub for ChunkLocation {
    type Output = ChunkLocation;

    fn sub(self, rhs: Self) -> Self::Output {
        ChunkLocation(self.0 - rhs.0)
    }
}

impl Deref for ChunkLocation {
    type Target = Vector3<i32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A local location inside of a chunk with an edge length of `SIZE`.
/// The generic type `State` signals whether it is confirmed that the location is within the chunk boundaries.
/// It can be either one of [WithinBounds] or [OutsideBounds].
/// Arithmetic always yields a location with State=OutsideBounds. To get a State=WithinBounds the method
/// [LocalChunkLocation::try_into_checked] can be called.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocalChunkLocation<const SIZE: usize, State = OutsideBounds> {
    location: Vector3<i32>,
    phantom: PhantomData<State>,
}

/// Marker type for [LocalChunkLocation]
/// It known for the local location to be within the chunk boundaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WithinBounds;

/// Marker type for [LocalChunkLocation]
/// It is unknown whether the local location is within the chunk boundaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutsideBounds;

impl<const SIZE: usize, State> LocalChunkLocation<SIZE, State> {
    pub const AREA: usize = SIZE * SIZE;
    pub const VOLUME: usize = SIZE * SIZE * SIZE;

    pub fn to_f64(self) -> Vector3<f64> {
        Vector3::new(self.location.x as f64, self.location.y as f64, self.location.z as f64)
    }
}

impl<const SIZE: usize> LocalChunkLocation<SIZE> {
    pub fn new(location: Vector3<i32>) -> Self {
        Self {
            location,
            phantom: PhantomData,
        }
    }

    /// Iterates all locations of the chunk in slot order.
    pub fn iter() -> impl Iterator<Item = LocalChunkLocation<SIZE, WithinBounds>> {
        (0..Self::VOLUME).map(LocalChunkLocation::from_index)
    }

    pub fn try_into_checked(self) -> Option<LocalChunkLocation<SIZE, WithinBounds>> {
        let bounds = 0..SIZE as i32;
        (bounds.contains(&self.location.x) && bounds.contains(&self.location.y) && bounds.contains(&self.location.z))
            .then(|| LocalChunkLocation::new_unchecked(self.location))
    }
}

impl<const SIZE: usize> LocalChunkLocation<SIZE, WithinBounds> {
    pub fn new_unchecked(location: Vector3<i32>) -> Self {
        LocalChunkLocation {
            location,
            phantom: PhantomData,
        }
    }

    /// Decodes a slot index laid out as `x + y * SIZE + z * SIZE²`.
    pub fn from_index(index: usize) -> Self {
        assert!(
            index < Self::VOLUME,
            "slot index {index} is outside of a chunk with {} slots",
            Self::VOLUME
        );

        let z = index / Self::AREA;
        let y = (index % Self::AREA) / SIZE;
        let x = index % SIZE;

        Self::new_unchecked(Vector3::new(x as i32, y as i32, z as i32))
    }

    pub fn to_index(self) -> usize {
        self.location.x as usize + self.location.y as usize * SIZE + self.location.z as usize * Self::AREA
    }
}

impl<const SIZE: usize, T, A: Into<Vector3<i32>>> Add<A> for LocalChunkLocation<SIZE, T> {
    type Output = LocalChunkLocation<SIZE, OutsideBounds>;

    fn add(self, rhs: A) -> Self::Output {
        LocalChunkLocation::new(self.location + rhs.into())
    }
}

impl<const SIZE: usize, T> Deref for LocalChunkLocation<SIZE, T> {
    type Target = Vector3<i32>;

    fn deref(&self) -> &Self::Target {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::{ChunkLocation, LocalChunkLocation, WithinBounds};
    use crate::world::CHUNK_SIZE;

    type Local8 = LocalChunkLocation<8, WithinBounds>;

    fn assert_slot_index_bijective<const SIZE: usize>() {
        let range = 0..SIZE as i32;
        for index in 0..LocalChunkLocation::<SIZE, WithinBounds>::VOLUME {
            let location = LocalChunkLocation::<SIZE, WithinBounds>::from_index(index);

            assert!(range.contains(&location.x));
            assert!(range.contains(&location.y));
            assert!(range.contains(&location.z));
            assert_eq!(location.to_index(), index);
        }
    }

    #[test]
    fn slot_index_is_bijective() {
        assert_slot_index_bijective::<1>();
        assert_slot_index_bijective::<8>();
        assert_slot_index_bijective::<CHUNK_SIZE>();
    }

    #[test]
    fn slot_index_is_z_major() {
        assert_eq!(*Local8::from_index(1), Vector3::new(1, 0, 0));
        assert_eq!(*Local8::from_index(8), Vector3::new(0, 1, 0));
        assert_eq!(*Local8::from_index(64), Vector3::new(0, 0, 1));
        assert_eq!(*Local8::from_index(8 * 8 * 8 - 1), Vector3::new(7, 7, 7));
    }

    #[test]
    #[should_panic]
    fn decoding_out_of_range_index_panics() {
        Local8::from_index(8 * 8 * 8);
    }

    #[test]
    fn iter_visits_every_slot_in_order() {
        let indices: Vec<usize> = LocalChunkLocation::<4>::iter()
            .map(|location| location.to_index())
            .collect();

        assert_eq!(indices, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn bounds_check() {
        let inside = LocalChunkLocation::<8>::new(Vector3::new(7, 0, 3));
        assert!(inside.try_into_checked().is_some());

        assert!((inside + Vector3::<i32>::unit_x()).try_into_checked().is_none());
        assert!(LocalChunkLocation::<8>::new(Vector3::new(0, -1, 0))
            .try_into_checked()
            .is_none());
    }

    #[test]
    fn world_position_to_chunk_floors_negative_coordinates() {
        assert_eq!(
            ChunkLocation::from_world_position::<64>(Vector3::new(0.0, 0.0, 0.0)),
            ChunkLocation::ORIGIN
        );
        assert_eq!(
            ChunkLocation::from_world_position::<64>(Vector3::new(63.9, 64.0, -0.1)),
            ChunkLocation::new(0, 1, -1)
        );
        assert_eq!(
            ChunkLocation::from_world_position::<64>(Vector3::new(-64.0, -64.5, 130.0)),
            ChunkLocation::new(-1, -2, 2)
        );
    }

    #[test]
    fn chunk_to_world_location() {
        let location = ChunkLocation::new(1, -2, 3);

        assert_eq!(location.to_world_location_f32::<4>(), Vector3::new(4.0, -8.0, 12.0));
        assert_eq!(location.to_world_location_f64::<4>(), Vector3::new(4.0, -8.0, 12.0));
    }

    #[test]
    fn voxel_positions_split_into_chunk_and_local() {
        let (chunk, local) = ChunkLocation::split_voxel_position::<8>(Vector3::new(-1, 8, 17));

        assert_eq!(chunk, ChunkLocation::new(-1, 1, 2));
        assert_eq!(*local, Vector3::new(7, 0, 1));
    }
}
