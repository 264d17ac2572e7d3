use cgmath::Vector3;

use crate::world::chunk::BoundaryFaces;

pub mod block;
pub mod chunk;
pub mod chunk_grid;
pub mod direction;
pub mod location;
pub mod meshing;
pub mod streaming;
pub mod worldgen;

pub const CHUNK_SIZE: usize = 64;

/// Noise values strictly above this mark a cell as solid.
pub const OCCUPANCY_THRESHOLD: f64 = 0.1;

/// World voxel coordinates are divided by this before sampling the noise source.
pub const NOISE_SCALE: f64 = 10.0;

static_assertions::const_assert!(CHUNK_SIZE > 0);
static_assertions::const_assert!(CHUNK_SIZE.pow(3) <= u32::MAX as usize);

/// Number of chunks held by the streaming window along each axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GridDimensions {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl GridDimensions {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        assert!(
            width > 0 && height > 0 && depth > 0,
            "grid dimensions must not be zero: {width}x{height}x{depth}"
        );

        Self { width, height, depth }
    }

    pub fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub fn to_vec(self) -> Vector3<i32> {
        Vector3::new(self.width as i32, self.height as i32, self.depth as i32)
    }

    /// Offset of the focus chunk from the first slot of the window.
    pub fn half(self) -> Vector3<i32> {
        self.to_vec() / 2
    }

    pub fn contains(&self, slot: Vector3<i32>) -> bool {
        (0..self.width as i32).contains(&slot.x)
            && (0..self.height as i32).contains(&slot.y)
            && (0..self.depth as i32).contains(&slot.z)
    }

    /// Array index of a slot laid out as `i + j * width + k * width * height`.
    pub fn slot_index(&self, slot: Vector3<i32>) -> usize {
        assert!(self.contains(slot), "slot {slot:?} is outside of the {self:?} grid");

        slot.x as usize + slot.y as usize * self.width + slot.z as usize * self.width * self.height
    }

    /// All slots in array order.
    pub fn slots(self) -> impl Iterator<Item = Vector3<i32>> {
        (0..self.volume()).map(move |index| {
            let area = self.width * self.height;
            Vector3::new(
                (index % self.width) as i32,
                ((index % area) / self.width) as i32,
                (index / area) as i32,
            )
        })
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(4, 2, 4)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorldConfig {
    pub dimensions: GridDimensions,
    pub boundary_faces: BoundaryFaces,
    /// Generate newly exposed chunks on the rayon thread pool instead of the calling thread.
    pub parallel_generation: bool,
    /// Also hand chunks without any visible faces to the mesh consumer.
    pub render_empty_chunks: bool,
    /// Worker threads used by background streaming.
    pub background_workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::default(),
            boundary_faces: BoundaryFaces::Hidden,
            parallel_generation: false,
            render_empty_chunks: true,
            background_workers: 4,
        }
    }
}
