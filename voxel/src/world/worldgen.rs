use cgmath::Vector3;
use noise::{NoiseFn, Simplex};

use crate::world::{NOISE_SCALE, OCCUPANCY_THRESHOLD};

/// A deterministic scalar field, roughly in `[-1, 1]`, used as occupancy oracle during chunk generation.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;

    /// Whether the cell at the given world voxel coordinates is solid.
    fn is_solid(&self, world_location: Vector3<f64>) -> bool {
        let scaled = world_location / NOISE_SCALE;
        self.sample(scaled.x, scaled.y, scaled.z) > OCCUPANCY_THRESHOLD
    }
}

/// 3D simplex noise from the `noise` crate.
pub struct SimplexNoise {
    seed: u32,
    simplex: Simplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for SimplexNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex.get([x, y, z])
    }
}

/// Returns the same value everywhere.
#[derive(Copy, Clone, Debug)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        self.0
    }
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}
