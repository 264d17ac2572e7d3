use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};
use voxel::Camera;

/// A camera flying at a fixed heading and height, used to drive the world without a window.
pub struct FlyCamera {
    pub position: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
    projection: Projection,
}

impl FlyCamera {
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(position: Point3<f32>, yaw: Y, pitch: P, projection: Projection) -> Self {
        Self {
            position,
            yaw: yaw.into(),
            pitch: pitch.into(),
            projection,
        }
    }

    /// Direction the camera is looking at.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();

        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    /// Moves horizontally along the heading.
    pub fn advance(&mut self, distance: f32) {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        self.position += Vector3::new(cos_yaw, 0.0, sin_yaw) * distance;
    }
}

impl Camera for FlyCamera {
    fn world_position(&self) -> Vector3<f32> {
        Vector3::new(self.position.x, self.position.y, self.position.z)
    }

    fn view_projection(&self) -> Matrix4<f32> {
        let view = Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y());
        self.projection.build_proj_matrix() * view
    }
}

pub struct Projection {
    aspect: f32,
    fov_y: Rad<f32>,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fov_y: F, z_near: f32, z_far: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fov_y: fov_y.into(),
            z_near,
            z_far,
        }
    }

    pub fn build_proj_matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(1920, 1080, Deg(80.0), 0.1, 1000.0)
    }
}
