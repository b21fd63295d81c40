/// Perspective camera for the scene graph
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::PerspectiveConfig;
use crate::matrix::{build_projection, ColumnMajor};

/// Camera looking from `position` toward `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(perspective: &PerspectiveConfig, aspect: f32) -> Self {
        Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::y(),
            fov_degrees: perspective.fov_degrees,
            aspect,
            near: perspective.near,
            far: perspective.far,
        }
    }

    /// Move along the z axis, keeping the view direction down -z.
    pub fn set_z(&mut self, z: f32) {
        self.position.z = z;
        self.target.z = z - 1.0;
    }

    /// Called on resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> ColumnMajor {
        build_projection(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(&PerspectiveConfig::default(), 800.0 / 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::to_column_major;

    #[test]
    fn test_camera_creation() {
        let camera = PerspectiveCamera::new(&PerspectiveConfig::default(), 800.0 / 600.0);
        assert_eq!(camera.fov_degrees, 45.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_pulls_world_toward_negative_z() {
        let mut camera = PerspectiveCamera::default();
        camera.set_z(6.0);
        let view = to_column_major(&camera.view_matrix());
        let expected = to_column_major(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, -6.0)));
        for (a, e) in view.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_projection_tracks_aspect() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(2.0);
        let p = camera.projection_matrix();
        assert!((p[0] * 2.0 - p[5]).abs() < 1e-5);
    }
}
