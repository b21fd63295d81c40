/// Transform component for scene entities
use nalgebra::{Matrix4, Vector3};

/// Euler angles in radians, applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerRotation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// `Rx * Ry * Rz`
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::from_axis_angle(&Vector3::x_axis(), self.x);
        let ry = Matrix4::from_axis_angle(&Vector3::y_axis(), self.y);
        let rz = Matrix4::from_axis_angle(&Vector3::z_axis(), self.z);
        rx * ry * rz
    }
}

/// Placement of an entity relative to the scene origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: EulerRotation,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: EulerRotation::default(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Model matrix: translate, then rotate, then scale (applied right to left).
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation.matrix()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_state() {
        let mut rotation = EulerRotation::default();
        rotation.rotate(0.1, -0.2, 0.3);
        assert!((rotation.x - 0.1).abs() < 1e-6);
        assert!((rotation.y + 0.2).abs() < 1e-6);
        assert!((rotation.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_transform() {
        let matrix = Transform::identity().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_positive_y_rotation_turns_x_toward_negative_z() {
        let mut transform = Transform::identity();
        transform.rotation.y = FRAC_PI_2;
        let p = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-6);
        assert!((p.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_translation_applies_after_scale() {
        let mut transform = Transform::identity();
        transform.position = Vector3::new(0.0, 0.0, -3.0);
        transform.scale = Vector3::repeat(2.0);
        let p = transform.matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((p.z + 1.0).abs() < 1e-6);
    }
}
