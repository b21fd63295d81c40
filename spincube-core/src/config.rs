//! Hard-coded demo parameters, gathered into `Default`-able structs.

use crate::color::Color;

/// Perspective frustum parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveConfig {
    #[inline]
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Parameters of the raw-pipeline draw loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLoopConfig {
    pub perspective: PerspectiveConfig,
    /// Depth translation baked into the model-view matrix.
    pub depth_offset: f32,
    /// Radians added to the rotation before every frame.
    pub rotation_step: f32,
    pub clear_color: Color,
}

impl Default for DrawLoopConfig {
    fn default() -> Self {
        Self {
            perspective: PerspectiveConfig::default(),
            depth_offset: -6.0,
            rotation_step: 0.01,
            clear_color: Color::BLACK,
        }
    }
}

/// Parameters of the scene-graph program.
///
/// `spin_step` is negative while the raw pipeline's `rotation_step` is
/// positive. Both values are kept as the two programs shipped them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub perspective: PerspectiveConfig,
    pub camera_z: f32,
    pub cube_size: f32,
    /// Radians added to the cube's `rotation.y` every frame.
    pub spin_step: f32,
    pub background: Color,
    /// Material colors in box-face order: +x, -x, +y, -y, +z, -z.
    pub face_colors: [Color; 6],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            perspective: PerspectiveConfig::default(),
            camera_z: 6.0,
            cube_size: 2.0,
            spin_step: -0.01,
            background: Color::from_hex(0x000000),
            face_colors: [
                Color::from_hex(0xff0000),
                Color::from_hex(0x00ff00),
                Color::from_hex(0x0000ff),
                Color::from_hex(0xffff00),
                Color::from_hex(0xff00ff),
                Color::from_hex(0x00ffff),
            ],
        }
    }
}
