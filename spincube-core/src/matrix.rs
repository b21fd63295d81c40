/// Per-frame projection and model-view matrices
///
/// Matrices are assembled as `nalgebra::Matrix4` and handed to backends as
/// flat column-major arrays, the layout `uniformMatrix4fv` expects with
/// `transpose = false`.
use nalgebra::Matrix4;

/// A 4x4 matrix flattened in column-major order.
pub type ColumnMajor = [f32; 16];

/// Depth translation that places the cube in front of the camera.
pub const CAMERA_DEPTH_OFFSET: f32 = -6.0;

/// Flatten a matrix into column-major order.
pub fn to_column_major(m: &Matrix4<f32>) -> ColumnMajor {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Rebuild a matrix from a column-major array.
pub fn from_column_major(values: &ColumnMajor) -> Matrix4<f32> {
    Matrix4::from_column_slice(values)
}

/// Perspective projection for a vertical field of view.
///
/// A zero `aspect` or `near == far` is not rejected; the result contains
/// non-finite terms and the frame comes out blank.
pub fn build_projection(fov_radians: f32, aspect: f32, near: f32, far: f32) -> ColumnMajor {
    let f = 1.0 / (fov_radians / 2.0).tan();
    let range_inv = 1.0 / (near - far);

    #[rustfmt::skip]
    let m = Matrix4::new(
        f / aspect, 0.0, 0.0,                      0.0,
        0.0,        f,   0.0,                      0.0,
        0.0,        0.0, (near + far) * range_inv, near * far * range_inv * 2.0,
        0.0,        0.0, -1.0,                     0.0,
    );
    to_column_major(&m)
}

/// Model-view for the raw pipeline: a rotation about the vertical axis
/// followed by the fixed camera offset.
pub fn build_model_view(rotation: f32) -> ColumnMajor {
    model_view_with_offset(rotation, CAMERA_DEPTH_OFFSET)
}

/// Like [`build_model_view`] with a caller-chosen depth translation.
///
/// Flattened, the sine terms sit at index 2 (`+sin`) and index 8 (`-sin`).
pub fn model_view_with_offset(rotation: f32, depth: f32) -> ColumnMajor {
    let (sin, cos) = rotation.sin_cos();

    #[rustfmt::skip]
    let m = Matrix4::new(
        cos, 0.0, -sin, 0.0,
        0.0, 1.0, 0.0,  0.0,
        sin, 0.0, cos,  depth,
        0.0, 0.0, 0.0,  1.0,
    );
    to_column_major(&m)
}
