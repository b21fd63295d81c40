/// Indexed, per-vertex-colored triangle geometry
use nalgebra::Vector3;

use crate::color::Color;

/// Cube corner positions, four per face: front, back, top, bottom, right, left.
#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; 24] = [
    // Front face
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // Back face
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // Top face
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
    // Bottom face
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // Right face
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // Left face
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
];

/// One color per face, in the order of [`CUBE_POSITIONS`].
pub const CUBE_FACE_COLORS: [Color; 6] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::MAGENTA,
    Color::CYAN,
];

/// Two counter-clockwise triangles per face.
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0,  1,  2,    0,  2,  3,
    4,  5,  6,    4,  6,  7,
    8,  9,  10,   8,  10, 11,
    12, 13, 14,   12, 14, 15,
    16, 17, 18,   16, 18, 19,
    20, 21, 22,   20, 22, 23,
];

const VERTICES_PER_FACE: usize = 4;

/// Face frames for the box builder as `(normal, u, v)` with `u x v = normal`,
/// in box-face order: +x, -x, +y, -y, +z, -z.
#[rustfmt::skip]
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([ 1.0,  0.0,  0.0], [ 0.0, 0.0, -1.0], [0.0, 1.0,  0.0]),
    ([-1.0,  0.0,  0.0], [ 0.0, 0.0,  1.0], [0.0, 1.0,  0.0]),
    ([ 0.0,  1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0, -1.0]),
    ([ 0.0, -1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0,  1.0]),
    ([ 0.0,  0.0,  1.0], [ 1.0, 0.0,  0.0], [0.0, 1.0,  0.0]),
    ([ 0.0,  0.0, -1.0], [-1.0, 0.0,  0.0], [0.0, 1.0,  0.0]),
];

/// Vertex positions, a parallel color stream, and a `u16` triangle list.
///
/// The buffers cannot be changed once built; backends upload them once.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    indices: Vec<u16>,
}

impl Geometry {
    /// The 2x2x2 cube drawn by the raw pipeline.
    pub fn colored_cube() -> Self {
        let colors = CUBE_FACE_COLORS
            .iter()
            .flat_map(|c| std::iter::repeat(c.to_array()).take(VERTICES_PER_FACE))
            .collect();

        Self {
            positions: CUBE_POSITIONS.to_vec(),
            colors,
            indices: CUBE_INDICES.to_vec(),
        }
    }

    /// Axis-aligned box centered on the origin, one color per face.
    ///
    /// Faces are emitted in the order +x, -x, +y, -y, +z, -z and
    /// `face_colors` is applied in that same order.
    pub fn cuboid(width: f32, height: f32, depth: f32, face_colors: &[Color; 6]) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let mut positions = Vec::with_capacity(6 * VERTICES_PER_FACE);
        let mut colors = Vec::with_capacity(6 * VERTICES_PER_FACE);
        let mut indices = Vec::with_capacity(36);

        for ((normal, u, v), color) in BOX_FACES.iter().zip(face_colors) {
            let normal = Vector3::from(*normal);
            let u = Vector3::from(*u);
            let v = Vector3::from(*v);
            let base = positions.len() as u16;

            for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let corner = (normal + u * s + v * t).component_mul(&half);
                positions.push([corner.x, corner.y, corner.z]);
                colors.push(color.to_array());
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            positions,
            colors,
            indices,
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Index triples, one per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Flattened `x, y, z` stream for upload.
    pub fn position_data(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Flattened `r, g, b, a` stream for upload.
    pub fn color_data(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }

    /// Unnormalized face normal of a triangle from its winding.
    pub fn triangle_normal(&self, triangle: [u16; 3]) -> Vector3<f32> {
        let [a, b, c] = triangle.map(|i| Vector3::from(self.positions[usize::from(i)]));
        (b - a).cross(&(c - a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(geometry: &Geometry) {
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.index_count(), 36);
        for triangle in geometry.triangles() {
            assert!(triangle.iter().all(|&i| usize::from(i) < 24));
            assert!(
                triangle[0] != triangle[1] && triangle[1] != triangle[2] && triangle[0] != triangle[2],
                "degenerate triangle {:?}",
                triangle
            );
        }
    }

    fn assert_faces_share_color(geometry: &Geometry) {
        for face in geometry.colors().chunks_exact(VERTICES_PER_FACE) {
            assert!(face.iter().all(|c| c == &face[0]), "mixed face colors {:?}", face);
        }
    }

    fn assert_outward_winding(geometry: &Geometry) {
        for triangle in geometry.triangles() {
            let centroid = triangle
                .iter()
                .map(|&i| Vector3::from(geometry.positions()[usize::from(i)]))
                .sum::<Vector3<f32>>()
                / 3.0;
            assert!(
                geometry.triangle_normal(triangle).dot(&centroid) > 0.0,
                "triangle {:?} faces inward",
                triangle
            );
        }
    }

    #[test]
    fn test_colored_cube_indices_are_valid() {
        assert_well_formed(&Geometry::colored_cube());
    }

    #[test]
    fn test_colored_cube_faces_share_color() {
        let cube = Geometry::colored_cube();
        assert_faces_share_color(&cube);
        assert_eq!(cube.colors()[0], Color::RED.to_array());
        assert_eq!(cube.colors()[23], Color::CYAN.to_array());
    }

    #[test]
    fn test_colored_cube_winds_outward() {
        assert_outward_winding(&Geometry::colored_cube());
    }

    #[test]
    fn test_cuboid_matches_cube_shape() {
        let colors = [
            Color::RED,
            Color::GREEN,
            Color::BLUE,
            Color::YELLOW,
            Color::MAGENTA,
            Color::CYAN,
        ];
        let cuboid = Geometry::cuboid(2.0, 2.0, 2.0, &colors);
        assert_well_formed(&cuboid);
        assert_faces_share_color(&cuboid);
        assert_outward_winding(&cuboid);

        // First face is +x and takes the first color.
        assert!(cuboid.positions()[..4].iter().all(|p| p[0] == 1.0));
        assert_eq!(cuboid.colors()[0], Color::RED.to_array());
        // Fifth face is +z.
        assert!(cuboid.positions()[16..20].iter().all(|p| p[2] == 1.0));
        assert_eq!(cuboid.colors()[16], Color::MAGENTA.to_array());
    }

    #[test]
    fn test_cuboid_respects_extents() {
        let box_geometry = Geometry::cuboid(4.0, 1.0, 2.0, &[Color::BLACK; 6]);
        for p in box_geometry.positions() {
            assert_eq!(p[0].abs(), 2.0);
            assert_eq!(p[1].abs(), 0.5);
            assert_eq!(p[2].abs(), 1.0);
        }
    }

    #[test]
    fn test_flattened_streams() {
        let cube = Geometry::colored_cube();
        assert_eq!(cube.position_data().len(), 72);
        assert_eq!(cube.color_data().len(), 96);
        assert_eq!(&cube.position_data()[..3], &[-1.0, -1.0, 1.0]);
    }
}
