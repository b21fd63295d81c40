/// Software rasterizer backend drawn with terminal half-block cells
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector4};
use spincube_core::matrix::from_column_major;
use spincube_core::{Color, DrawCall, FrameRenderer, Geometry, Result, Uniforms, Viewport};
use std::io::Write;

/// Each terminal cell shows two vertically stacked pixels.
const HALF_BLOCK: char = '▀';

/// Vertices this close to the camera plane are not rasterized.
const MIN_CLIP_W: f32 = 1e-6;

/// Geometry copied into renderer-owned buffers.
#[derive(Debug, Clone)]
pub struct SoftwareGeometry {
    positions: Vec<Vector4<f32>>,
    colors: Vec<Vector4<f32>>,
    indices: Vec<u16>,
}

/// A vertex after the vertex stage, in screen space.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: Vector4<f32>,
}

/// CPU implementation of the pass-through shader pair.
///
/// Depth uses the `LEQUAL` test against a buffer cleared to 1.0, and no
/// faces are culled.
pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    color_buffer: Vec<Color>,
    mvp: Matrix4<f32>,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![1.0; size],
            color_buffer: vec![Color::BLACK; size],
            mvp: Matrix4::identity(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.color_buffer[y * self.width + x])
    }

    fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            log::debug!("software target resized to {}x{}", width, height);
            self.width = width;
            self.height = height;
            self.depth_buffer = vec![1.0; width * height];
            self.color_buffer = vec![Color::BLACK; width * height];
        }
    }

    fn shade_vertex(&self, geometry: &SoftwareGeometry, index: u16) -> Option<ScreenVertex> {
        let index = usize::from(index);
        let clip = self.mvp * geometry.positions[index];
        if clip.w < MIN_CLIP_W {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        Some(ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: (ndc.z + 1.0) * 0.5,
            color: geometry.colors[index],
        })
    }

    fn rasterize_triangle(&mut self, v: [ScreenVertex; 3]) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor() as i32;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil() as i32;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor() as i32;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) =
                    barycentric((v[0].x, v[0].y), (v[1].x, v[1].y), (v[2].x, v[2].y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if depth <= self.depth_buffer[idx] {
                    // Affine interpolation of the color varying.
                    let color = v[0].color * w0 + v[1].color * w1 + v[2].color * w2;
                    self.depth_buffer[idx] = depth;
                    self.color_buffer[idx] = Color::new(color.x, color.y, color.z, color.w);
                }
            }
        }
    }

    /// Write the color buffer to `writer`, two pixel rows per terminal row.
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height.div_ceil(2) {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..self.width {
                let top = self.pixel(x, 2 * row).unwrap_or(Color::BLACK);
                let bottom = self.pixel(x, 2 * row + 1).unwrap_or(Color::BLACK);
                writer.queue(SetForegroundColor(to_term_color(top)))?;
                writer.queue(SetBackgroundColor(to_term_color(bottom)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl FrameRenderer for SoftwareRenderer {
    type Geometry = SoftwareGeometry;

    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<SoftwareGeometry> {
        Ok(SoftwareGeometry {
            positions: geometry
                .positions()
                .iter()
                .map(|p| Vector4::new(p[0], p[1], p[2], 1.0))
                .collect(),
            colors: geometry.colors().iter().map(|c| Vector4::from(*c)).collect(),
            indices: geometry.indices().to_vec(),
        })
    }

    fn begin_frame(&mut self, viewport: &Viewport, clear_color: Color) {
        let (width, height) = viewport.physical_size();
        self.resize(width as usize, height as usize);
        self.color_buffer.fill(clear_color);
        self.depth_buffer.fill(1.0);
    }

    fn set_uniforms(&mut self, uniforms: &Uniforms) {
        self.mvp = from_column_major(&uniforms.projection) * from_column_major(&uniforms.model_view);
    }

    fn draw_indexed(&mut self, geometry: &SoftwareGeometry, call: DrawCall) {
        let first = call.offset / call.index_type.size_in_bytes();
        let last = (first + call.count).min(geometry.indices.len());
        let Some(indices) = geometry.indices.get(first..last) else {
            return;
        };

        for triangle in indices.chunks_exact(3) {
            let shaded = [
                self.shade_vertex(geometry, triangle[0]),
                self.shade_vertex(geometry, triangle[1]),
                self.shade_vertex(geometry, triangle[2]),
            ];
            // Triangles crossing the camera plane are dropped, not clipped.
            if let [Some(a), Some(b), Some(c)] = shaded {
                self.rasterize_triangle([a, b, c]);
            }
        }
    }
}

fn to_term_color(color: Color) -> TermColor {
    let [r, g, b, _] = color.to_rgba8();
    TermColor::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spincube_core::{render_frame, DrawLoopConfig};

    // Screen position off both face diagonals, inside the front and back faces.
    const PROBE: (usize, usize) = (40, 28);

    fn probe(renderer: &SoftwareRenderer) -> Option<[u8; 4]> {
        renderer.pixel(PROBE.0, PROBE.1).map(Color::to_rgba8)
    }

    fn render_cube(rotation: f32, size: f32) -> SoftwareRenderer {
        let mut renderer = SoftwareRenderer::new(0, 0);
        let cube = Geometry::colored_cube();
        let handle = renderer.upload_geometry(&cube).unwrap();
        render_frame(
            &mut renderer,
            &handle,
            DrawCall::whole(&cube),
            rotation,
            &Viewport::new(size, size, 1.0),
            &DrawLoopConfig::default(),
        );
        renderer
    }

    #[test]
    fn test_front_face_fills_center() {
        let renderer = render_cube(0.0, 65.0);
        assert_eq!(renderer.size(), (65, 65));
        assert_eq!(probe(&renderer), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_corners_keep_clear_color() {
        let renderer = render_cube(0.3, 65.0);
        assert_eq!(renderer.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(renderer.pixel(64, 64), Some(Color::BLACK));
    }

    #[test]
    fn test_half_turn_shows_back_face() {
        let renderer = render_cube(std::f32::consts::PI, 65.0);
        assert_eq!(probe(&renderer), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_draw_respects_index_range() {
        let mut renderer = SoftwareRenderer::new(0, 0);
        let cube = Geometry::colored_cube();
        let handle = renderer.upload_geometry(&cube).unwrap();
        let config = DrawLoopConfig::default();
        let viewport = Viewport::new(65.0, 65.0, 1.0);

        renderer.begin_frame(&viewport, config.clear_color);
        renderer.set_uniforms(&spincube_core::draw_loop::frame_uniforms(0.0, &viewport, &config));
        // Skip the front face: six indices of two bytes each.
        let call = DrawCall {
            offset: 12,
            count: 30,
            ..DrawCall::whole(&cube)
        };
        renderer.draw_indexed(&handle, call);

        assert_eq!(probe(&renderer), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_present_writes_one_cell_per_column() {
        let renderer = render_cube(0.0, 8.0);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8 * 4);
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
