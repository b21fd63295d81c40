//! Backend interface shared by both programs.
//!
//! A backend uploads immutable geometry once, then per frame receives a
//! clear, one uniform update per object and one indexed draw per object.

use crate::color::Color;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::matrix::ColumnMajor;
use crate::viewport::Viewport;

/// Matrices consumed by the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub projection: ColumnMajor,
    pub model_view: ColumnMajor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
}

impl IndexType {
    pub fn size_in_bytes(self) -> usize {
        match self {
            IndexType::U16 => 2,
        }
    }
}

/// Parameters of one indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub count: usize,
    pub index_type: IndexType,
    /// Byte offset into the index buffer.
    pub offset: usize,
}

impl DrawCall {
    /// Draw every index of `geometry` as triangles.
    pub fn whole(geometry: &Geometry) -> Self {
        Self {
            primitive: Primitive::Triangles,
            count: geometry.index_count(),
            index_type: IndexType::U16,
            offset: 0,
        }
    }
}

/// A graphics backend able to run the draw loop.
///
/// Only `upload_geometry` may fail. Once geometry is resident, the per-frame
/// methods have no failure path.
pub trait FrameRenderer {
    /// Backend handle for uploaded buffers.
    type Geometry;

    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<Self::Geometry>;

    /// Size the drawable and clear color and depth.
    fn begin_frame(&mut self, viewport: &Viewport, clear_color: Color);

    fn set_uniforms(&mut self, uniforms: &Uniforms);

    /// Bind `geometry` with its attributes and draw it with the most recent
    /// uniforms.
    fn draw_indexed(&mut self, geometry: &Self::Geometry, call: DrawCall);
}

/// Backend call, as seen by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload { vertices: usize, indices: usize },
    BeginFrame { viewport: Viewport, clear_color: Color },
    SetUniforms(Uniforms),
    DrawIndexed { geometry: usize, call: DrawCall },
}

/// Backend that records calls instead of drawing.
///
/// Geometry handles are upload sequence numbers.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<Command>,
    uploads: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawIndexed { call, .. } => Some(call),
            _ => None,
        })
    }

    pub fn last_uniforms(&self) -> Option<&Uniforms> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetUniforms(u) => Some(u),
            _ => None,
        })
    }
}

impl FrameRenderer for RecordingRenderer {
    type Geometry = usize;

    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<usize> {
        let handle = self.uploads;
        self.uploads += 1;
        self.commands.push(Command::Upload {
            vertices: geometry.vertex_count(),
            indices: geometry.index_count(),
        });
        Ok(handle)
    }

    fn begin_frame(&mut self, viewport: &Viewport, clear_color: Color) {
        self.commands.push(Command::BeginFrame {
            viewport: *viewport,
            clear_color,
        });
    }

    fn set_uniforms(&mut self, uniforms: &Uniforms) {
        self.commands.push(Command::SetUniforms(*uniforms));
    }

    fn draw_indexed(&mut self, geometry: &usize, call: DrawCall) {
        self.commands.push(Command::DrawIndexed {
            geometry: *geometry,
            call,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_draw_covers_cube() {
        let call = DrawCall::whole(&Geometry::colored_cube());
        assert_eq!(call.count, 36);
        assert_eq!(call.index_type, IndexType::U16);
        assert_eq!(call.primitive, Primitive::Triangles);
        assert_eq!(call.offset, 0);
    }

    #[test]
    fn test_recording_handles_are_sequential() {
        let mut renderer = RecordingRenderer::new();
        let cube = Geometry::colored_cube();
        assert_eq!(renderer.upload_geometry(&cube).unwrap(), 0);
        assert_eq!(renderer.upload_geometry(&cube).unwrap(), 1);
        assert_eq!(
            renderer.commands()[0],
            Command::Upload {
                vertices: 24,
                indices: 36
            }
        );
    }
}
