//! Raw-pipeline draw loop.
//!
//! [`render_frame`] draws one frame for an explicit rotation. [`DrawLoop`]
//! owns the rotation and advances it before each frame; the host decides
//! when the next tick runs.

use crate::config::DrawLoopConfig;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::matrix::{build_projection, model_view_with_offset};
use crate::renderer::{DrawCall, FrameRenderer, Uniforms};
use crate::viewport::Viewport;

/// Uniforms for one frame of the raw pipeline.
pub fn frame_uniforms(rotation: f32, viewport: &Viewport, config: &DrawLoopConfig) -> Uniforms {
    let perspective = &config.perspective;
    Uniforms {
        projection: build_projection(
            perspective.fov_radians(),
            viewport.aspect(),
            perspective.near,
            perspective.far,
        ),
        model_view: model_view_with_offset(rotation, config.depth_offset),
    }
}

/// Clear, upload the per-frame matrices and draw `call` once.
pub fn render_frame<R: FrameRenderer>(
    renderer: &mut R,
    geometry: &R::Geometry,
    call: DrawCall,
    rotation: f32,
    viewport: &Viewport,
    config: &DrawLoopConfig,
) {
    renderer.begin_frame(viewport, config.clear_color);
    renderer.set_uniforms(&frame_uniforms(rotation, viewport, config));
    renderer.draw_indexed(geometry, call);
}

/// Drives the raw pipeline: one uploaded mesh, one rotation angle.
pub struct DrawLoop<R: FrameRenderer> {
    renderer: R,
    geometry: R::Geometry,
    call: DrawCall,
    rotation: f32,
    frames: u64,
    config: DrawLoopConfig,
}

impl<R: FrameRenderer> DrawLoop<R> {
    /// Upload `geometry` and start at rotation zero.
    pub fn new(mut renderer: R, geometry: &Geometry, config: DrawLoopConfig) -> Result<Self> {
        let handle = renderer.upload_geometry(geometry)?;
        log::debug!(
            "draw loop ready: {} vertices, {} indices",
            geometry.vertex_count(),
            geometry.index_count()
        );

        Ok(Self {
            renderer,
            geometry: handle,
            call: DrawCall::whole(geometry),
            rotation: 0.0,
            frames: 0,
            config,
        })
    }

    /// Advance the rotation by one step, then draw.
    pub fn tick(&mut self, viewport: &Viewport) {
        self.rotation += self.config.rotation_step;
        self.frames += 1;
        render_frame(
            &mut self.renderer,
            &self.geometry,
            self.call,
            self.rotation,
            viewport,
            &self.config,
        );
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
