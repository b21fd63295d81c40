/// Spincube Core Library - backend-independent rendering logic
///
/// This library holds everything the two cube programs share: matrix
/// construction, the fixed cube geometry, the pass-through shader pair, the
/// `FrameRenderer` backend interface, the raw-pipeline draw loop and the
/// scene graph.

pub mod color;
pub mod config;
pub mod draw_loop;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod viewport;

// Re-export commonly used types
pub use color::Color;
pub use config::{DrawLoopConfig, PerspectiveConfig, SceneConfig};
pub use draw_loop::{render_frame, DrawLoop};
pub use error::{RenderError, Result, ShaderStage};
pub use geometry::Geometry;
pub use matrix::{build_model_view, build_projection, ColumnMajor};
pub use renderer::{DrawCall, FrameRenderer, IndexType, Primitive, RecordingRenderer, Uniforms};
pub use scene::{PerspectiveCamera, Scene, SceneRenderer, SpinningCube};
pub use viewport::Viewport;
