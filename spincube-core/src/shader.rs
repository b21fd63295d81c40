//! The pass-through shader pair shared by every GL-style backend.
//!
//! The vertex stage applies `projection * model_view` and forwards the
//! per-vertex color; the fragment stage writes the interpolated color
//! unmodified. The software rasterizer reproduces exactly this behavior.

pub const POSITION_ATTRIBUTE: &str = "aVertexPosition";
pub const COLOR_ATTRIBUTE: &str = "aVertexColor";
pub const MODEL_VIEW_UNIFORM: &str = "uModelViewMatrix";
pub const PROJECTION_UNIFORM: &str = "uProjectionMatrix";

/// Components per position attribute.
pub const POSITION_COMPONENTS: i32 = 3;
/// Components per color attribute.
pub const COLOR_COMPONENTS: i32 = 4;

pub const VERTEX_SHADER_SOURCE: &str = r#"
    attribute vec4 aVertexPosition;
    attribute vec4 aVertexColor;

    uniform mat4 uModelViewMatrix;
    uniform mat4 uProjectionMatrix;

    varying lowp vec4 vColor;

    void main() {
        gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
        vColor = aVertexColor;
    }
"#;

pub const FRAGMENT_SHADER_SOURCE: &str = r#"
    precision mediump float;
    varying lowp vec4 vColor;

    void main() {
        gl_FragColor = vColor;
    }
"#;
