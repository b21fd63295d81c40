//! Error types for spincube renderers.
//!
//! Every variant is an initialization failure. Once a backend has a context,
//! compiled shaders and uploaded buffers, frames are drawn without a failure
//! path.

use std::fmt;

use thiserror::Error;

/// Shader pipeline stage, used in compile diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("failed to create {0}")]
    ResourceCreation(&'static str),

    #[error("shader program has no {kind} named `{name}`")]
    MissingBinding { kind: &'static str, name: &'static str },

    #[error("host environment error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_compile_message_names_stage() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: ERROR: 0:3: syntax error"
        );
    }
}
