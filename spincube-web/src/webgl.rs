//! WebGL 1 backend for the draw loop.

use spincube_core::shader::{
    COLOR_ATTRIBUTE, COLOR_COMPONENTS, FRAGMENT_SHADER_SOURCE, MODEL_VIEW_UNIFORM,
    POSITION_ATTRIBUTE, POSITION_COMPONENTS, PROJECTION_UNIFORM, VERTEX_SHADER_SOURCE,
};
use spincube_core::{
    Color, DrawCall, FrameRenderer, Geometry, IndexType, Primitive, RenderError, Result,
    ShaderStage, Uniforms, Viewport,
};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL, WebGlShader,
    WebGlUniformLocation,
};

use crate::js_error;

/// Buffers resident on the GPU.
pub struct WebGlGeometry {
    positions: WebGlBuffer,
    colors: WebGlBuffer,
    indices: WebGlBuffer,
}

pub struct WebGlRenderer {
    gl: GL,
    program: WebGlProgram,
    position_location: u32,
    color_location: u32,
    projection_location: WebGlUniformLocation,
    model_view_location: WebGlUniformLocation,
}

impl WebGlRenderer {
    /// Acquire a `webgl` context from `canvas` and build the shader program.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self> {
        let gl = canvas
            .get_context("webgl")
            .map_err(|e| RenderError::ContextUnavailable(js_error(&e)))?
            .ok_or_else(|| RenderError::ContextUnavailable("WebGL is not supported".to_string()))?
            .dyn_into::<GL>()
            .map_err(|_| RenderError::ContextUnavailable("unexpected context type".to_string()))?;
        Self::new(gl)
    }

    pub fn new(gl: GL) -> Result<Self> {
        let vertex = compile_shader(&gl, ShaderStage::Vertex, VERTEX_SHADER_SOURCE)?;
        let fragment = compile_shader(&gl, ShaderStage::Fragment, FRAGMENT_SHADER_SOURCE)?;
        let program = link_program(&gl, &vertex, &fragment)?;

        let position_location = attribute_location(&gl, &program, POSITION_ATTRIBUTE)?;
        let color_location = attribute_location(&gl, &program, COLOR_ATTRIBUTE)?;
        let projection_location = uniform_location(&gl, &program, PROJECTION_UNIFORM)?;
        let model_view_location = uniform_location(&gl, &program, MODEL_VIEW_UNIFORM)?;

        gl.use_program(Some(&program));
        log::info!("WebGL pipeline ready");

        Ok(Self {
            gl,
            program,
            position_location,
            color_location,
            projection_location,
            model_view_location,
        })
    }

    fn static_buffer(&self, target: u32, data: &js_sys::Object) -> Result<WebGlBuffer> {
        let buffer = self
            .gl
            .create_buffer()
            .ok_or(RenderError::ResourceCreation("buffer"))?;
        self.gl.bind_buffer(target, Some(&buffer));
        self.gl
            .buffer_data_with_array_buffer_view(target, data, GL::STATIC_DRAW);
        Ok(buffer)
    }

    fn bind_attribute(&self, buffer: &WebGlBuffer, location: u32, components: i32) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }
}

impl FrameRenderer for WebGlRenderer {
    type Geometry = WebGlGeometry;

    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<WebGlGeometry> {
        let positions = js_sys::Float32Array::from(geometry.position_data().as_slice());
        let colors = js_sys::Float32Array::from(geometry.color_data().as_slice());
        let indices = js_sys::Uint16Array::from(geometry.indices());

        Ok(WebGlGeometry {
            positions: self.static_buffer(GL::ARRAY_BUFFER, &positions)?,
            colors: self.static_buffer(GL::ARRAY_BUFFER, &colors)?,
            indices: self.static_buffer(GL::ELEMENT_ARRAY_BUFFER, &indices)?,
        })
    }

    fn begin_frame(&mut self, _viewport: &Viewport, clear_color: Color) {
        let gl = &self.gl;
        gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());
        gl.clear_color(clear_color.r, clear_color.g, clear_color.b, clear_color.a);
        gl.clear_depth(1.0);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_func(GL::LEQUAL);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    fn set_uniforms(&mut self, uniforms: &Uniforms) {
        self.gl.use_program(Some(&self.program));
        self.gl.uniform_matrix4fv_with_f32_array(
            Some(&self.projection_location),
            false,
            &uniforms.projection,
        );
        self.gl.uniform_matrix4fv_with_f32_array(
            Some(&self.model_view_location),
            false,
            &uniforms.model_view,
        );
    }

    fn draw_indexed(&mut self, geometry: &WebGlGeometry, call: DrawCall) {
        self.bind_attribute(&geometry.positions, self.position_location, POSITION_COMPONENTS);
        self.bind_attribute(&geometry.colors, self.color_location, COLOR_COMPONENTS);
        self.gl
            .bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&geometry.indices));
        self.gl.draw_elements_with_i32(
            primitive_mode(call.primitive),
            call.count as i32,
            index_type(call.index_type),
            call.offset as i32,
        );
    }
}

pub(crate) fn shader_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    }
}

pub(crate) fn primitive_mode(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Triangles => GL::TRIANGLES,
    }
}

pub(crate) fn index_type(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U16 => GL::UNSIGNED_SHORT,
    }
}

fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(shader_kind(stage))
        .ok_or(RenderError::ResourceCreation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(RenderError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or(RenderError::ResourceCreation("shader program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(RenderError::ProgramLink(log))
    }
}

fn attribute_location(gl: &GL, program: &WebGlProgram, name: &'static str) -> Result<u32> {
    u32::try_from(gl.get_attrib_location(program, name)).map_err(|_| RenderError::MissingBinding {
        kind: "attribute",
        name,
    })
}

fn uniform_location(
    gl: &GL,
    program: &WebGlProgram,
    name: &'static str,
) -> Result<WebGlUniformLocation> {
    gl.get_uniform_location(program, name)
        .ok_or(RenderError::MissingBinding {
            kind: "uniform",
            name,
        })
}
