/// Spincube Web - the two cube programs running on a browser canvas
///
/// `start_raw_pipeline` drives fixed buffers through one indexed draw per
/// frame. `start_scene_graph` spins a cube entity in a scene and follows
/// window resizes. Both render through `WebGlRenderer`.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spincube_core::{DrawLoop, DrawLoopConfig, Geometry, RenderError, Result, SceneConfig, SpinningCube};
use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod frame;
pub mod logging;
pub mod webgl;

pub use webgl::WebGlRenderer;

/// Render a thrown JS value for diagnostics.
pub(crate) fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Log an initialization failure once and hand it to the caller as a JS error.
fn report(err: RenderError) -> JsValue {
    log::error!("initialization failed: {}", err);
    JsValue::from_str(&err.to_string())
}

/// Raw pipeline on the canvas with id `canvas_id`.
#[wasm_bindgen]
pub fn start_raw_pipeline(canvas_id: &str) -> std::result::Result<(), JsValue> {
    run_raw_pipeline(canvas_id).map_err(report)
}

/// Scene graph on the canvas with id `canvas_id`.
#[wasm_bindgen]
pub fn start_scene_graph(canvas_id: &str) -> std::result::Result<(), JsValue> {
    run_scene_graph(canvas_id).map_err(report)
}

fn run_raw_pipeline(canvas_id: &str) -> Result<()> {
    let window = canvas::host_window()?;
    let document = canvas::host_document(&window)?;
    let canvas = canvas::canvas_by_id(&document, canvas_id)?;

    // The backing store is sized once; the aspect ratio is re-read every frame.
    canvas::fit_backing_store(&canvas, &canvas::client_viewport(&window, &canvas))?;

    let renderer = WebGlRenderer::from_canvas(&canvas)?;
    let mut draw_loop = DrawLoop::new(renderer, &Geometry::colored_cube(), DrawLoopConfig::default())?;

    let host = window.clone();
    frame::run_every_frame(window, move || {
        draw_loop.tick(&canvas::client_viewport(&host, &canvas));
    })
}

fn run_scene_graph(canvas_id: &str) -> Result<()> {
    let window = canvas::host_window()?;
    let document = canvas::host_document(&window)?;
    let canvas = canvas::canvas_by_id(&document, canvas_id)?;

    let viewport = canvas::client_viewport(&window, &canvas);
    canvas::fit_backing_store(&canvas, &viewport)?;

    let renderer = WebGlRenderer::from_canvas(&canvas)?;
    let program = Rc::new(RefCell::new(SpinningCube::new(
        renderer,
        &SceneConfig::default(),
        &viewport,
    )));
    let current = Rc::new(Cell::new(viewport));

    // First frame runs now so geometry upload failures surface here.
    program.borrow_mut().frame(&viewport)?;

    {
        let program = Rc::clone(&program);
        let current = Rc::clone(&current);
        let host = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let viewport = canvas::client_viewport(&host, &canvas);
            if let Err(err) = canvas::fit_backing_store(&canvas, &viewport) {
                log::warn!("resize failed: {}", err);
                return;
            }
            current.set(viewport);
            program.borrow_mut().resize(&viewport);
        });
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(|e| RenderError::Host(js_error(&e)))?;
        // Lives as long as the page.
        on_resize.forget();
    }

    frame::run_every_frame(window, move || {
        if let Err(err) = program.borrow_mut().frame(&current.get()) {
            log::error!("frame failed: {}", err);
        }
    })
}

#[wasm_bindgen(start)]
pub fn main() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init_logging(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::debug!("spincube web module loaded");

    Ok(())
}
