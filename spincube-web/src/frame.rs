//! `requestAnimationFrame` driver.

use std::cell::RefCell;
use std::rc::Rc;

use spincube_core::{RenderError, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::js_error;

type FrameCallback = Closure<dyn FnMut()>;

/// Call `tick` once per display refresh until the page goes away.
///
/// Each tick runs to completion before the next one is requested.
pub fn run_every_frame<F>(window: Window, mut tick: F) -> Result<()>
where
    F: FnMut() + 'static,
{
    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);
    let loop_window = window.clone();

    *slot.borrow_mut() = Some(Closure::new(move || {
        tick();
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = request_frame(&loop_window, callback) {
                log::error!("frame loop stopped: {}", err);
            }
        }
    }));

    let first = slot.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| RenderError::Host("frame callback missing".to_string()))?;
    request_frame(&window, callback)?;
    Ok(())
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|e| RenderError::Host(js_error(&e)))
}
