//! Canvas lookup and pixel-ratio sizing.

use spincube_core::{RenderError, Result, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

use crate::js_error;

pub fn host_window() -> Result<Window> {
    web_sys::window().ok_or_else(|| RenderError::Host("no global window".to_string()))
}

pub fn host_document(window: &Window) -> Result<Document> {
    window
        .document()
        .ok_or_else(|| RenderError::Host("window has no document".to_string()))
}

pub fn canvas_by_id(document: &Document, id: &str) -> Result<HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| RenderError::Host(format!("no element with id `{}`", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RenderError::Host(format!("element `{}` is not a canvas", id)))
}

/// A missing or zero ratio counts as 1.
pub fn effective_pixel_ratio(reported: f64) -> f32 {
    if reported.is_finite() && reported > 0.0 {
        reported as f32
    } else {
        1.0
    }
}

/// Current CSS size of the canvas with the window's pixel ratio.
pub fn client_viewport(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    Viewport::new(
        canvas.client_width() as f32,
        canvas.client_height() as f32,
        effective_pixel_ratio(window.device_pixel_ratio()),
    )
}

/// Size the backing store to the physical pixel count and pin the CSS size.
pub fn fit_backing_store(canvas: &HtmlCanvasElement, viewport: &Viewport) -> Result<()> {
    let (width, height) = viewport.physical_size();
    canvas.set_width(width);
    canvas.set_height(height);

    let style = canvas.style();
    style
        .set_property("width", &css_px(viewport.width))
        .and_then(|()| style.set_property("height", &css_px(viewport.height)))
        .map_err(|e| RenderError::Host(js_error(&e)))?;

    log::debug!(
        "canvas backing store {}x{} at ratio {}",
        width,
        height,
        viewport.device_pixel_ratio
    );
    Ok(())
}

fn css_px(value: f32) -> String {
    format!("{}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_falls_back_to_one() {
        assert_eq!(effective_pixel_ratio(0.0), 1.0);
        assert_eq!(effective_pixel_ratio(f64::NAN), 1.0);
        assert_eq!(effective_pixel_ratio(2.0), 2.0);
    }

    #[test]
    fn test_css_px() {
        assert_eq!(css_px(300.0), "300px");
        assert_eq!(css_px(150.5), "150.5px");
    }
}
