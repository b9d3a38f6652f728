//! Canvas rendering probe
//!
//! Draws a short text sample into an off-document canvas and exports it.
//! A browser that randomizes or blanks canvas readback returns the same
//! data URL as an untouched 1x1 canvas, which the fingerprinting probe
//! treats as protection.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{document, js_err};
use crate::capability::CanvasProvider;
use crate::error::{CheckError, Result};

const PROBE_TEXT: &str = "privcheck canvas probe";

pub struct WasmCanvas;

impl WasmCanvas {
    pub fn new() -> Self {
        WasmCanvas
    }
}

impl CanvasProvider for WasmCanvas {
    fn render_probe(&self) -> Result<String> {
        let canvas: HtmlCanvasElement = document()?
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| CheckError::Api("created element was not a canvas".into()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| CheckError::Unsupported("canvas 2d context".into()))?
            .dyn_into()
            .map_err(|_| CheckError::Api("2d context had an unexpected type".into()))?;

        // Two overlapping draws in distinct styles, so the exported pixels
        // depend on font rendering and alpha blending.
        ctx.set_text_baseline("top");
        ctx.set_font("14px Arial");
        ctx.set_text_baseline("alphabetic");
        ctx.set_fill_style_str("#f60");
        ctx.fill_rect(125.0, 1.0, 62.0, 20.0);
        ctx.set_fill_style_str("#069");
        ctx.fill_text(PROBE_TEXT, 2.0, 15.0).map_err(js_err)?;
        ctx.set_fill_style_str("rgba(102, 204, 0, 0.7)");
        ctx.fill_text(PROBE_TEXT, 4.0, 17.0).map_err(js_err)?;

        canvas.to_data_url().map_err(js_err)
    }
}
