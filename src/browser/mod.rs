//! Browser wiring
//!
//! `web-sys` implementations of every capability port plus the
//! `wasm-bindgen` entry points the hosting page calls. Nothing outside
//! this module touches a browser API; the engine itself stays
//! target-independent.

mod canvas;
mod http;
mod page;
mod permissions;
mod rtc;
mod sleep;

pub use canvas::WasmCanvas;
pub use http::WasmHttpClient;
pub use page::WasmPage;
pub use permissions::WasmPermissions;
pub use rtc::WasmRtcProvider;
pub use sleep::WasmSleeper;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::capability::CheckEnv;
use crate::checks::{run_checks, CheckConfig};
use crate::error::{CheckError, Result};

impl CheckEnv {
    /// Capability set backed by the live browser APIs
    pub fn browser() -> Self {
        CheckEnv {
            page: Rc::new(WasmPage::new()),
            permissions: Rc::new(WasmPermissions::new()),
            http: Rc::new(WasmHttpClient::new()),
            rtc: Rc::new(WasmRtcProvider::new()),
            canvas: Rc::new(WasmCanvas::new()),
            sleep: Rc::new(WasmSleeper::new()),
        }
    }
}

/// Set up logging and panic reporting; runs once when the module loads
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Info).unwrap();
    log::info!("🔒 Privacy check engine loaded");
}

/// Run the full privacy check against the live browser
///
/// Returns the report as a plain JS object,
/// `{ score, maxScore, checks: [...] }`, in probe declaration order.
/// Probe failures never reject the promise; they surface as
/// informational rows inside the report.
#[wasm_bindgen]
pub async fn run_privacy_check() -> std::result::Result<JsValue, JsValue> {
    let env = CheckEnv::browser();
    let config = CheckConfig::default();

    let started = js_sys::Date::now();
    let report = run_checks(&env, &config).await;
    log::info!(
        "📋 Report ready in {:.0} ms: {}/{}",
        js_sys::Date::now() - started,
        report.score,
        report.max_score
    );

    serde_wasm_bindgen::to_value(&report).map_err(|err| JsValue::from_str(&err.to_string()))
}

pub(crate) fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| CheckError::Unsupported("no window object".into()))
}

pub(crate) fn document() -> Result<web_sys::Document> {
    window()?
        .document()
        .ok_or_else(|| CheckError::Unsupported("no document object".into()))
}

/// Stringify a thrown JS value into the error taxonomy
pub(crate) fn js_err(value: JsValue) -> CheckError {
    CheckError::Api(format!("{:?}", value))
}
