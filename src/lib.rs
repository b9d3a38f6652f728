//! # privcheck-wasm
//!
//! A browser privacy check engine compiled to WebAssembly.
//!
//! Fifteen probes inspect the current page, the browser's permission
//! grants, and its network behavior, and fold into a single scored report
//! that the hosting page can render directly.
//!
//! ## Architecture
//!
//! ```text
//! run_privacy_check (WASM export)
//!   ↓
//! Check runner (fixed probe order)
//!   ↓
//! Capability ports (page, permissions, fetch, RTC, canvas, timers)
//!   ↓
//! Browser APIs (via web-sys)
//! ```
//!
//! ## Features
//!
//! - **No OS dependencies**: Pure WASM, uses only browser APIs
//! - **Deterministic**: Fixed probe order, one report shape for every run
//! - **Fail-soft**: A broken browser API downgrades one row, never the run
//! - **Portable core**: Probes run natively against scripted capabilities

// Modules
pub mod capability;
pub mod checks;
mod error;
pub mod report;
#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use error::{CheckError, Result};
pub use report::{CheckResult, Icon, Report, ScoreRating, Severity};
pub use capability::{
    CanvasProvider, CheckEnv, HttpClient, IceEvent, IceGathering, PageEnvironment,
    PermissionKind, PermissionState, PermissionsQuery, RtcProvider, SleepProvider,
};
pub use checks::{run_checks, CheckConfig, DEFAULT_GATHER_WINDOW, PROBE_COUNT};
#[cfg(target_arch = "wasm32")]
pub use browser::{
    run_privacy_check, WasmCanvas, WasmHttpClient, WasmPage, WasmPermissions, WasmRtcProvider,
    WasmSleeper,
};
