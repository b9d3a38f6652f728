//! Capability ports the probes run against
//!
//! Every browser API a probe touches is reached through one of these
//! traits. The real implementations live in `crate::browser` on top of
//! `web-sys`; native tests drive the same probes with scripted doubles.
//! Everything here is single-threaded by construction (the engine runs on
//! the browser main thread), so implementations are shared as `Rc<dyn …>`
//! and the async traits are `?Send`.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::error::Result;

/// Authorization state reported by the platform permission query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// The sensitive features the engine queries permission state for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Geolocation,
    Notifications,
    Camera,
    Microphone,
}

impl PermissionKind {
    /// Descriptor name the Permissions API expects
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Geolocation => "geolocation",
            PermissionKind::Notifications => "notifications",
            PermissionKind::Camera => "camera",
            PermissionKind::Microphone => "microphone",
        }
    }
}

/// Document, location and navigator surface of the hosting page
///
/// The synchronous reads cannot fail in a browser; implementations fall
/// back to neutral values rather than erroring. The two navigator reads
/// that can genuinely throw return `Result`.
pub trait PageEnvironment {
    /// Transport scheme with the trailing colon (`"https:"`, `"http:"`, …)
    fn scheme(&self) -> String;

    /// The platform's own secure-context verdict
    fn is_secure_context(&self) -> bool;

    /// Content of `<meta name="referrer">`, if the page carries one
    fn referrer_policy(&self) -> Option<String>;

    /// Whether a `<meta http-equiv="Content-Security-Policy">` tag exists
    fn has_csp_meta(&self) -> bool;

    /// Resolved URLs of every script, stylesheet link and image on the page
    fn resource_urls(&self) -> Vec<String>;

    /// Whether any of the do-not-track signals is switched on
    fn do_not_track(&self) -> bool;

    fn user_agent(&self) -> Result<String>;

    fn cookies_enabled(&self) -> Result<bool>;
}

/// Permissions API port
#[async_trait(?Send)]
pub trait PermissionsQuery {
    /// Query the authorization state for one named feature
    async fn query(&self, kind: PermissionKind) -> Result<PermissionState>;
}

/// Minimal HTTP GET used by the public-IP lookup
#[async_trait(?Send)]
pub trait HttpClient {
    /// Fetch `url` and return the body text; non-OK statuses are errors
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// One ICE gathering event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IceEvent {
    /// A candidate line was emitted
    Candidate(String),
    /// The null terminal candidate: gathering is complete
    Complete,
}

/// An in-flight ICE gathering session
///
/// Owns the underlying peer connection. `close` releases it and must be
/// safe to call more than once; implementations also close on drop so the
/// connection never outlives the probe.
#[async_trait(?Send)]
pub trait IceGathering {
    /// Wait for the next gathering event
    async fn next_event(&mut self) -> Result<IceEvent>;

    /// Release the peer connection
    fn close(&mut self);
}

/// Factory port for WebRTC candidate harvesting
pub trait RtcProvider {
    /// Start a gathering session: a peer connection with no ICE servers,
    /// one data channel, and a local offer
    ///
    /// Returns [`CheckError::Unsupported`](crate::CheckError::Unsupported)
    /// when the platform has no peer connection constructor at all.
    fn open_gathering(&self) -> Result<Box<dyn IceGathering>>;
}

/// Canvas 2D port for the fingerprint probe
pub trait CanvasProvider {
    /// Render the reference scene and return the canvas data URL
    fn render_probe(&self) -> Result<String>;
}

/// Timer port; the engine never sleeps on its own
pub trait SleepProvider {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// The full capability set one check run needs
#[derive(Clone)]
pub struct CheckEnv {
    pub page: Rc<dyn PageEnvironment>,
    pub permissions: Rc<dyn PermissionsQuery>,
    pub http: Rc<dyn HttpClient>,
    pub rtc: Rc<dyn RtcProvider>,
    pub canvas: Rc<dyn CanvasProvider>,
    pub sleep: Rc<dyn SleepProvider>,
}
