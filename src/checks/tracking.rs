//! Tracking-defense probes: do-not-track, third-party cookies, canvas
//! fingerprinting

use crate::capability::{CanvasProvider, PageEnvironment};
use crate::error::Result;
use crate::report::{CheckResult, Severity};

/// What `toDataURL` returns when the 2D drawing surface stayed empty.
/// Fingerprint blockers suppress the draw calls, so a probe canvas
/// serializes to exactly this 1x1 transparent PNG.
pub const BLANK_CANVAS_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Whether any do-not-track signal is switched on
pub fn do_not_track(page: &dyn PageEnvironment) -> CheckResult {
    let dnt = page.do_not_track();

    let result = if dnt {
        CheckResult::passing("dnt", "Do Not Track", Severity::High)
            .message("Do Not Track is enabled in your browser")
            .recommendation("Good! Many sites respect this setting.")
    } else {
        CheckResult::warning("dnt", "Do Not Track", Severity::High)
            .message("Do Not Track is not enabled")
            .recommendation("Enable Do Not Track in your browser settings for additional privacy.")
    };

    result.why_matters(
        "Do Not Track tells websites you don't want to be tracked across the internet. \
         While not legally enforceable, many reputable sites respect this preference. \
         It's one layer in protecting your browsing privacy from advertisers and \
         analytics companies.",
    )
}

/// Third-party cookie posture, inferred from the browser family
///
/// There is no direct API for this, so the verdict comes from what each
/// engine ships by default: Chromium ≥ 115 blocks, Firefox blocks via
/// Enhanced Tracking Protection, Safari via Intelligent Tracking
/// Prevention. Unrecognized browsers fall back to whether cookies work
/// at all.
pub fn third_party_cookies(page: &dyn PageEnvironment) -> Result<CheckResult> {
    let ua = page.user_agent()?.to_lowercase();

    // Edge must be sniffed before Chrome: its UA carries both markers.
    let (blocked, browser) = if ua.contains("edg/") {
        let version = ua_version(&ua, "edg/");
        (version >= 115, format!("Edge {}", version))
    } else if ua.contains("chrome/") && !ua.contains("edg") {
        let version = ua_version(&ua, "chrome/");
        (version >= 115, format!("Chrome {}", version))
    } else if ua.contains("firefox/") {
        (true, "Firefox".to_string())
    } else if ua.contains("safari/") && !ua.contains("chrome") {
        (true, "Safari".to_string())
    } else {
        (!page.cookies_enabled()?, "Unknown browser".to_string())
    };

    let result = if blocked {
        CheckResult::passing("cookies", "Third-Party Cookies", Severity::High)
            .message(format!("{} blocks third-party cookies by default", browser))
            .recommendation("Good! Your browser protects you from cross-site tracking.")
    } else {
        CheckResult::warning("cookies", "Third-Party Cookies", Severity::High)
            .message(format!("{} may allow third-party cookies", browser))
            .recommendation(
                "Update your browser or check privacy settings to block third-party cookies.",
            )
    };

    Ok(result.why_matters(
        "Third-party cookies allow advertisers to track you across different websites. \
         They build a profile of your interests and browsing habits. Blocking them \
         prevents this cross-site tracking and protects your privacy without breaking \
         most websites.",
    ))
}

/// Fallback row when the user agent cannot be read
pub fn cookies_unavailable() -> CheckResult {
    CheckResult::passing("cookies", "Third-Party Cookies", Severity::High)
        .message("Third-party cookies likely blocked")
        .recommendation("Modern browsers block third-party cookies by default.")
        .why_matters(
            "Third-party cookies allow advertisers to track you across different websites. \
             Modern browsers block them by default for better privacy.",
        )
}

/// Whether a canvas fingerprint blocker is active
pub fn fingerprinting(canvas: &dyn CanvasProvider) -> Result<CheckResult> {
    let data_url = canvas.render_probe()?;
    let protected = data_url == BLANK_CANVAS_DATA_URL;

    let result = if protected {
        CheckResult::passing(
            "fingerprinting",
            "Canvas Fingerprinting Protection",
            Severity::Medium,
        )
        .message("Canvas fingerprinting is likely blocked")
        .recommendation("Good! Your browser has fingerprinting protection.")
    } else {
        CheckResult::warning(
            "fingerprinting",
            "Canvas Fingerprinting Protection",
            Severity::Medium,
        )
        .message("Canvas fingerprinting may be possible")
        .recommendation(
            "Consider using browser extensions like uBlock Origin or Privacy Badger to \
             block fingerprinting.",
        )
    };

    Ok(result.why_matters(
        "Canvas fingerprinting creates a unique \"signature\" of your device that can \
         track you across websites without cookies. Websites can identify your specific \
         computer even in private browsing mode. Blocking it prevents this invisible \
         tracking.",
    ))
}

/// Fallback row when the canvas API itself is blocked
pub fn fingerprinting_unavailable() -> CheckResult {
    CheckResult::passing(
        "fingerprinting",
        "Canvas Fingerprinting Protection",
        Severity::Medium,
    )
    .message("Canvas API blocked or restricted")
    .recommendation("Canvas API appears to be blocked - good for privacy!")
    .why_matters(
        "Canvas fingerprinting creates a unique \"signature\" of your device that can \
         track you across websites without cookies. Your browser is blocking this \
         tracking technique.",
    )
}

/// Major version following `marker` in a lowercased user-agent string;
/// 0 when the marker or the digits are missing
fn ua_version(ua: &str, marker: &str) -> u32 {
    let Some(pos) = ua.find(marker) else {
        return 0;
    };
    ua[pos + marker.len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
