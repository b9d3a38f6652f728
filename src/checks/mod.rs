//! The privacy probes and the aggregator that runs them
//!
//! Fifteen probes run in fixed declaration order; the report lists them in
//! that order no matter how long the asynchronous ones take. Every fallible
//! probe runs inside a local failure boundary: a probe that cannot run
//! substitutes its own informational fallback row and the remaining probes
//! still execute. The aggregator itself cannot fail.

pub mod leaks;
pub mod permissions;
pub mod policy;
pub mod tracking;
pub mod transport;

use std::future::Future;
use std::time::Duration;

use crate::capability::CheckEnv;
use crate::report::{CheckResult, Report};

/// Number of probes in a full run
pub const PROBE_COUNT: usize = 15;

/// How long the WebRTC probe listens for ICE candidates
pub const DEFAULT_GATHER_WINDOW: Duration = Duration::from_secs(3);

/// Tunables for the probes that suspend
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// ICE gathering window for the WebRTC probe
    pub gather_window: Duration,
    /// IP-lookup endpoints, tried in order until one succeeds
    pub lookup_endpoints: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            gather_window: DEFAULT_GATHER_WINDOW,
            lookup_endpoints: vec![
                "https://ipapi.co/json/".to_string(),
                "https://api64.ipify.org?format=json".to_string(),
            ],
        }
    }
}

impl CheckConfig {
    /// Config with a custom ICE gathering window
    pub fn with_gather_window(window: Duration) -> Self {
        CheckConfig {
            gather_window: window,
            ..Default::default()
        }
    }

    /// Config with custom IP-lookup endpoints
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        CheckConfig {
            lookup_endpoints: endpoints,
            ..Default::default()
        }
    }
}

/// Run every probe in declaration order and tally the report
///
/// Never fails. Probes that cannot run are scored by their own fallback
/// rows (see [`crate::report::CheckResult::notice`]).
pub async fn run_checks(env: &CheckEnv, config: &CheckConfig) -> Report {
    log::info!("🔍 Privacy check started ({} probes)", PROBE_COUNT);

    let page = env.page.as_ref();
    let mut checks: Vec<CheckResult> = Vec::with_capacity(PROBE_COUNT);

    // 1. HTTPS status
    checks.push(transport::https(page));

    // 2. Do Not Track signal
    checks.push(tracking::do_not_track(page));

    // 3. Third-party cookie posture
    checks.push(
        guarded(
            async { tracking::third_party_cookies(page) },
            tracking::cookies_unavailable,
        )
        .await,
    );

    // 4-7. Permission grants
    checks.push(
        guarded(
            permissions::geolocation(env.permissions.as_ref()),
            permissions::geolocation_unavailable,
        )
        .await,
    );
    checks.push(
        guarded(
            permissions::notifications(env.permissions.as_ref()),
            permissions::notifications_unavailable,
        )
        .await,
    );
    checks.push(
        guarded(
            permissions::camera(env.permissions.as_ref()),
            permissions::camera_unavailable,
        )
        .await,
    );
    checks.push(
        guarded(
            permissions::microphone(env.permissions.as_ref()),
            permissions::microphone_unavailable,
        )
        .await,
    );

    // 8. WebRTC address leak
    checks.push(
        guarded(
            leaks::webrtc_leak(env.rtc.as_ref(), env.sleep.as_ref(), config.gather_window),
            leaks::webrtc_unavailable,
        )
        .await,
    );

    // 9. Canvas fingerprinting protection
    checks.push(
        guarded(
            async { tracking::fingerprinting(env.canvas.as_ref()) },
            tracking::fingerprinting_unavailable,
        )
        .await,
    );

    // 10. Secure context flag
    checks.push(transport::secure_context(page));

    // 11. Referrer policy meta tag
    checks.push(policy::referrer_policy(page));

    // 12. Content Security Policy meta tag
    checks.push(policy::content_security_policy(page));

    // 13. Mixed content scan
    checks.push(transport::mixed_content(page));

    // 14. JavaScript notice
    checks.push(policy::javascript(page));

    // 15. Public IP lookup
    checks.push(
        guarded(
            leaks::dns_leak(env.http.as_ref(), &config.lookup_endpoints),
            leaks::lookup_unavailable,
        )
        .await,
    );

    let report = Report::tally(checks);
    log::info!(
        "✅ Privacy check complete: {}/{} passed",
        report.score,
        report.max_score
    );
    report
}

/// Local failure boundary around one probe
///
/// A failing probe yields its fallback row instead of aborting the run.
async fn guarded<F>(probe: F, fallback: fn() -> CheckResult) -> CheckResult
where
    F: Future<Output = crate::error::Result<CheckResult>>,
{
    match probe.await {
        Ok(result) => result,
        Err(err) => {
            let row = fallback();
            log::warn!("⚠️ Probe '{}' could not run: {}", row.id, err);
            row
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mock::{
        hardened_env, NeverSleep, ScriptedHttp, ScriptedPermissions, ScriptedRtc, StaticCanvas,
        StaticPage,
    };
    use crate::capability::{IceEvent, PermissionKind, PermissionState};
    use crate::error::CheckError;
    use crate::report::Icon;
    use futures::executor::block_on;
    use std::rc::Rc;

    const EXPECTED_ORDER: [&str; 15] = [
        "https",
        "dnt",
        "cookies",
        "geolocation",
        "notifications",
        "camera",
        "microphone",
        "webrtc",
        "fingerprinting",
        "secure-context",
        "referrer",
        "csp",
        "mixed-content",
        "javascript",
        "dns-leak",
    ];

    #[test]
    fn test_probe_order_is_fixed() {
        let env = hardened_env();
        let report = block_on(run_checks(&env, &CheckConfig::default()));

        let ids: Vec<&str> = report.checks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, EXPECTED_ORDER);
    }

    #[test]
    fn test_hardened_environment_scores_full() {
        let env = hardened_env();
        let report = block_on(run_checks(&env, &CheckConfig::default()));

        assert_eq!(report.score, 15);
        assert_eq!(report.max_score, 15);
        assert!(report.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn test_failing_capabilities_never_abort_the_run() {
        // Every injectable capability errors; the sync page reads stay sane.
        let mut env = hardened_env();
        env.permissions = Rc::new(ScriptedPermissions {
            responses: Default::default(),
        });
        env.http = Rc::new(ScriptedHttp::new(vec![]));
        env.rtc = Rc::new(ScriptedRtc::failing(CheckError::Api("boom".into())));
        env.canvas = Rc::new(StaticCanvas {
            data_url: Err(CheckError::Api("canvas blocked".into())),
        });

        let report = block_on(run_checks(&env, &CheckConfig::default()));
        assert_eq!(report.checks.len(), 15);

        // Substituted rows score optimistically.
        for id in [
            "geolocation",
            "notifications",
            "camera",
            "microphone",
            "webrtc",
            "fingerprinting",
            "dns-leak",
        ] {
            let row = report.checks.iter().find(|c| c.id == id).unwrap();
            assert!(row.passed, "{} should fall back to a pass", id);
        }
        assert_eq!(report.score, 15);
    }

    #[test]
    fn test_hostile_environment_counts_failures() {
        let (rtc, _) = ScriptedRtc::with_events(vec![
            Ok(IceEvent::Candidate(
                "candidate:1 1 udp 2122260223 203.0.113.7 54400 typ host".into(),
            )),
            Ok(IceEvent::Complete),
        ]);
        let env = CheckEnv {
            page: Rc::new(StaticPage {
                scheme: "http:".into(),
                secure_context: false,
                referrer: None,
                csp_meta: false,
                dnt: false,
                user_agent: Ok("Mozilla/5.0 Chrome/114.0.0.0 Safari/537.36".into()),
                ..Default::default()
            }),
            permissions: Rc::new(ScriptedPermissions {
                responses: [
                    (PermissionKind::Geolocation, Ok(PermissionState::Granted)),
                    (PermissionKind::Notifications, Ok(PermissionState::Granted)),
                    (PermissionKind::Camera, Ok(PermissionState::Granted)),
                    (PermissionKind::Microphone, Ok(PermissionState::Granted)),
                ]
                .into_iter()
                .collect(),
            }),
            http: Rc::new(ScriptedHttp::new(vec![(
                "https://ipapi.co/json/",
                Ok(r#"{"ip":"203.0.113.9"}"#.into()),
            )])),
            rtc: Rc::new(rtc),
            canvas: Rc::new(StaticCanvas::textured()),
            sleep: Rc::new(NeverSleep),
        };

        let report = block_on(run_checks(&env, &CheckConfig::default()));
        assert_eq!(report.checks.len(), 15);

        // Only the always-pass rows survive: mixed-content (vacuous on
        // http:) and the javascript notice.
        assert_eq!(report.score, 2);
        let passing: Vec<&str> = report
            .checks
            .iter()
            .filter(|c| c.passed)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(passing, ["mixed-content", "javascript"]);
    }

    #[test]
    fn test_score_equals_passing_count() {
        let mut env = hardened_env();
        env.page = Rc::new(StaticPage {
            dnt: false,
            csp_meta: false,
            ..Default::default()
        });

        let report = block_on(run_checks(&env, &CheckConfig::default()));
        let passing = report.checks.iter().filter(|c| c.passed).count() as u32;
        assert_eq!(report.score, passing);
        assert_eq!(report.score, 13);
    }

    #[test]
    fn test_guarded_substitutes_fallback_row() {
        let fallback = || {
            CheckResult::notice("webrtc", "WebRTC IP Leak", crate::report::Severity::High)
                .message("Could not check WebRTC leak")
        };
        let row = block_on(guarded(
            async { Err(CheckError::Api("exploded".into())) },
            fallback,
        ));
        assert!(row.passed);
        assert_eq!(row.icon, Icon::Info);
        assert_eq!(row.message, "Could not check WebRTC leak");
    }

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.gather_window, Duration::from_secs(3));
        assert_eq!(config.lookup_endpoints.len(), 2);
        assert!(config.lookup_endpoints[0].contains("ipapi.co"));
    }
}
