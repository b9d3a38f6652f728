//! Network-leak probes: WebRTC ICE harvesting and the public-IP lookup

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use futures::future::{self, Either};
use serde::Deserialize;

use crate::capability::{HttpClient, IceEvent, RtcProvider, SleepProvider};
use crate::error::{CheckError, Result};
use crate::report::{CheckResult, Icon, Severity};

const WEBRTC_WHY: &str =
    "WebRTC can expose your real IP address even when using a VPN. This reveals your true \
     location and identity to websites. Blocking WebRTC prevents this leak and protects \
     your privacy when using VPNs or proxies.";

/// Harvest ICE candidates from a bare peer connection and score the leak
///
/// Candidates are collected until the terminal (null) candidate arrives or
/// the gathering window elapses, whichever happens first. Every exit path
/// closes the session, error included. A platform with no peer connection
/// at all scores as a pass: the browser blocks the API outright.
pub async fn webrtc_leak(
    rtc: &dyn RtcProvider,
    sleep: &dyn SleepProvider,
    gather_window: Duration,
) -> Result<CheckResult> {
    let mut session = match rtc.open_gathering() {
        Ok(session) => session,
        Err(err) if err.is_unsupported() => {
            log::info!("🛡️ WebRTC unavailable: {}", err);
            return Ok(webrtc_blocked());
        }
        Err(err) => return Err(err),
    };

    let mut addresses: Vec<String> = Vec::new();
    let mut window = sleep.sleep(gather_window);

    let outcome = loop {
        let event = session.next_event();
        match future::select(event, &mut window).await {
            Either::Left((Ok(IceEvent::Candidate(candidate)), _)) => {
                if let Some(address) = first_ipv4_token(&candidate) {
                    if !addresses.contains(&address) {
                        addresses.push(address);
                    }
                }
            }
            Either::Left((Ok(IceEvent::Complete), _)) => break Ok(()),
            Either::Left((Err(err), _)) => break Err(err),
            // Gathering window elapsed; score whatever was collected.
            Either::Right(((), _)) => break Ok(()),
        }
    };
    session.close();
    outcome?;

    log::debug!("ICE gathering finished, {} address(es)", addresses.len());
    Ok(webrtc_verdict(&addresses))
}

/// Fallback row when the probe failed after the API was found present
pub fn webrtc_unavailable() -> CheckResult {
    CheckResult::notice("webrtc", "WebRTC IP Leak", Severity::High)
        .message("Could not check WebRTC leak")
        .recommendation("WebRTC check failed - likely blocked or disabled.")
        .why_matters(
            "WebRTC can expose your real IP address even when using a VPN. If this check \
             failed, WebRTC may already be blocked, which is good for privacy.",
        )
}

/// The platform has no peer connection constructor at all
fn webrtc_blocked() -> CheckResult {
    CheckResult::passing("webrtc", "WebRTC IP Leak", Severity::High)
        .message("WebRTC is not available (good for privacy)")
        .recommendation("WebRTC is disabled or blocked - your IP is protected.")
        .why_matters(WEBRTC_WHY)
}

fn webrtc_verdict(addresses: &[String]) -> CheckResult {
    let leaked = !addresses.is_empty();

    let result = if leaked {
        CheckResult::failing("webrtc", "WebRTC IP Leak", Severity::High)
            .message(format!(
                "WebRTC leak detected: {} IP(s) exposed",
                addresses.len()
            ))
            .recommendation(
                "WebRTC can expose your real IP even behind VPN. Consider disabling WebRTC \
                 in browser settings.",
            )
    } else {
        CheckResult::passing("webrtc", "WebRTC IP Leak", Severity::High)
            .message("No WebRTC IP leak detected")
            .recommendation("Good! WebRTC is not leaking your IP address.")
    };

    result.why_matters(WEBRTC_WHY)
}

/// First whitespace token of an ICE candidate line that parses as IPv4
fn first_ipv4_token(candidate: &str) -> Option<String> {
    candidate
        .split_whitespace()
        .find_map(|token| token.parse::<Ipv4Addr>().ok())
        .map(|ip| ip.to_string())
}

/// Expected body shape of both lookup endpoints
#[derive(Debug, Deserialize)]
struct LookupBody {
    ip: String,
}

/// Resolve the visitor's apparent public address and score its exposure
///
/// Endpoints are tried in order; any transport, status or body-shape
/// failure moves on to the next. When every endpoint fails the error
/// propagates and the failure boundary substitutes
/// [`lookup_unavailable`].
pub async fn dns_leak(http: &dyn HttpClient, endpoints: &[String]) -> Result<CheckResult> {
    let mut last_error = CheckError::Network("no lookup endpoints configured".into());

    for endpoint in endpoints {
        match lookup_ip(http, endpoint).await {
            Ok(ip) => return Ok(lookup_verdict(&ip)),
            Err(err) => {
                log::debug!("IP lookup via {} failed: {}", endpoint, err);
                last_error = err;
            }
        }
    }

    Err(last_error)
}

/// Fallback row when every lookup endpoint failed
///
/// Downgraded to low severity: an unreachable lookup usually means the
/// browser's own privacy tooling blocked it.
pub fn lookup_unavailable() -> CheckResult {
    CheckResult::notice("dns-leak", "Public IP Check", Severity::Low)
        .message("IP check unavailable (browser privacy features may block this)")
        .recommendation(
            "Some browsers block IP detection for privacy. For manual DNS leak testing, \
             visit dnsleaktest.com",
        )
        .why_matters(
            "Your IP address reveals your approximate location and can be used to track \
             your online activities. Use VPNs for additional privacy protection.",
        )
}

async fn lookup_ip(http: &dyn HttpClient, endpoint: &str) -> Result<String> {
    let body = http.get_text(endpoint).await?;
    let parsed: LookupBody =
        serde_json::from_str(&body).map_err(|err| CheckError::Parse(err.to_string()))?;
    if parsed.ip.is_empty() {
        return Err(CheckError::Parse(format!("empty ip field from {}", endpoint)));
    }
    Ok(parsed.ip)
}

fn lookup_verdict(ip: &str) -> CheckResult {
    let private = is_private_address(ip);

    let result = if private {
        CheckResult::passing("dns-leak", "Public IP Check", Severity::Medium)
            .message("You appear to be on a private network")
            .recommendation("Good! Your IP is not directly exposed to the internet.")
    } else {
        CheckResult::failing("dns-leak", "Public IP Check", Severity::Medium)
            .icon(Icon::Info)
            .message(format!("Your public IP is visible: {}", ip))
            .recommendation(
                "Your IP address is visible to websites. Consider using a VPN for \
                 additional privacy. For full DNS leak testing, visit dnsleaktest.com",
            )
    };

    result.why_matters(
        "Your IP address reveals your approximate location and can be used to track your \
         online activities. VPNs hide your real IP, but DNS leaks can expose your true \
         location even with a VPN active.",
    )
}

fn is_private_address(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mock::{InstantSleep, NeverSleep, ScriptedHttp, ScriptedRtc};
    use futures::executor::block_on;

    const WINDOW: Duration = Duration::from_secs(3);

    fn host_candidate(ip: &str) -> IceEvent {
        IceEvent::Candidate(format!(
            "candidate:842163049 1 udp 2122260223 {} 58582 typ host generation 0",
            ip
        ))
    }

    #[test]
    fn test_webrtc_candidates_leak_and_dedup() {
        let (rtc, closed) = ScriptedRtc::with_events(vec![
            Ok(host_candidate("192.168.1.7")),
            // Same address on another port still counts once
            Ok(host_candidate("192.168.1.7")),
            Ok(host_candidate("10.0.0.3")),
            Ok(IceEvent::Complete),
        ]);

        let row = block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).unwrap();
        assert!(!row.passed);
        assert_eq!(row.icon, Icon::Fail);
        assert!(row.message.contains("2 IP(s) exposed"));
        assert!(closed.get(), "session must be closed after resolution");
    }

    #[test]
    fn test_webrtc_terminal_candidate_without_leak_passes() {
        let (rtc, closed) = ScriptedRtc::with_events(vec![Ok(IceEvent::Complete)]);

        let row = block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).unwrap();
        assert!(row.passed);
        assert_eq!(row.message, "No WebRTC IP leak detected");
        assert!(closed.get());
    }

    #[test]
    fn test_webrtc_window_elapses_before_terminal_candidate() {
        // Script never completes; the gathering window decides.
        let (rtc, closed) = ScriptedRtc::with_events(vec![Ok(host_candidate("203.0.113.7"))]);

        let row = block_on(webrtc_leak(&rtc, &InstantSleep, WINDOW)).unwrap();
        assert!(!row.passed);
        assert!(row.message.contains("1 IP(s) exposed"));
        assert!(closed.get(), "session must be closed on the timer path");
    }

    #[test]
    fn test_webrtc_window_with_no_candidates_passes() {
        let (rtc, closed) = ScriptedRtc::with_events(vec![]);

        let row = block_on(webrtc_leak(&rtc, &InstantSleep, WINDOW)).unwrap();
        assert!(row.passed);
        assert!(closed.get());
    }

    #[test]
    fn test_webrtc_ignores_non_ipv4_candidates() {
        // mDNS-obfuscated candidates carry .local hostnames, not addresses
        let (rtc, _) = ScriptedRtc::with_events(vec![
            Ok(IceEvent::Candidate(
                "candidate:1 1 udp 2122260223 a1b2c3d4-0000.local 58582 typ host".into(),
            )),
            Ok(IceEvent::Complete),
        ]);

        let row = block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).unwrap();
        assert!(row.passed);
    }

    #[test]
    fn test_webrtc_missing_api_scores_as_blocked() {
        let rtc = ScriptedRtc::failing(CheckError::Unsupported("RTCPeerConnection".into()));

        let row = block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).unwrap();
        assert!(row.passed);
        assert_eq!(row.icon, Icon::Pass);
        assert_eq!(row.message, "WebRTC is not available (good for privacy)");
    }

    #[test]
    fn test_webrtc_internal_failure_propagates() {
        let rtc = ScriptedRtc::failing(CheckError::Api("constructor threw".into()));
        assert!(block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).is_err());
    }

    #[test]
    fn test_webrtc_event_error_closes_session() {
        let (rtc, closed) =
            ScriptedRtc::with_events(vec![Err(CheckError::Api("gathering died".into()))]);

        assert!(block_on(webrtc_leak(&rtc, &NeverSleep, WINDOW)).is_err());
        assert!(closed.get(), "session must be closed on the error path");
    }

    #[test]
    fn test_first_ipv4_token() {
        assert_eq!(
            first_ipv4_token("candidate:1 1 udp 2122260223 192.168.1.7 58582 typ host"),
            Some("192.168.1.7".to_string())
        );
        // srflx lines carry two addresses; the first one wins
        assert_eq!(
            first_ipv4_token(
                "candidate:2 1 udp 1677729535 203.0.113.7 58582 typ srflx raddr 0.0.0.0 rport 0"
            ),
            Some("203.0.113.7".to_string())
        );
        // Octets above 255 are not addresses
        assert_eq!(
            first_ipv4_token("candidate:3 1 udp 999.1.1.1 typ host"),
            None
        );
        assert_eq!(first_ipv4_token("candidate:4 1 udp host.local"), None);
    }

    #[test]
    fn test_dns_private_address_passes() {
        let http = ScriptedHttp::new(vec![(
            "https://ipapi.co/json/",
            Ok(r#"{"ip":"192.168.0.42","city":"somewhere"}"#.into()),
        )]);
        let endpoints = endpoints();

        let row = block_on(dns_leak(&http, &endpoints)).unwrap();
        assert!(row.passed);
        assert_eq!(row.message, "You appear to be on a private network");
        // First endpoint answered; the fallback was never called.
        assert_eq!(http.calls.borrow().len(), 1);
    }

    #[test]
    fn test_dns_falls_back_to_second_endpoint() {
        let http = ScriptedHttp::new(vec![
            (
                "https://ipapi.co/json/",
                Err(CheckError::Network("HTTP 429".into())),
            ),
            (
                "https://api64.ipify.org?format=json",
                Ok(r#"{"ip":"203.0.113.50"}"#.into()),
            ),
        ]);
        let endpoints = endpoints();

        let row = block_on(dns_leak(&http, &endpoints)).unwrap();
        assert!(!row.passed);
        assert_eq!(row.icon, Icon::Info);
        assert!(row.message.contains("203.0.113.50"));
        assert_eq!(
            *http.calls.borrow(),
            vec![
                "https://ipapi.co/json/".to_string(),
                "https://api64.ipify.org?format=json".to_string(),
            ]
        );
    }

    #[test]
    fn test_dns_malformed_body_counts_as_endpoint_failure() {
        let http = ScriptedHttp::new(vec![
            ("https://ipapi.co/json/", Ok("<html>not json</html>".into())),
            (
                "https://api64.ipify.org?format=json",
                Ok(r#"{"ip":"10.1.2.3"}"#.into()),
            ),
        ]);

        let row = block_on(dns_leak(&http, &endpoints())).unwrap();
        assert!(row.passed);
        assert_eq!(http.calls.borrow().len(), 2);
    }

    #[test]
    fn test_dns_empty_ip_counts_as_endpoint_failure() {
        let http = ScriptedHttp::new(vec![
            ("https://ipapi.co/json/", Ok(r#"{"ip":""}"#.into())),
            (
                "https://api64.ipify.org?format=json",
                Ok(r#"{"ip":"127.0.0.1"}"#.into()),
            ),
        ]);

        let row = block_on(dns_leak(&http, &endpoints())).unwrap();
        assert!(row.passed);
    }

    #[test]
    fn test_dns_all_endpoints_failing_propagates() {
        let http = ScriptedHttp::new(vec![]);
        assert!(block_on(dns_leak(&http, &endpoints())).is_err());
    }

    #[test]
    fn test_dns_no_endpoints_configured() {
        let http = ScriptedHttp::new(vec![]);
        let result = block_on(dns_leak(&http, &[]));
        assert!(matches!(result, Err(CheckError::Network(_))));
    }

    #[test]
    fn test_ipv6_lookup_answer_is_scored() {
        // api64.ipify.org prefers IPv6 when available
        let http = ScriptedHttp::new(vec![(
            "https://ipapi.co/json/",
            Ok(r#"{"ip":"2001:db8::1"}"#.into()),
        )]);

        let row = block_on(dns_leak(&http, &endpoints())).unwrap();
        assert!(!row.passed);
        assert!(row.message.contains("2001:db8::1"));
    }

    #[test]
    fn test_private_address_classification() {
        assert!(is_private_address("192.168.1.1"));
        assert!(is_private_address("10.255.0.1"));
        assert!(is_private_address("172.16.4.4"));
        assert!(is_private_address("172.31.255.255"));
        assert!(is_private_address("127.0.0.1"));
        assert!(is_private_address("::1"));

        assert!(!is_private_address("8.8.8.8"));
        assert!(!is_private_address("172.32.0.1"));
        assert!(!is_private_address("2001:db8::1"));
        assert!(!is_private_address("not-an-address"));
    }

    #[test]
    fn test_lookup_unavailable_row_downgrades_severity() {
        let row = lookup_unavailable();
        assert!(row.passed);
        assert_eq!(row.severity, Severity::Low);
        assert_eq!(row.icon, Icon::Info);
    }

    fn endpoints() -> Vec<String> {
        vec![
            "https://ipapi.co/json/".to_string(),
            "https://api64.ipify.org?format=json".to_string(),
        ]
    }
}
