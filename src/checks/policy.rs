//! Page-policy probes: referrer policy, CSP meta tag, JavaScript notice

use crate::capability::PageEnvironment;
use crate::report::{CheckResult, Icon, Severity};

/// Referrer policies that do not leak the page URL cross-origin
const STRICT_POLICIES: [&str; 3] = ["no-referrer", "same-origin", "strict-origin"];

/// Whether the page pins a privacy-friendly referrer policy
pub fn referrer_policy(page: &dyn PageEnvironment) -> CheckResult {
    let policy = page
        .referrer_policy()
        .unwrap_or_else(|| "default".to_string());
    let strict = STRICT_POLICIES.contains(&policy.as_str());

    let result = if strict {
        CheckResult::passing("referrer", "Referrer Policy", Severity::Low)
            .message(format!("Strict referrer policy: {}", policy))
            .recommendation("Good! This site uses a privacy-friendly referrer policy.")
    } else {
        CheckResult::failing("referrer", "Referrer Policy", Severity::Low)
            .icon(Icon::Info)
            .message(format!("Referrer policy: {} (may leak URLs)", policy))
            .recommendation(
                "Sites should use strict referrer policies to protect your browsing history.",
            )
    };

    result.why_matters(
        "Referrer headers tell websites where you came from - the full URL including \
         search queries and page paths. Strict referrer policies prevent leaking your \
         browsing history and sensitive URL parameters to third parties.",
    )
}

/// Whether the page declares a Content Security Policy meta tag
pub fn content_security_policy(page: &dyn PageEnvironment) -> CheckResult {
    let has_csp = page.has_csp_meta();

    let result = if has_csp {
        CheckResult::passing("csp", "Content Security Policy", Severity::Medium)
            .message("Content Security Policy is active")
            .recommendation("Good! CSP helps protect against XSS attacks.")
    } else {
        CheckResult::warning("csp", "Content Security Policy", Severity::Medium)
            .message("No Content Security Policy detected")
            .recommendation("Sites should implement CSP to prevent code injection attacks.")
    };

    result.why_matters(
        "Content Security Policy (CSP) protects you from cross-site scripting (XSS) \
         attacks by controlling which scripts can run on a website. It prevents attackers \
         from injecting malicious code that could steal your data or hijack your session.",
    )
}

/// Informational row: the check running at all proves scripts execute
pub fn javascript(_page: &dyn PageEnvironment) -> CheckResult {
    CheckResult::notice("javascript", "JavaScript Security", Severity::Low)
        .message("JavaScript is enabled (required for modern web)")
        .recommendation(
            "JavaScript is essential for most sites. Use browser extensions like NoScript \
             or uBlock Origin to selectively block JS on untrusted sites.",
        )
        .why_matters(
            "JavaScript powers modern websites but can also be used maliciously to track \
             you, inject ads, or exploit vulnerabilities. While necessary for most sites, \
             selective blocking on untrusted sites adds extra protection.",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mock::StaticPage;

    #[test]
    fn test_strict_referrer_policies_pass() {
        for policy in STRICT_POLICIES {
            let page = StaticPage {
                referrer: Some(policy.into()),
                ..Default::default()
            };
            let row = referrer_policy(&page);
            assert!(row.passed, "{} should pass", policy);
            assert!(row.message.contains(policy));
        }
    }

    #[test]
    fn test_loose_referrer_policy_fails_softly() {
        let page = StaticPage {
            referrer: Some("unsafe-url".into()),
            ..Default::default()
        };
        let row = referrer_policy(&page);
        assert!(!row.passed);
        assert_eq!(row.icon, Icon::Info);
        assert!(row.message.contains("unsafe-url"));
    }

    #[test]
    fn test_missing_referrer_meta_reads_as_default() {
        let page = StaticPage {
            referrer: None,
            ..Default::default()
        };
        let row = referrer_policy(&page);
        assert!(!row.passed);
        assert!(row.message.contains("default"));
    }

    #[test]
    fn test_csp_meta_presence() {
        let row = content_security_policy(&StaticPage::default());
        assert!(row.passed);

        let page = StaticPage {
            csp_meta: false,
            ..Default::default()
        };
        let row = content_security_policy(&page);
        assert!(!row.passed);
        assert_eq!(row.icon, Icon::Warn);
    }

    #[test]
    fn test_javascript_row_is_always_informational() {
        let row = javascript(&StaticPage::default());
        assert!(row.passed);
        assert_eq!(row.icon, Icon::Info);
        assert_eq!(row.severity, Severity::Low);
    }
}
