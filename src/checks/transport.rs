//! Transport security probes: HTTPS, secure context, mixed content

use crate::capability::PageEnvironment;
use crate::report::{CheckResult, Severity};

/// Whether the page travelled over an encrypted connection
pub fn https(page: &dyn PageEnvironment) -> CheckResult {
    let is_https = page.scheme() == "https:";

    let result = if is_https {
        CheckResult::passing("https", "HTTPS Connection", Severity::Critical)
            .message("Your connection is encrypted with HTTPS")
            .recommendation("Keep using HTTPS for all websites.")
    } else {
        CheckResult::failing("https", "HTTPS Connection", Severity::Critical)
            .message("WARNING: Unencrypted HTTP connection detected")
            .recommendation("Always use HTTPS. Avoid entering sensitive data on HTTP sites.")
    };

    result.why_matters(
        "HTTPS encrypts your data in transit. Without HTTPS, hackers on the same network \
         (coffee shop WiFi, public hotspots) can intercept your passwords, credit card \
         numbers, and private messages. Always look for the padlock icon in your browser.",
    )
}

/// The platform's own secure-context verdict (HTTPS or localhost)
pub fn secure_context(page: &dyn PageEnvironment) -> CheckResult {
    let secure = page.is_secure_context();

    let result = if secure {
        CheckResult::passing("secure-context", "Secure Context", Severity::Critical)
            .message("Running in secure context (HTTPS or localhost)")
            .recommendation("Good! Secure contexts enable modern security features.")
    } else {
        CheckResult::failing("secure-context", "Secure Context", Severity::Critical)
            .message("NOT running in secure context")
            .recommendation("Only use sensitive features on HTTPS sites.")
    };

    result.why_matters(
        "Secure contexts (HTTPS or localhost) are required for modern security features \
         like geolocation, camera access, and service workers. They ensure your connection \
         is encrypted and prevent downgrade attacks.",
    )
}

/// Scan a secure page for plain-HTTP subresources
///
/// Vacuously passes on non-HTTPS pages; the check only means something
/// when there is an encrypted connection to undermine.
pub fn mixed_content(page: &dyn PageEnvironment) -> CheckResult {
    if page.scheme() != "https:" {
        return CheckResult::notice("mixed-content", "Mixed Content Protection", Severity::Low)
            .message("Not on HTTPS - check not applicable")
            .recommendation("This check only applies to HTTPS sites.")
            .why_matters(
                "Mixed content occurs when HTTPS pages load HTTP resources. This creates \
                 security holes in otherwise secure connections. Modern browsers block \
                 mixed content to maintain encryption integrity.",
            );
    }

    let has_insecure = page
        .resource_urls()
        .iter()
        .any(|url| url.starts_with("http:"));

    let result = if has_insecure {
        CheckResult::warning("mixed-content", "Mixed Content Protection", Severity::Medium)
            .message("Insecure HTTP resources detected on HTTPS page")
            .recommendation("Sites should load all resources via HTTPS to maintain security.")
    } else {
        CheckResult::passing("mixed-content", "Mixed Content Protection", Severity::Medium)
            .message("No mixed content detected")
            .recommendation("Good! All resources are loaded securely.")
    };

    result.why_matters(
        "Mixed content occurs when HTTPS pages load HTTP resources. This creates security \
         holes where attackers can inject malicious content or spy on your activity, \
         breaking the encryption promise of HTTPS.",
    )
}
