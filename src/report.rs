//! Report data model
//!
//! One [`CheckResult`] per probe, tallied into a [`Report`]. Field names
//! serialize in camelCase so the page's JS consumes the report untouched:
//! `{ score, maxScore, checks: [{ id, name, passed, severity, … }] }`.

use serde::{Deserialize, Serialize};

/// Anchor on the hosting page that every result row links to.
const LEARN_MORE: &str = "#download";

/// How bad a failed check is for the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Rendering hint for a result row
///
/// Serializes as the glyph the page renders next to the row:
/// ✅ pass, ⚠️ warning, ❌ critical failure, ℹ️ informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    #[serde(rename = "✅")]
    Pass,
    #[serde(rename = "⚠️")]
    Warn,
    #[serde(rename = "❌")]
    Fail,
    #[serde(rename = "ℹ️")]
    Info,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Pass => "✅",
            Icon::Warn => "⚠️",
            Icon::Fail => "❌",
            Icon::Info => "ℹ️",
        }
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Stable machine identifier, e.g. `"webrtc"`
    pub id: String,
    /// Human-readable title, e.g. `"WebRTC IP Leak"`
    pub name: String,
    /// Whether this probe counts toward the score
    pub passed: bool,
    pub severity: Severity,
    /// What was observed
    pub message: String,
    /// What the visitor should do about it
    pub recommendation: String,
    /// Why the observed behavior matters for privacy
    pub why_matters: String,
    pub icon: Icon,
    /// Page anchor with more context
    pub learn_more: String,
}

impl CheckResult {
    fn new(id: &str, name: &str, severity: Severity, passed: bool, icon: Icon) -> Self {
        CheckResult {
            id: id.into(),
            name: name.into(),
            passed,
            severity,
            message: String::new(),
            recommendation: String::new(),
            why_matters: String::new(),
            icon,
            learn_more: LEARN_MORE.into(),
        }
    }

    /// A clean pass (✅)
    pub fn passing(id: &str, name: &str, severity: Severity) -> Self {
        Self::new(id, name, severity, true, Icon::Pass)
    }

    /// A failed check at full weight (❌)
    pub fn failing(id: &str, name: &str, severity: Severity) -> Self {
        Self::new(id, name, severity, false, Icon::Fail)
    }

    /// A failed check worth flagging but not alarming (⚠️)
    pub fn warning(id: &str, name: &str, severity: Severity) -> Self {
        Self::new(id, name, severity, false, Icon::Warn)
    }

    /// A pass the engine could not fully verify (ℹ️)
    ///
    /// Probes substitute this when the API they need is blocked or
    /// missing. Blocked APIs are themselves a privacy win, so these rows
    /// score optimistically instead of punishing hardened browsers.
    pub fn notice(id: &str, name: &str, severity: Severity) -> Self {
        Self::new(id, name, severity, true, Icon::Info)
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.message = text.into();
        self
    }

    pub fn recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendation = text.into();
        self
    }

    pub fn why_matters(mut self, text: impl Into<String>) -> Self {
        self.why_matters = text.into();
        self
    }
}

/// Coarse quality band for a finished report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRating {
    /// 80% and up
    Strong,
    /// 50% to 79%
    Moderate,
    /// Below 50%
    Weak,
}

/// Aggregated outcome of a full check run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Number of passing checks
    pub score: u32,
    /// Number of checks that ran
    pub max_score: u32,
    /// Results in probe declaration order
    pub checks: Vec<CheckResult>,
}

impl Report {
    /// Tally a completed probe sequence
    pub fn tally(checks: Vec<CheckResult>) -> Self {
        let score = checks.iter().filter(|check| check.passed).count() as u32;
        Report {
            score,
            max_score: checks.len() as u32,
            checks,
        }
    }

    /// Score as a percentage of the maximum
    pub fn percentage(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max_score) * 100.0
    }

    /// Quality band the page colors the score with
    pub fn rating(&self) -> ScoreRating {
        let pct = self.percentage();
        if pct >= 80.0 {
            ScoreRating::Strong
        } else if pct >= 50.0 {
            ScoreRating::Moderate
        } else {
            ScoreRating::Weak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_passing_checks() {
        let checks = vec![
            CheckResult::passing("https", "HTTPS Connection", Severity::Critical),
            CheckResult::failing("webrtc", "WebRTC IP Leak", Severity::High),
            CheckResult::notice("dns-leak", "DNS Leak Protection", Severity::Low),
        ];

        let report = Report::tally(checks);
        assert_eq!(report.score, 2);
        assert_eq!(report.max_score, 3);
        assert_eq!(report.checks.len(), 3);
    }

    #[test]
    fn test_rating_thresholds() {
        let passing = |n: usize| {
            (0..n)
                .map(|i| CheckResult::passing(&format!("c{}", i), "check", Severity::Low))
                .collect::<Vec<_>>()
        };
        let failing = |n: usize| {
            (0..n)
                .map(|i| CheckResult::failing(&format!("f{}", i), "check", Severity::Low))
                .collect::<Vec<_>>()
        };

        // 12/15 = 80%
        let mut checks = passing(12);
        checks.extend(failing(3));
        assert_eq!(Report::tally(checks).rating(), ScoreRating::Strong);

        // 8/15 ≈ 53%
        let mut checks = passing(8);
        checks.extend(failing(7));
        assert_eq!(Report::tally(checks).rating(), ScoreRating::Moderate);

        // 7/15 ≈ 47%
        let mut checks = passing(7);
        checks.extend(failing(8));
        assert_eq!(Report::tally(checks).rating(), ScoreRating::Weak);
    }

    #[test]
    fn test_empty_report_percentage() {
        let report = Report::tally(Vec::new());
        assert_eq!(report.percentage(), 0.0);
    }

    #[test]
    fn test_json_shape_matches_page_contract() {
        let report = Report::tally(vec![CheckResult::passing(
            "https",
            "HTTPS Connection",
            Severity::Critical,
        )
        .message("Your connection is encrypted with HTTPS")]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 1);
        assert_eq!(json["maxScore"], 1);

        let row = &json["checks"][0];
        assert_eq!(row["id"], "https");
        assert_eq!(row["passed"], true);
        assert_eq!(row["severity"], "critical");
        assert_eq!(row["icon"], "✅");
        assert_eq!(row["learnMore"], "#download");
        assert!(row["whyMatters"].is_string());
    }

    #[test]
    fn test_icon_glyphs() {
        assert_eq!(Icon::Pass.as_str(), "✅");
        assert_eq!(Icon::Warn.as_str(), "⚠️");
        assert_eq!(Icon::Fail.as_str(), "❌");
        assert_eq!(Icon::Info.as_str(), "ℹ️");
    }
}
