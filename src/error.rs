//! Error types for the privacy check engine
//!
//! Probes never surface errors to the caller: every fallible probe runs
//! inside a failure boundary that substitutes the probe's fallback row.
//! The taxonomy exists so a probe can tell an absent capability apart
//! from a transient failure and pick the right fallback wording.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckError>;

/// Main error type for capability lookups and probe internals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The API does not exist in this environment (blocked or never shipped)
    #[error("Capability not supported: {0}")]
    Unsupported(String),

    /// The Permissions API itself failed to answer a query
    #[error("Permission query failed: {0}")]
    Permission(String),

    /// Transport failure or non-OK status from an external endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// A response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Any other browser API failure, stringified at the JS boundary
    #[error("Browser API error: {0}")]
    Api(String),
}

impl CheckError {
    /// Whether the capability simply does not exist here
    ///
    /// Absent capabilities mean the browser blocks the feature outright,
    /// which several probes score as a pass rather than a failed check.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CheckError::Unsupported(_))
    }

    /// Whether retrying against another endpoint could help
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckError::Network(_) | CheckError::Parse(_))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<CheckError> for wasm_bindgen::JsValue {
    fn from(err: CheckError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_classification() {
        assert!(CheckError::Unsupported("RTCPeerConnection".into()).is_unsupported());

        assert!(!CheckError::Network("fetch failed".into()).is_unsupported());
        assert!(!CheckError::Api("dom exception".into()).is_unsupported());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(CheckError::Network("HTTP 503".into()).is_retryable());
        assert!(CheckError::Parse("missing ip field".into()).is_retryable());

        assert!(!CheckError::Unsupported("permissions".into()).is_retryable());
        assert!(!CheckError::Permission("query rejected".into()).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = CheckError::Network("HTTP 429 from https://ipapi.co/json/".into());
        assert_eq!(
            err.to_string(),
            "Network error: HTTP 429 from https://ipapi.co/json/"
        );
    }
}
