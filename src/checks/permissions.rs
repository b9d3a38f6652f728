//! Permission-grant probes: geolocation, notifications, camera, microphone
//!
//! All four share one shape: query the Permissions API, score `denied` and
//! `prompt` as passes, score `granted` as the failure. What differs is the
//! wording, kept per-probe in a copy table.

use crate::capability::{PermissionKind, PermissionState, PermissionsQuery};
use crate::error::Result;
use crate::report::{CheckResult, Severity};

struct PermissionCopy {
    id: &'static str,
    name: &'static str,
    severity: Severity,
    denied: &'static str,
    granted: &'static str,
    prompt: &'static str,
    granted_rec: &'static str,
    default_rec: &'static str,
    why: &'static str,
    unavailable_message: &'static str,
    unavailable_why: &'static str,
}

const GEOLOCATION: PermissionCopy = PermissionCopy {
    id: "geolocation",
    name: "Geolocation Permission",
    severity: Severity::Medium,
    denied: "Geolocation is denied (good for privacy)",
    granted: "Geolocation is GRANTED - sites can track your location",
    prompt: "Geolocation will prompt when needed",
    granted_rec: "Consider revoking geolocation permission in browser settings unless needed.",
    default_rec: "Only grant geolocation permission to trusted sites when necessary.",
    why: "Your precise location is highly sensitive data. Websites can track where you \
          live, work, and travel. Location access should only be granted to navigation \
          apps or services that genuinely need it (maps, weather, delivery). Deny it for \
          everything else.",
    unavailable_message: "Could not check geolocation permission",
    unavailable_why: "Your precise location is highly sensitive data. Websites can track \
          where you live, work, and travel. Always be cautious about granting location \
          access.",
};

const NOTIFICATIONS: PermissionCopy = PermissionCopy {
    id: "notifications",
    name: "Notification Permission",
    severity: Severity::Medium,
    denied: "Notifications are denied (less distraction)",
    granted: "Notifications are GRANTED - sites can send popups",
    prompt: "Notifications will prompt when needed",
    granted_rec: "Consider limiting notification permissions to essential sites only.",
    default_rec: "Only grant notification permission to sites you trust.",
    why: "Notification permissions let websites send you popup messages even when you're \
          not on their site. This can be used for spam, phishing attempts, or constant \
          distractions. Only grant it to essential services like email or messaging apps.",
    unavailable_message: "Could not check notification permission",
    unavailable_why: "Browser notifications can be used for spam and phishing. Be \
          selective about which sites can send you notifications.",
};

const CAMERA: PermissionCopy = PermissionCopy {
    id: "camera",
    name: "Camera Permission",
    severity: Severity::High,
    denied: "Camera is denied (good for privacy)",
    granted: "Camera is GRANTED - sites can access your webcam",
    prompt: "Camera will prompt when needed",
    granted_rec: "SECURITY RISK: Revoke camera permission unless actively using it.",
    default_rec: "Only grant camera permission to video call sites you trust.",
    why: "Webcam access is a major privacy risk. Malicious websites or browser extensions \
          could secretly record you. Only grant camera permission to trusted video call \
          services (Zoom, Teams, Google Meet) and revoke it immediately after use.",
    unavailable_message: "Could not check camera permission",
    unavailable_why: "Webcam access is a major privacy risk. Always be extremely cautious \
          about granting camera permissions to websites.",
};

const MICROPHONE: PermissionCopy = PermissionCopy {
    id: "microphone",
    name: "Microphone Permission",
    severity: Severity::High,
    denied: "Microphone is denied (good for privacy)",
    granted: "Microphone is GRANTED - sites can listen to you",
    prompt: "Microphone will prompt when needed",
    granted_rec: "SECURITY RISK: Revoke microphone permission unless actively using it.",
    default_rec: "Only grant microphone permission to trusted communication apps.",
    why: "Microphone access lets websites listen to everything around you - private \
          conversations, phone calls, confidential meetings. Only grant it to trusted \
          communication apps you're actively using, and revoke immediately after.",
    unavailable_message: "Could not check microphone permission",
    unavailable_why: "Microphone access lets websites listen to everything around you. \
          Always be extremely cautious about granting microphone permissions.",
};

pub async fn geolocation(permissions: &dyn PermissionsQuery) -> Result<CheckResult> {
    probe(permissions, PermissionKind::Geolocation, &GEOLOCATION).await
}

pub async fn notifications(permissions: &dyn PermissionsQuery) -> Result<CheckResult> {
    probe(permissions, PermissionKind::Notifications, &NOTIFICATIONS).await
}

pub async fn camera(permissions: &dyn PermissionsQuery) -> Result<CheckResult> {
    probe(permissions, PermissionKind::Camera, &CAMERA).await
}

pub async fn microphone(permissions: &dyn PermissionsQuery) -> Result<CheckResult> {
    probe(permissions, PermissionKind::Microphone, &MICROPHONE).await
}

pub fn geolocation_unavailable() -> CheckResult {
    unavailable(&GEOLOCATION)
}

pub fn notifications_unavailable() -> CheckResult {
    unavailable(&NOTIFICATIONS)
}

pub fn camera_unavailable() -> CheckResult {
    unavailable(&CAMERA)
}

pub fn microphone_unavailable() -> CheckResult {
    unavailable(&MICROPHONE)
}

async fn probe(
    permissions: &dyn PermissionsQuery,
    kind: PermissionKind,
    copy: &PermissionCopy,
) -> Result<CheckResult> {
    let state = permissions.query(kind).await?;

    let result = match state {
        PermissionState::Denied => {
            CheckResult::passing(copy.id, copy.name, copy.severity).message(copy.denied)
        }
        PermissionState::Granted => {
            CheckResult::failing(copy.id, copy.name, copy.severity).message(copy.granted)
        }
        PermissionState::Prompt => {
            CheckResult::notice(copy.id, copy.name, copy.severity).message(copy.prompt)
        }
    };

    let recommendation = if state == PermissionState::Granted {
        copy.granted_rec
    } else {
        copy.default_rec
    };

    Ok(result.recommendation(recommendation).why_matters(copy.why))
}

fn unavailable(copy: &PermissionCopy) -> CheckResult {
    CheckResult::notice(copy.id, copy.name, copy.severity)
        .message(copy.unavailable_message)
        .recommendation("Browser may not support Permissions API.")
        .why_matters(copy.unavailable_why)
}
