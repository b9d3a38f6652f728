//! Permissions API port

use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{js_err, window};
use crate::capability::{PermissionKind, PermissionState, PermissionsQuery};
use crate::error::{CheckError, Result};

pub struct WasmPermissions;

impl WasmPermissions {
    pub fn new() -> Self {
        WasmPermissions
    }
}

#[async_trait(?Send)]
impl PermissionsQuery for WasmPermissions {
    async fn query(&self, kind: PermissionKind) -> Result<PermissionState> {
        let permissions = window()?
            .navigator()
            .permissions()
            .map_err(|_| CheckError::Unsupported("Permissions API".into()))?;

        let descriptor = js_sys::Object::new();
        js_sys::Reflect::set(
            &descriptor,
            &JsValue::from_str("name"),
            &JsValue::from_str(kind.as_str()),
        )
        .map_err(js_err)?;

        let promise = permissions
            .query(&descriptor)
            .map_err(|e| CheckError::Permission(format!("query({}) rejected: {:?}", kind.as_str(), e)))?;
        let status = JsFuture::from(promise)
            .await
            .map_err(|e| CheckError::Permission(format!("query({}) failed: {:?}", kind.as_str(), e)))?;
        let status: web_sys::PermissionStatus = status.unchecked_into();

        Ok(match status.state() {
            web_sys::PermissionState::Granted => PermissionState::Granted,
            web_sys::PermissionState::Denied => PermissionState::Denied,
            _ => PermissionState::Prompt,
        })
    }
}
