//! Fetch-based HTTP GET for the IP lookup

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::{js_err, window};
use crate::capability::HttpClient;
use crate::error::{CheckError, Result};

pub struct WasmHttpClient;

impl WasmHttpClient {
    pub fn new() -> Self {
        WasmHttpClient
    }
}

#[async_trait(?Send)]
impl HttpClient for WasmHttpClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        let window = window()?;

        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| CheckError::Network(format!("fetch {} failed: {:?}", url, e)))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| CheckError::Api("fetch resolved to a non-Response value".into()))?;

        if !response.ok() {
            return Err(CheckError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(|e| CheckError::Network(format!("reading body from {} failed: {:?}", url, e)))?;
        body.as_string()
            .ok_or_else(|| CheckError::Parse("response body was not text".into()))
    }
}
