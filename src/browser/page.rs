//! Page environment read off `window`, `document` and `navigator`

use wasm_bindgen::{JsCast, JsValue};

use super::{document, js_err, window};
use crate::capability::PageEnvironment;
use crate::error::Result;

pub struct WasmPage;

impl WasmPage {
    pub fn new() -> Self {
        WasmPage
    }
}

impl PageEnvironment for WasmPage {
    fn scheme(&self) -> String {
        // location.protocol cannot throw on a real page; an empty scheme
        // just reads as "not https".
        window()
            .and_then(|w| w.location().protocol().map_err(js_err))
            .unwrap_or_default()
    }

    fn is_secure_context(&self) -> bool {
        window().map(|w| w.is_secure_context()).unwrap_or(false)
    }

    fn referrer_policy(&self) -> Option<String> {
        let meta = document()
            .ok()?
            .query_selector("meta[name=\"referrer\"]")
            .ok()??;
        meta.get_attribute("content")
    }

    fn has_csp_meta(&self) -> bool {
        document()
            .ok()
            .and_then(|doc| {
                doc.query_selector("meta[http-equiv=\"Content-Security-Policy\"]")
                    .ok()
            })
            .flatten()
            .is_some()
    }

    fn resource_urls(&self) -> Vec<String> {
        let Ok(doc) = document() else {
            return Vec::new();
        };

        let mut urls = Vec::new();
        // Property reads (src/href), not attributes: the browser resolves
        // them to absolute URLs, which is what the scheme test needs.
        collect::<web_sys::HtmlScriptElement>(&doc, "script[src]", &mut urls, |el| el.src());
        collect::<web_sys::HtmlLinkElement>(&doc, "link[href]", &mut urls, |el| el.href());
        collect::<web_sys::HtmlImageElement>(&doc, "img[src]", &mut urls, |el| el.src());
        urls
    }

    fn do_not_track(&self) -> bool {
        let Ok(window) = window() else {
            return false;
        };
        let navigator = window.navigator();
        // navigator.doNotTrack, window.doNotTrack and the legacy
        // navigator.msDoNotTrack all spell the same opt-out.
        flag_is_one(navigator.as_ref(), "doNotTrack")
            || flag_is_one(window.as_ref(), "doNotTrack")
            || flag_is_one(navigator.as_ref(), "msDoNotTrack")
    }

    fn user_agent(&self) -> Result<String> {
        window()?.navigator().user_agent().map_err(js_err)
    }

    fn cookies_enabled(&self) -> Result<bool> {
        Ok(window()?.navigator().cookie_enabled())
    }
}

fn collect<T: JsCast>(
    doc: &web_sys::Document,
    selector: &str,
    urls: &mut Vec<String>,
    url_of: impl Fn(&T) -> String,
) {
    let Ok(nodes) = doc.query_selector_all(selector) else {
        return;
    };
    for index in 0..nodes.length() {
        if let Some(node) = nodes.item(index) {
            if let Some(element) = node.dyn_ref::<T>() {
                let url = url_of(element);
                if !url.is_empty() {
                    urls.push(url);
                }
            }
        }
    }
}

fn flag_is_one(target: &JsValue, property: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(property))
        .ok()
        .and_then(|value| value.as_string())
        .map(|value| value == "1")
        .unwrap_or(false)
}
