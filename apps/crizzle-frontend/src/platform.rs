//! Browser implementations of the bootstrapper's host traits.

use crizzle_router::{AssetCache, HostPage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlElement;

/// The document the application is loaded into.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentHost;

impl HostPage for DocumentHost {
    type Element = HtmlElement;

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn report_fatal(&self, message: &str) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let (Some(body), Ok(notice)) = (document.body(), document.create_element("p")) else {
            return;
        };
        notice.set_class_name("crizzle-fatal");
        notice.set_text_content(Some(message));
        let _ = body.append_child(&notice);
    }
}

/// Registers the offline-caching service worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceWorker;

impl AssetCache for ServiceWorker {
    fn register(&self, script_url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        // Absent on insecure origins and in some embedded browsers.
        if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
            log::warn!("service workers are not supported here; assets will not be cached");
            return;
        }

        let registration = navigator.service_worker().register(script_url);
        let script_url = script_url.to_string();
        leptos::task::spawn_local(async move {
            match JsFuture::from(registration).await {
                Ok(_) => log::info!("service worker registered from {}", script_url),
                Err(err) => log::warn!("service worker registration failed: {:?}", err),
            }
        });
    }
}
