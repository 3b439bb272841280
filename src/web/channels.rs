//! Browser-backed notification channels.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Headers, NotificationOptions, NotificationPermission, Request, RequestInit, RequestMode, window,
};

use crate::notify::{Channel, Notification, NotifyError, Permission, PermissionStep, Route};

pub(crate) fn js_error_text(v: &JsValue) -> String {
    v.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| v.as_string())
        .unwrap_or_else(|| format!("{v:?}"))
}

/// POSTs the JSON payload to a configured URL (`no-cors`, so the response is
/// opaque and only transport failures are visible).
pub(crate) struct EndpointChannel {
    pub url: Option<String>,
}

impl EndpointChannel {
    async fn post(url: &str, json: &str) -> Result<(), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::NoCors);
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(json));
        let req = Request::new_with_str_and_init(url, &opts)?;
        JsFuture::from(win.fetch_with_request(&req)).await?;
        Ok(())
    }
}

impl Channel for EndpointChannel {
    fn route(&self) -> Route {
        Route::Endpoint
    }

    async fn deliver(&self, note: &Notification) -> Result<(), NotifyError> {
        let url = self.url.as_deref().ok_or(NotifyError::NotConfigured)?;
        let json = note.to_json()?;
        Self::post(url, &json)
            .await
            .map_err(|e| NotifyError::Network(js_error_text(&e)))
    }
}

/// Desktop notification through the Notification API, asking for permission
/// once if the user has not decided yet.
pub(crate) struct BrowserChannel {
    pub icon: String,
}

impl BrowserChannel {
    fn supported() -> bool {
        window()
            .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("Notification")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn permission() -> Permission {
        match web_sys::Notification::permission() {
            NotificationPermission::Granted => Permission::Granted,
            NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        }
    }

    async fn ask() -> Result<Permission, NotifyError> {
        let promise = web_sys::Notification::request_permission()
            .map_err(|e| NotifyError::Browser(js_error_text(&e)))?;
        let answer = JsFuture::from(promise)
            .await
            .map_err(|e| NotifyError::Browser(js_error_text(&e)))?;
        Ok(match answer.as_string().as_deref() {
            Some("granted") => Permission::Granted,
            Some("denied") => Permission::Denied,
            _ => Permission::Default,
        })
    }

    fn show(&self, note: &Notification) -> Result<(), NotifyError> {
        let opts = NotificationOptions::new();
        opts.set_body(&note.body);
        opts.set_icon(&self.icon);
        web_sys::Notification::new_with_options(&note.title, &opts)
            .map(|_| ())
            .map_err(|e| NotifyError::Browser(js_error_text(&e)))
    }
}

impl Channel for BrowserChannel {
    fn route(&self) -> Route {
        Route::Browser
    }

    async fn deliver(&self, note: &Notification) -> Result<(), NotifyError> {
        if !Self::supported() {
            return Err(NotifyError::Unsupported);
        }
        match Self::permission().next_step() {
            PermissionStep::Show => self.show(note),
            PermissionStep::GiveUp => Err(NotifyError::PermissionDenied),
            PermissionStep::Ask => match Self::ask().await?.next_step() {
                PermissionStep::Show => self.show(note),
                _ => Err(NotifyError::PermissionDenied),
            },
        }
    }
}
