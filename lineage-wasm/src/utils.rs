use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Url, Window};

use crate::constants::PREVIEW_URL_TTL_MS;

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    // '+' is a space in form-encoded query strings
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8()
        .map(|c| c.into_owned())
        .unwrap_or(s)
}

/// Boolean flag set by the host page on `window`, e.g. `window.__INLINE_PREVIEW`.
pub fn window_flag(window: &Window, name: &str) -> Option<bool> {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .ok()?
        .as_bool()
}

/// String value set by the host page on `window`.
pub fn window_string(window: &Window, name: &str) -> Option<String> {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .ok()?
        .as_string()
}

fn blob_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let array = Array::new();
    array.push(&Uint8Array::from(bytes));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &opts)?;
    Url::create_object_url_with_blob(&blob)
}

/// Trigger a download of `bytes` as `filename`.
pub fn save_bytes_as_file(
    document: &Document,
    filename: &str,
    mime: &str,
    bytes: &[u8],
) -> Result<(), JsValue> {
    let url = blob_url(bytes, mime)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// Open `bytes` in a new tab. `Ok(false)` when the browser blocked the popup.
pub fn open_in_new_tab(window: &Window, mime: &str, bytes: &[u8]) -> Result<bool, JsValue> {
    let url = blob_url(bytes, mime)?;
    let opened = window.open_with_url_and_target(&url, "_blank")?.is_some();
    if opened {
        // The new tab needs the URL for a while
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(PREVIEW_URL_TTL_MS).await;
            let _ = Url::revoke_object_url(&url);
        });
    } else {
        Url::revoke_object_url(&url)?;
    }
    Ok(opened)
}

pub fn alert(window: &Window, message: &str) {
    if window.alert_with_message(message).is_err() {
        tracing::warn!(message, "alert unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_decoded() {
        let q = "?paper=a3&q=Tr%E1%BB%8Bnh+B%C3%A1&flag";
        assert_eq!(get_query_param(q, "paper").as_deref(), Some("a3"));
        assert_eq!(get_query_param(q, "q").as_deref(), Some("Trịnh Bá"));
        assert_eq!(get_query_param(q, "flag").as_deref(), Some(""));
        assert_eq!(get_query_param(q, "missing"), None);
    }
}
