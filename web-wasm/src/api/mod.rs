//! ネットワーク呼び出し（fetch）

mod pages;
mod proxy;

pub use pages::FetchPageLoader;
pub use proxy::ProxyClient;

use soil_search_common::{Error, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, Response};

/// リクエストを送りボディをテキストで返す。2xx以外はエラー
pub(crate) async fn fetch_text(request: &Request) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| Error::Config("window is not available".into()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    if !resp.ok() {
        return Err(Error::status(resp.status(), resp.status_text()));
    }

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| Error::Transport("response body is not text".into()))
}

/// JS例外 → 共通エラー
pub(crate) fn js_error(value: JsValue) -> Error {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Transport(message)
}
