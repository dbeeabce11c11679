//! 植物判定プロキシ呼び出し
//!
//! APIキーはサーバー側で付与されるため、ブラウザには置かない

use async_trait::async_trait;
use soil_search_common::{IdentifyClient, IdentifyRequest, Result};
use wasm_bindgen::JsValue;
use web_sys::{Request, RequestInit};

use super::{fetch_text, js_error};

pub const PROXY_ENDPOINT: &str = "/api/plant-identify";

#[derive(Debug, Clone)]
pub struct ProxyClient {
    endpoint: String,
}

impl Default for ProxyClient {
    fn default() -> Self {
        Self {
            endpoint: PROXY_ENDPOINT.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl IdentifyClient for ProxyClient {
    async fn identify(&self, request: &IdentifyRequest) -> Result<String> {
        let body = serde_json::to_string(request)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        fetch_text(&request).await
    }
}
