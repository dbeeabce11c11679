//! `/api/plant-identify` プロキシ
//!
//! サーバー側で保持するAPIキーを付けて上流APIへ転送し、
//! ステータスとボディをそのまま返す。

mod request;
mod upstream;

pub use request::{UpstreamCall, UpstreamPayload, IMAGE_REQUIRED};
pub use upstream::{PlantIdUpstream, Upstream, UpstreamReply};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::error::SoilSearchError;
use crate::server::AppState;

const FALLBACK_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub async fn plant_identify(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(json!({ "error": "Method Not Allowed" })),
        )
            .into_response();
    }

    let Some(api_key) = state.api_key.as_ref() else {
        tracing::error!("PLANT_ID_API_KEY is not set");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &SoilSearchError::MissingApiKey.to_string(),
        );
    };

    if !is_json(&headers) {
        return error_response(StatusCode::BAD_REQUEST, "Expected application/json body");
    }

    let Ok(body) = serde_json::from_slice::<Value>(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
    };

    let call = match UpstreamCall::from_body(&body) {
        Ok(call) => call,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.upstream.identify(api_key.expose_secret(), &call).await {
        Ok(reply) => relay(reply),
        Err(e) => {
            tracing::error!(error = %e, "proxy request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Proxy request failed")
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

/// 上流のステータスを維持して返す
///
/// JSONと宣言されていてパースできる場合はJSON、それ以外は生テキスト
fn relay(reply: UpstreamReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = reply.content_type.unwrap_or_default();

    if content_type.contains("application/json") {
        if let Ok(json) = serde_json::from_str::<Value>(&reply.body) {
            return (status, Json(json)).into_response();
        }
    }

    let content_type = if content_type.is_empty() {
        FALLBACK_CONTENT_TYPE.to_string()
    } else {
        content_type
    };
    (status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
