//! ブラウザからのリクエストボディ → 上流API呼び出しパラメータ
//!
//! ボディは外部入力なので型付きデシリアライズではなく `Value` から寛容に読む。

use serde::Serialize;
use serde_json::Value;
use soil_search_common::identify::{DEFAULT_DETAILS, DEFAULT_LANGUAGE};
use soil_search_common::strip_data_url_prefix;

pub const IMAGE_REQUIRED: &str = "imageBase64 is required";

/// 上流APIへのボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub images: Vec<String>,
    pub similar_images: bool,
}

/// 上流API呼び出しパラメータ（details/languageはクエリ）
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCall {
    pub details: String,
    pub language: String,
    pub payload: UpstreamPayload,
}

impl UpstreamCall {
    pub fn from_body(body: &Value) -> Result<Self, &'static str> {
        let image = body
            .get("imageBase64")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(IMAGE_REQUIRED)?;

        let language = body
            .get("language")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        let similar_images = body.get("similar_images").map(truthy).unwrap_or(true);

        Ok(Self {
            details: query_details(body.get("details")),
            language: language.to_string(),
            payload: UpstreamPayload {
                images: vec![strip_data_url_prefix(image).to_string()],
                similar_images,
            },
        })
    }
}

/// 配列はカンマ結合、空でない文字列はtrim、それ以外は既定値
fn query_details(details: Option<&Value>) -> String {
    match details {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_DETAILS.join(","),
    }
}

// JSの Boolean(x) と同じ判定
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
