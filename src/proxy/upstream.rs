//! 上流の植物判定API（Plant.id v3）呼び出し

use std::time::Duration;

use async_trait::async_trait;

use super::request::UpstreamCall;
use crate::error::Result;

/// 上流レスポンス（ステータス・Content-Type・生ボディ）
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

#[async_trait]
pub trait Upstream: Send + Sync {
    async fn identify(&self, api_key: &str, call: &UpstreamCall) -> Result<UpstreamReply>;
}

pub struct PlantIdUpstream {
    client: reqwest::Client,
    endpoint: String,
}

impl PlantIdUpstream {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Upstream for PlantIdUpstream {
    async fn identify(&self, api_key: &str, call: &UpstreamCall) -> Result<UpstreamReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("details", call.details.as_str()), ("language", call.language.as_str())])
            .header("Api-Key", api_key)
            .json(&call.payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(status, content_type = ?content_type, bytes = body.len(), "upstream replied");

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}
