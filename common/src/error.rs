//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// fetch自体が失敗（ネットワーク断など）
    #[error("Network error: {0}")]
    Transport(String),

    /// 2xx以外のステータス
    #[error("API request failed: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// ステータスエラーを生成（ページ取得・プロキシ呼び出し共通）
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Error::Status {
            status,
            status_text: status_text.into(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
