use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilSearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Server misconfigured: missing PLANT_ID_API_KEY")]
    MissingApiKey,

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SoilSearchError>;
