use crate::error::{Result, SoilSearchError};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_UPSTREAM_URL: &str = "https://plant.id/api/v3/identification";

pub const API_KEY_ENV: &str = "PLANT_ID_API_KEY";

/// 設定ファイル（~/.config/soil-search/config.json）の内容
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub root: PathBuf,
    pub upstream_url: String,
    pub timeout_seconds: u64,

    /// 環境変数からのみ読む。ファイルには保存しない
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            root: PathBuf::from("site"),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順に読み込む
    pub fn load() -> Result<Self> {
        // .envが無いのは正常
        dotenvy::dotenv().ok();

        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SoilSearchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("soil-search").join("config.json"))
    }

    /// 環境変数で上書き
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| SoilSearchError::Config(format!("PORTが不正です: {}", port)))?;
        }
        if let Some(root) = var("SOIL_SEARCH_ROOT") {
            self.root = PathBuf::from(root);
        }
        if let Some(url) = var("PLANT_ID_UPSTREAM_URL") {
            self.upstream_url = url;
        }
        self.api_key = var(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
