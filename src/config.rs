use crate::error::{JewelSearchError, Result};
use jewel_search_common::ClientConfig;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// APIベースURLを上書きする環境変数
pub const API_BASE_ENV: &str = "JEWEL_SEARCH_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub default_top_k: u32,
    pub timeout_seconds: u64,

    /// コマンドライン指定（保存しない）
    #[serde(skip)]
    pub api_base_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            api_base: client.api_base,
            default_top_k: client.default_top_k.get(),
            timeout_seconds: client.request_timeout_ms / 1000,
            api_base_override: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| JewelSearchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("jewel-search").join("config.json"))
    }

    /// APIベースURL（コマンドライン > 環境変数 > 設定ファイル）
    pub fn api_base(&self) -> String {
        if let Some(base) = &self.api_base_override {
            return base.clone();
        }
        match std::env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => base,
            _ => self.api_base.clone(),
        }
    }

    pub fn set_api_base(&mut self, base: String) -> Result<()> {
        self.api_base = validate_api_base(base)?;
        Ok(())
    }

    pub fn override_api_base(&mut self, base: String) -> Result<()> {
        self.api_base_override = Some(validate_api_base(base)?);
        Ok(())
    }

    pub fn set_default_top_k(&mut self, top_k: u32) -> Result<()> {
        if top_k == 0 {
            return Err(JewelSearchError::Config("top_k は1以上を指定してください".into()));
        }
        self.default_top_k = top_k;
        Ok(())
    }

    /// 共通ライブラリ用の設定に変換する
    ///
    /// 端末には画像を表示できないため、結果画像はAPIサーバ上の完全URLで出す。
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let api_base = self.api_base();
        ClientConfig {
            images_root: format!("{}{}", api_base.trim_end_matches('/'), defaults.images_root),
            api_base,
            request_timeout_ms: self.timeout_seconds.max(1) * 1000,
            default_top_k: NonZeroU32::new(self.default_top_k).unwrap_or(defaults.default_top_k),
            ..defaults
        }
    }
}

fn validate_api_base(base: String) -> Result<String> {
    let base = base.trim().trim_end_matches('/').to_string();
    if base.starts_with("http://") || base.starts_with("https://") {
        Ok(base)
    } else {
        Err(JewelSearchError::Config(format!("URLが不正です: {}", base)))
    }
}
