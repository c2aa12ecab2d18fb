//! クライアント設定

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_IMAGES_ROOT: &str = "/images";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x400?text=Jewellery+Item";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
/// バックエンド側の top_k 既定値と揃える
pub const DEFAULT_TOP_K: NonZeroU32 = match NonZeroU32::new(5) {
    Some(v) => v,
    None => unreachable!(),
};

/// 検索クライアント設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 検索APIのベースURL
    pub api_base: String,
    /// 結果画像のルートパス（ページのオリジン基準）
    pub images_root: String,
    /// 画像読込失敗時の代替画像
    pub placeholder_image: String,
    /// API呼び出しのタイムアウト
    pub request_timeout_ms: u64,
    pub default_top_k: NonZeroU32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            images_root: DEFAULT_IMAGES_ROOT.into(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_top_k: DEFAULT_TOP_K,
        }
    }
}

impl ClientConfig {
    /// APIベースURLを差し替えた設定を作る
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// エンドポイントの完全URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 結果画像のURL
    pub fn image_src(&self, image_name: &str) -> String {
        format!(
            "{}/{}",
            self.images_root.trim_end_matches('/'),
            image_name.trim_start_matches('/')
        )
    }
}

/// 数値入力欄の文字列から top_k を読む
///
/// 数値でない・0以下の入力は `fallback` を返す。
pub fn parse_top_k(raw: &str, fallback: NonZeroU32) -> NonZeroU32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "http://127.0.0.1:8000");
        assert_eq!(config.images_root, "/images");
        assert_eq!(config.default_top_k.get(), 5);
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::default().with_api_base("https://vault.example.com/");
        assert_eq!(config.endpoint("/search"), "https://vault.example.com/search");
        assert_eq!(config.endpoint("analyze"), "https://vault.example.com/analyze");
    }

    #[test]
    fn test_image_src() {
        let config = ClientConfig::default();
        assert_eq!(config.image_src("r1.jpg"), "/images/r1.jpg");
    }

    #[test]
    fn test_parse_top_k() {
        assert_eq!(parse_top_k("12", DEFAULT_TOP_K).get(), 12);
        assert_eq!(parse_top_k(" 3 ", DEFAULT_TOP_K).get(), 3);
        assert_eq!(parse_top_k("0", DEFAULT_TOP_K).get(), 5);
        assert_eq!(parse_top_k("-4", DEFAULT_TOP_K).get(), 5);
        assert_eq!(parse_top_k("abc", DEFAULT_TOP_K).get(), 5);
        assert_eq!(parse_top_k("", DEFAULT_TOP_K).get(), 5);
    }

    #[test]
    fn test_config_partial_json() {
        // 欠落フィールドはデフォルト値
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base": "http://vault:9000", "default_top_k": 8}"#).unwrap();
        assert_eq!(config.api_base, "http://vault:9000");
        assert_eq!(config.default_top_k.get(), 8);
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
