//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 検索API呼び出しの失敗はすべてここに集約される。
/// 入力不足（空クエリ・未選択ファイル）はエラーではなく `None` で表す。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
