use thiserror::Error;

#[derive(Error, Debug)]
pub enum JewelSearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("検索クエリが空です")]
    EmptyQuery,

    #[error("{alert} ({source})")]
    SearchFailed {
        alert: String,
        #[source]
        source: jewel_search_common::Error,
    },

    #[error("API呼び出しエラー: {0}")]
    Api(#[from] jewel_search_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JewelSearchError>;
