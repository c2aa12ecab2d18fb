//! 検索APIの型定義
//!
//! バックエンドとの間でやり取りされる型:
//! - SearchResult: ランク付きの検索ヒット1件
//! - SearchResponse: `POST /search` のレスポンス
//! - AnalyzeResponse: `POST /analyze` のレスポンス（OCR + 画像解析 + 検索結果）
//! - AnalysisInsight: 画像検索時のみ表示される解析パネルの内容

use serde::{Deserialize, Deserializer, Serialize};

/// OCRテキストが無い場合の表示文字列
pub const OCR_PLACEHOLDER: &str = "Undetected";

/// 検索ヒット
///
/// 並び順はバックエンドが決めたランク順であり、クライアント側で並べ替えない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub image_name: String,
    pub caption: String,
    pub category: String,
    pub material: String,
    pub style: String,

    /// 類似度（名目上 0.0〜1.0）。欠落・null は 0 とみなす
    #[serde(deserialize_with = "null_as_zero")]
    pub score: f64,
}

/// `POST /search` のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,

    /// 例外時にバックエンドが 200 で返すエラーメッセージ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /analyze` のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub ocr_text: Option<String>,

    #[serde(default)]
    pub analysis: String,

    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 画像解析の所見（OCR + ビジョン解析）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInsight {
    pub ocr_text: Option<String>,
    pub analysis: String,
}

impl AnalysisInsight {
    /// 表示用OCRテキスト（空・欠落時はプレースホルダ）
    pub fn ocr_display(&self) -> &str {
        match self.ocr_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => OCR_PLACEHOLDER,
        }
    }
}

impl SearchResponse {
    /// 空でない `error` フィールドを返す
    pub fn backend_error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }
}

impl AnalyzeResponse {
    pub fn backend_error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }

    pub fn insight(&self) -> AnalysisInsight {
        AnalysisInsight {
            ocr_text: self.ocr_text.clone(),
            analysis: self.analysis.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
