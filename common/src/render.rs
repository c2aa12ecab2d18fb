//! 検索結果の表示モデル
//!
//! 結果リストからカード記述子を計算する純粋関数群。
//! DOMへの適用はブラウザ側（web-wasm）・端末出力はCLI側で行う。

use crate::config::ClientConfig;
use crate::types::{AnalysisInsight, SearchResult};

pub const EMPTY_HEADLINE: &str = "The collection does not currently contain a match for your request.";
pub const EMPTY_HINT: &str = "Try adjusting your description";

/// スコア帯
///
/// 下限を含む: 80% 以上が High、60% 以上が Medium、それ未満が Low。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 80 {
            ScoreTier::High
        } else if percent >= 60 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    /// バッジ色
    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::High => "#d4af37",
            ScoreTier::Medium => "#c0c0c0",
            ScoreTier::Low => "#8c7853",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreTier::High => "tier-high",
            ScoreTier::Medium => "tier-medium",
            ScoreTier::Low => "tier-low",
        }
    }
}

/// 類似度を表示用パーセントに変換する
///
/// 範囲外のスコアは意図的に 0〜1 へクランプしてから丸める（非有限値は 0%）。
pub fn score_percent(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// 結果カード1枚分の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub score_percent: u32,
    pub badge_label: String,
    pub tier: ScoreTier,
    pub image_src: String,
    /// 画像読込失敗時に差し替える画像
    pub fallback_src: String,
    pub alt: String,
    pub caption: String,
    pub category: String,
    pub material: String,
    pub style: String,
}

impl ResultCard {
    pub fn from_result(result: &SearchResult, config: &ClientConfig) -> Self {
        let percent = score_percent(result.score);
        Self {
            score_percent: percent,
            badge_label: format!("{}% Match", percent),
            tier: ScoreTier::from_percent(percent),
            image_src: config.image_src(&result.image_name),
            fallback_src: config.placeholder_image.clone(),
            alt: result.caption.clone(),
            caption: result.caption.clone(),
            category: result.category.clone(),
            material: result.material.clone(),
            style: result.style.clone(),
        }
    }
}

/// 結果エリアの表示内容
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// 該当なし（カード0枚とは区別する）
    Empty { headline: String, hint: String },
    Cards(Vec<ResultCard>),
}

impl ResultsView {
    pub fn empty() -> Self {
        ResultsView::Empty {
            headline: EMPTY_HEADLINE.to_string(),
            hint: EMPTY_HINT.to_string(),
        }
    }

    pub fn cards(&self) -> &[ResultCard] {
        match self {
            ResultsView::Cards(cards) => cards,
            ResultsView::Empty { .. } => &[],
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self, ResultsView::Empty { .. })
    }
}

/// 結果リストから表示内容を作る
///
/// 毎回全体を作り直すので、同じ入力なら同じ出力になる（追記しない）。
/// 並び順はバックエンドの順位をそのまま使う。
pub fn build_results_view(results: Option<&[SearchResult]>, config: &ClientConfig) -> ResultsView {
    match results {
        Some(results) if !results.is_empty() => ResultsView::Cards(
            results
                .iter()
                .map(|r| ResultCard::from_result(r, config))
                .collect(),
        ),
        _ => ResultsView::empty(),
    }
}

/// AI解析パネル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightPanel {
    visible: bool,
    ocr_text: String,
    analysis: String,
}

impl InsightPanel {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn ocr_text(&self) -> &str {
        &self.ocr_text
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn show(&mut self, insight: &AnalysisInsight) {
        self.ocr_text = insight.ocr_display().to_string();
        self.analysis = insight.analysis.clone();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
