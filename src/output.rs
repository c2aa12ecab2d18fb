//! 端末出力
//!
//! 共通ライブラリの表示モデル（ResultsView / InsightPanel）を端末向けに整形する。

use indicatif::{ProgressBar, ProgressStyle};
use jewel_search_common::{InsightPanel, ResultCard, ResultsView, ScoreTier};
use std::time::Duration;

/// 通信中スピナー
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 結果エリアを文字列にする
pub fn format_results(view: &ResultsView) -> String {
    match view {
        ResultsView::Empty { headline, hint } => format!("{}\n{}", headline, hint.to_uppercase()),
        ResultsView::Cards(cards) => cards
            .iter()
            .enumerate()
            .map(|(i, card)| format_card(i + 1, card))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn format_card(rank: usize, card: &ResultCard) -> String {
    format!(
        "{:>2}. [{} {}] {}\n    {} / {} / {}\n    {}",
        rank,
        tier_mark(card.tier),
        card.badge_label,
        card.caption,
        card.category,
        card.material,
        card.style,
        card.image_src,
    )
}

fn tier_mark(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::High => "★★★",
        ScoreTier::Medium => "★★☆",
        ScoreTier::Low => "★☆☆",
    }
}

/// AI解析パネルを文字列にする（非表示なら `None`）
pub fn format_insight(panel: &InsightPanel) -> Option<String> {
    if !panel.visible() {
        return None;
    }
    Some(format!(
        "OCR: {}\nAnalysis: {}",
        panel.ocr_text(),
        panel.analysis()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_search_common::{build_results_view, ClientConfig, SearchResult};

    #[test]
    fn test_format_empty() {
        let text = format_results(&ResultsView::empty());
        assert!(text.starts_with("The collection does not currently contain a match"));
        assert!(text.contains("TRY ADJUSTING YOUR DESCRIPTION"));
    }

    #[test]
    fn test_format_cards_in_order() {
        let results = vec![
            SearchResult {
                image_name: "r1.jpg".into(),
                caption: "Gold Ring".into(),
                category: "Ring".into(),
                material: "Gold".into(),
                style: "Classic".into(),
                score: 0.83,
            },
            SearchResult {
                image_name: "e2.jpg".into(),
                caption: "Pearl Earrings".into(),
                score: 0.42,
                ..Default::default()
            },
        ];
        let view = build_results_view(Some(results.as_slice()), &ClientConfig::default());
        let text = format_results(&view);

        let first = text.find("Gold Ring").unwrap();
        let second = text.find("Pearl Earrings").unwrap();
        assert!(first < second);
        assert!(text.contains("[★★★ 83% Match]"));
        assert!(text.contains("[★☆☆ 42% Match]"));
        assert!(text.contains("Ring / Gold / Classic"));
    }

    #[test]
    fn test_format_hidden_insight() {
        assert!(format_insight(&InsightPanel::default()).is_none());
    }
}
