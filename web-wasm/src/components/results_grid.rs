//! 検索結果グリッド
//!
//! セッションの表示モデルが変わるたびに中身全体を描き直す（追記しない）。

use leptos::prelude::*;
use jewel_search_common::{ResultCard, ResultsView};
use web_sys::HtmlImageElement;
use crate::app::SessionSignal;

#[component]
pub fn ResultsGrid(session: SessionSignal) -> impl IntoView {
    let results = move || session.with(|s| s.results().cloned());

    view! {
        <div id="results-grid" class="results-grid">
            {move || match results() {
                None => ().into_any(),
                Some(ResultsView::Empty { headline, hint }) => view! {
                    <div class="empty-state">
                        <p class="empty-headline">{headline}</p>
                        <p class="empty-hint">{hint}</p>
                    </div>
                }
                .into_any(),
                Some(ResultsView::Cards(cards)) => cards
                    .into_iter()
                    .map(|card| view! { <MatchCard card=card /> })
                    .collect_view()
                    .into_any(),
            }}
        </div>
    }
}

#[component]
fn MatchCard(card: ResultCard) -> impl IntoView {
    let fallback = card.fallback_src.clone();
    let badge_class = format!("score-badge {}", card.tier.css_class());
    let badge_style = format!("background-color: {}", card.tier.color());

    view! {
        <div class="card">
            <div class="card-image-wrapper">
                <img
                    src=card.image_src
                    alt=card.alt
                    class="card-image"
                    on:error=move |ev| {
                        // 代替画像も読めない場合に無限ループしない
                        let img: HtmlImageElement = event_target(&ev);
                        if img.src() != fallback {
                            img.set_src(&fallback);
                        }
                    }
                />
                <div class=badge_class style=badge_style>
                    {card.badge_label}
                </div>
            </div>
            <div class="card-body">
                <div class="card-category">{card.category}</div>
                <h3 class="card-caption">{card.caption}</h3>
                <div class="card-meta">
                    <span>{card.material}</span>
                    <span>{card.style}</span>
                </div>
            </div>
        </div>
    }
}
