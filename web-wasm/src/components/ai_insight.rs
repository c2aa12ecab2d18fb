//! AI解析パネル（画像検索のときだけ表示）

use leptos::prelude::*;
use crate::app::SessionSignal;

#[component]
pub fn AiInsight(session: SessionSignal) -> impl IntoView {
    view! {
        <div
            id="ai-insight"
            class="ai-insight"
            class:hidden=move || !session.with(|s| s.insight().visible())
        >
            <h4>"AI Insight"</h4>
            <p>
                <strong>"Detected text: "</strong>
                <span id="ocr-result">{move || session.with(|s| s.insight().ocr_text().to_string())}</span>
            </p>
            <p>
                <strong>"Visual analysis: "</strong>
                <span id="vision-result">{move || session.with(|s| s.insight().analysis().to_string())}</span>
            </p>
        </div>
    }
}
