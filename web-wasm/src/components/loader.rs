//! 通信中インジケータ

use leptos::prelude::*;
use crate::app::SessionSignal;

#[component]
pub fn Loader(session: SessionSignal) -> impl IntoView {
    view! {
        <Show when=move || session.with(|s| s.ui().busy())>
            <div id="loader" class="loader">
                <div class="spinner" />
                <p id="loading-text">{move || session.with(|s| s.ui().busy_message().to_string())}</p>
            </div>
        </Show>
    }
}
