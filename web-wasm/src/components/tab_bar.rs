//! タブ切替コンポーネント

use leptos::prelude::*;
use jewel_search_common::Mode;
use crate::app::SessionSignal;

#[component]
pub fn TabBar(session: SessionSignal) -> impl IntoView {
    view! {
        <div class="tabs">
            {Mode::ALL
                .into_iter()
                .map(|mode| {
                    view! {
                        <button
                            class="tab-btn"
                            class:active=move || session.with(|s| s.ui().is_active(mode))
                            on:click=move |_| session.update(|s| s.switch_tab(mode.as_str()))
                        >
                            {mode.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
