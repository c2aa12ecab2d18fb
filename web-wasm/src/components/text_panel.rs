//! テキスト検索パネル

use leptos::ev::KeyboardEvent;
use leptos::prelude::*;
use crate::app::SessionSignal;

#[component]
pub fn TextPanel<F>(session: SessionSignal, on_search: F) -> impl IntoView
where
    F: Fn(String) + 'static + Clone + Send + Sync,
{
    let (query, set_query) = signal(String::new());
    let busy = move || session.with(|s| s.ui().busy());

    // Enterキーでも検索
    let on_keydown = {
        let on_search = on_search.clone();
        move |ev: KeyboardEvent| {
            if ev.key() == "Enter" && !busy() {
                on_search(query.get_untracked());
            }
        }
    };

    view! {
        <div class="search-box">
            <input
                type="text"
                id="query-input"
                placeholder="e.g. vintage gold ring with an emerald"
                prop:value=move || query.get()
                on:input=move |ev| set_query.set(event_target_value(&ev))
                on:keydown=on_keydown
            />
            <button
                class="btn btn-primary"
                disabled=busy
                on:click=move |_| on_search(query.get_untracked())
            >
                "Search"
            </button>
        </div>
    }
}
