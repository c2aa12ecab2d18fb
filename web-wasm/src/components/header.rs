//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Jewel Search"</h1>
            <p class="subtitle">"Describe a piece or show us one. We will find its closest matches in the collection."</p>
        </header>
    }
}
