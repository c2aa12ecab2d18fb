//! 検索オプション（取得件数）

use leptos::html;
use leptos::prelude::*;

/// 取得件数の入力欄。値は検索実行時に `results_count` から読む
#[component]
pub fn SearchOptions(results_count: NodeRef<html::Input>, default_top_k: u32) -> impl IntoView {
    view! {
        <div class="search-options">
            <label for="results-count">"Results"</label>
            <input
                type="number"
                id="results-count"
                min="1"
                max="50"
                value=default_top_k.to_string()
                node_ref=results_count
            />
        </div>
    }
}
