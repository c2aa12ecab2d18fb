//! メインアプリケーションコンポーネント

use leptos::html;
use leptos::reactive::owner::LocalStorage;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::File;
use jewel_search_common::config::DEFAULT_API_BASE;
use jewel_search_common::{
    dispatch, parse_top_k, ClientConfig, Mode, PendingSearch, SearchBackend, Session, Settlement,
};
use crate::api::HttpBackend;
use crate::components::{
    ai_insight::AiInsight,
    header::Header,
    loader::Loader,
    results_grid::ResultsGrid,
    search_options::SearchOptions,
    tab_bar::TabBar,
    text_panel::TextPanel,
    upload_area::UploadArea,
};

/// アプリケーションの状態（単一のセッションオブジェクト）
pub type SessionSignal = RwSignal<Session<File>, LocalStorage>;

/// ビルド時に埋め込むAPIベースURL
fn client_config() -> ClientConfig {
    ClientConfig::default().with_api_base(option_env!("JEWEL_SEARCH_API_BASE").unwrap_or(DEFAULT_API_BASE))
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let config = client_config();
    let default_top_k = config.default_top_k;
    let backend = StoredValue::new(HttpBackend::new(config.clone()));
    let session: SessionSignal = RwSignal::new_local(Session::new(config));
    let results_count = NodeRef::<html::Input>::new();

    // スリープ中のバックエンドを起こしておく
    {
        let backend = backend.get_value();
        spawn_local(async move {
            match backend.ping().await {
                Ok(()) => log::info!("backend is awake"),
                Err(e) => log::warn!("backend ping failed: {}", e),
            }
        });
    }

    // 取得件数は検索のたびに入力欄から読む
    let read_top_k = move || {
        let raw = results_count
            .get_untracked()
            .map(|input| input.value())
            .unwrap_or_default();
        parse_top_k(&raw, default_top_k)
    };

    let on_text_search = move |query: String| {
        let top_k = read_top_k();
        let pending = session
            .try_update(|s| s.begin_text_search(&query, top_k))
            .flatten();
        if let Some(pending) = pending {
            run_search(session, backend.get_value(), pending);
        }
    };

    let on_image_search = move |_: ()| {
        let top_k = read_top_k();
        let pending = session.try_update(|s| s.begin_image_search(top_k)).flatten();
        if let Some(pending) = pending {
            run_search(session, backend.get_value(), pending);
        }
    };

    view! {
        <div class="container">
            <Header />

            <TabBar session=session />

            <div
                id=Mode::Text.panel_id()
                class="panel"
                class:active=move || session.with(|s| s.ui().is_active(Mode::Text))
            >
                <TextPanel session=session on_search=on_text_search />
            </div>

            <div
                id=Mode::Image.panel_id()
                class="panel"
                class:active=move || session.with(|s| s.ui().is_active(Mode::Image))
            >
                <UploadArea session=session on_analyze=on_image_search />
            </div>

            <SearchOptions results_count=results_count default_top_k=default_top_k.get() />

            <Loader session=session />

            <AiInsight session=session />

            <ResultsGrid session=session />
        </div>
    }
}

/// 送信して応答をセッションに反映する。失敗はアラートで知らせる
fn run_search(session: SessionSignal, backend: HttpBackend, pending: PendingSearch<File>) {
    spawn_local(async move {
        let outcome = dispatch(&backend, &pending.request).await;
        let settlement = session.try_update(|s| s.settle(pending.ticket, outcome));

        match settlement {
            Some(Settlement::Failed { alert, error }) => {
                log::error!("search failed: {}", error);
                gloo::dialogs::alert(alert);
            }
            Some(Settlement::Applied { result_count }) => {
                log::debug!("rendered {} results", result_count);
            }
            Some(Settlement::Stale) | None => {}
        }
    });
}
