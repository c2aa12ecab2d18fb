//! 画像アップロードエリア
//!
//! クリックでファイル選択、またはドラッグ&ドロップ。画像以外は無視する。
//! プレビュー用の Data URL は FileReader で非同期に読む。

use leptos::ev::{DragEvent, MouseEvent};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};
use jewel_search_common::{SelectedFile, UploadView};
use crate::app::SessionSignal;

#[component]
pub fn UploadArea<F>(session: SessionSignal, on_analyze: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone + Send + Sync,
{
    let file_input = NodeRef::<html::Input>::new();

    let busy = move || session.with(|s| s.ui().busy());
    let is_drop_zone = move || session.with(|s| s.upload().view() == UploadView::DropZone);
    let is_hover = move || session.with(|s| s.upload().hover());
    let preview_src = move || {
        session.with(|s| s.upload().preview_src().unwrap_or_default().to_string())
    };

    let on_click = move |_: MouseEvent| {
        if let Some(input) = file_input.get_untracked() {
            input.click();
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|files| files.get(0));
        accept_file(session, file, false);
    };

    // ブラウザがファイルを開いてしまわないよう既定動作を止める
    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        session.update(|s| s.upload_mut().drag_over());
    };

    let on_dragleave = move |_: DragEvent| {
        session.update(|s| s.upload_mut().drag_leave());
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        accept_file(session, file, true);
    };

    let on_reset = move |_: MouseEvent| {
        session.update(|s| s.reset_upload());
        if let Some(input) = file_input.get_untracked() {
            input.set_value("");
        }
    };

    view! {
        <div class="upload-section">
            <input
                type="file"
                id="file-input"
                accept="image/*"
                class="hidden"
                node_ref=file_input
                on:change=on_change
            />

            <div
                id="drop-zone"
                class="drop-zone"
                class:hidden=move || !is_drop_zone()
                class:dragover=is_hover
                on:click=on_click
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:drop=on_drop
            >
                <div class="upload-icon">"💎"</div>
                <p>"Drop an image of the piece here, or click to browse"</p>
                <p class="text-muted">"JPEG, PNG, WEBP"</p>
            </div>

            <div
                id="preview-container"
                class="preview-container"
                class:hidden=is_drop_zone
            >
                <img id="image-preview" src=preview_src alt="Selected piece" />
                <div class="preview-actions">
                    <button class="btn btn-tertiary" disabled=busy on:click=on_reset>
                        "Choose another"
                    </button>
                    <button
                        class="btn btn-primary"
                        disabled=busy
                        on:click=move |_| on_analyze(())
                    >
                        "Find similar pieces"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// ファイル選択・ドロップ共通の受け付け処理
fn accept_file(session: SessionSignal, file: Option<File>, dropped: bool) {
    let selected = file
        .as_ref()
        .map(|f| SelectedFile::new(f.clone(), f.name(), f.type_()));

    let ticket = session
        .try_update(|s| {
            let upload = s.upload_mut();
            if dropped {
                upload.drop_file(selected)
            } else {
                selected.and_then(|f| upload.select_file(f))
            }
        })
        .flatten();

    if let (Some(ticket), Some(file)) = (ticket, file) {
        read_data_url(&file, move |data_url| {
            session.update(|s| {
                s.upload_mut().complete_decode(ticket, data_url);
            });
        });
    }
}

fn read_data_url<F>(file: &File, on_loaded: F)
where
    F: Fn(String) + 'static,
{
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("FileReader unavailable: {:?}", e);
            return;
        }
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Ok(result) = reader_clone.result() {
            if let Some(data_url) = result.as_string() {
                on_loaded(data_url);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(file) {
        log::warn!("failed to read {}: {:?}", file.name(), e);
    }
}
