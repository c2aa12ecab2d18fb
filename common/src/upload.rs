//! アップロード管理
//!
//! 選択中ファイルとプレビュー表示のライフサイクルを持つ。
//! ファイル本体の型 `B` はプラットフォーム依存（ブラウザでは `web_sys::File`、
//! CLIでは `Vec<u8>`）なので、ここでは中身に触れない。

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// 選択中ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile<B> {
    pub blob: B,
    pub name: String,
    pub mime: String,
    /// デコード完了後に設定される Data URL
    pub data_url: Option<String>,
}

impl<B> SelectedFile<B> {
    pub fn new(blob: B, name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            blob,
            name: name.into(),
            mime: mime.into(),
            data_url: None,
        }
    }
}

/// プレビューのデコード要求を識別する世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket(u64);

/// アップロード欄の表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadView {
    DropZone,
    Preview,
}

/// アップロード管理
#[derive(Debug, Clone)]
pub struct UploadManager<B> {
    selected: Option<SelectedFile<B>>,
    preview_src: Option<String>,
    view: UploadView,
    hover: bool,
    generation: u64,
}

impl<B> Default for UploadManager<B> {
    fn default() -> Self {
        Self {
            selected: None,
            preview_src: None,
            view: UploadView::DropZone,
            hover: false,
            generation: 0,
        }
    }
}

impl<B> UploadManager<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile<B>> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> UploadView {
        self.view
    }

    pub fn hover(&self) -> bool {
        self.hover
    }

    pub fn preview_src(&self) -> Option<&str> {
        self.preview_src.as_deref()
    }

    /// ファイルを選択する（ファイル選択ダイアログ・ドロップ共通）
    ///
    /// 画像以外のMIMEタイプは黙って無視し、既存の選択も残す。
    /// 受理した場合は既存の選択を置き換え、プレビュー用デコードのチケットを返す。
    pub fn select_file(&mut self, file: SelectedFile<B>) -> Option<DecodeTicket> {
        if !is_image_mime(&file.mime) {
            log::debug!("rejected non-image file: {} ({})", file.name, file.mime);
            return None;
        }

        self.generation += 1;
        log::debug!("selected file: {} ({})", file.name, file.mime);
        self.selected = Some(file);
        Some(DecodeTicket(self.generation))
    }

    /// Data URLのデコード完了
    ///
    /// チケットが最新の選択に対応する場合だけプレビューに切り替える。
    /// リセット後や別ファイル選択後に届いた古い結果は捨てる。
    pub fn complete_decode(&mut self, ticket: DecodeTicket, data_url: String) -> bool {
        if ticket.0 != self.generation {
            log::debug!("discarded stale preview decode");
            return false;
        }
        let Some(file) = self.selected.as_mut() else {
            return false;
        };
        if file.data_url.is_some() {
            return false;
        }

        file.data_url = Some(data_url.clone());
        self.preview_src = Some(data_url);
        self.view = UploadView::Preview;
        true
    }

    /// ドラッグ中のホバー表示（選択は変更しない）
    pub fn drag_over(&mut self) {
        self.hover = true;
    }

    pub fn drag_leave(&mut self) {
        self.hover = false;
    }

    /// ドロップ。ホバー表示を解除してから先頭ファイルを選択する
    pub fn drop_file(&mut self, file: Option<SelectedFile<B>>) -> Option<DecodeTicket> {
        self.hover = false;
        file.and_then(|f| self.select_file(f))
    }

    /// 選択を解除してドロップゾーン表示に戻す（何度呼んでもよい）
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.preview_src = None;
        self.view = UploadView::DropZone;
        self.hover = false;
    }
}

/// 画像カテゴリのMIMEタイプか
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// バイト列から Data URL を作る
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
