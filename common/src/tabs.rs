//! 検索モードとUI状態
//!
//! `UiState` の書き込みはタブ切替（このモジュール）と検索ディスパッチャだけが行う。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 検索モード（テキスト検索 / 画像検索）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Text,
    Image,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Text, Mode::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Image => "image",
        }
    }

    /// タブボタンのラベル
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Text => "Describe",
            Mode::Image => "Upload Image",
        }
    }

    /// 通信中に表示するメッセージ
    pub fn busy_message(&self) -> &'static str {
        match self {
            Mode::Text => "Consulting our collection...",
            Mode::Image => "Synthesizing visual and textual data...",
        }
    }

    /// 失敗時のアラートメッセージ
    pub fn failure_alert(&self) -> &'static str {
        match self {
            Mode::Text => "Connectivity issue. Please ensure the vault is accessible (backend running).",
            Mode::Image => "Neural synthesis failed. Please try another image.",
        }
    }

    /// パネル要素のID
    pub fn panel_id(&self) -> String {
        format!("{}-panel", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Mode::Text),
            "image" => Ok(Mode::Image),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// UI全体の状態
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    active_mode: Option<Mode>,
    busy: bool,
    busy_message: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_mode: Some(Mode::Text),
            busy: false,
            busy_message: String::new(),
        }
    }
}

impl UiState {
    pub fn active_mode(&self) -> Option<Mode> {
        self.active_mode
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.active_mode == Some(mode)
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn busy_message(&self) -> &str {
        &self.busy_message
    }

    /// タブを切り替える
    ///
    /// 全ボタン・全パネルを非アクティブにしてから、`mode` に対応するものだけを
    /// アクティブにする。未知のモード名では何もアクティブにならない。
    pub fn switch_tab(&mut self, mode: &str) {
        self.active_mode = None;
        match mode.parse::<Mode>() {
            Ok(mode) => self.active_mode = Some(mode),
            Err(e) => log::debug!("switch_tab: {}", e),
        }
    }

    pub(crate) fn set_busy(&mut self, message: &str) {
        self.busy = true;
        self.busy_message = message.to_string();
    }

    pub(crate) fn clear_busy(&mut self) {
        self.busy = false;
    }
}
