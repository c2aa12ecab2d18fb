//! 検索ディスパッチャ
//!
//! テキスト検索・画像検索のリクエスト生成と、発行済みリクエストの追跡。
//! 各リクエストには単調増加のチケットを振り、最新チケットの応答だけを
//! 画面に反映する（遅れて届いた古い応答で新しい結果を上書きしない）。

use std::num::NonZeroU32;

use crate::error::{Error, Result};
use crate::tabs::{Mode, UiState};
use crate::types::{AnalysisInsight, AnalyzeResponse, SearchResponse, SearchResult};
use crate::upload::SelectedFile;

/// 検索リクエスト
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest<B> {
    Text { query: String, top_k: NonZeroU32 },
    Image { file: SelectedFile<B>, top_k: NonZeroU32 },
}

impl<B> SearchRequest<B> {
    /// テキスト検索リクエスト。空文字列は `None`、それ以外は入力値そのままを送る
    pub fn text(query: &str, top_k: NonZeroU32) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(SearchRequest::Text {
            query: query.to_string(),
            top_k,
        })
    }

    /// 画像検索リクエスト。ファイル未選択なら `None`
    pub fn image(file: Option<&SelectedFile<B>>, top_k: NonZeroU32) -> Option<Self>
    where
        B: Clone,
    {
        file.map(|f| SearchRequest::Image {
            file: f.clone(),
            top_k,
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            SearchRequest::Text { .. } => Mode::Text,
            SearchRequest::Image { .. } => Mode::Image,
        }
    }

    pub fn top_k(&self) -> NonZeroU32 {
        match self {
            SearchRequest::Text { top_k, .. } | SearchRequest::Image { top_k, .. } => *top_k,
        }
    }
}

/// 検索の成功結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Option<Vec<SearchResult>>,
    /// 画像検索のときだけ存在する
    pub insight: Option<AnalysisInsight>,
}

impl TryFrom<SearchResponse> for SearchOutcome {
    type Error = Error;

    fn try_from(response: SearchResponse) -> Result<Self> {
        if let Some(message) = response.backend_error() {
            return Err(Error::Backend(message.to_string()));
        }
        Ok(SearchOutcome {
            results: response.results,
            insight: None,
        })
    }
}

impl TryFrom<AnalyzeResponse> for SearchOutcome {
    type Error = Error;

    fn try_from(response: AnalyzeResponse) -> Result<Self> {
        if let Some(message) = response.backend_error() {
            return Err(Error::Backend(message.to_string()));
        }
        let insight = response.insight();
        Ok(SearchOutcome {
            results: response.results,
            insight: Some(insight),
        })
    }
}

/// 検索バックエンド（HTTP実装はプラットフォームごと）
///
/// 実装側はタイムアウトを必ず設け、期限切れは `Error::Timeout` で返すこと。
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    /// ファイル本体の型
    type Blob;

    /// `POST /search`
    async fn search_text(&self, query: &str, top_k: NonZeroU32) -> Result<SearchResponse>;

    /// `POST /analyze`
    async fn analyze_image(
        &self,
        file: &SelectedFile<Self::Blob>,
        top_k: NonZeroU32,
    ) -> Result<AnalyzeResponse>;

    /// `GET /ping`
    async fn ping(&self) -> Result<()>;
}

/// リクエストを1回だけ送信する
pub async fn dispatch<K>(backend: &K, request: &SearchRequest<K::Blob>) -> Result<SearchOutcome>
where
    K: SearchBackend,
{
    match request {
        SearchRequest::Text { query, top_k } => {
            backend.search_text(query, *top_k).await?.try_into()
        }
        SearchRequest::Image { file, top_k } => {
            backend.analyze_image(file, *top_k).await?.try_into()
        }
    }
}

/// 発行済みリクエストの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    mode: Mode,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// 発行待ちの検索（チケット + リクエスト）
#[derive(Debug, Clone)]
pub struct PendingSearch<B> {
    pub ticket: Ticket,
    pub request: SearchRequest<B>,
}

/// チケット発行とビジー状態の遷移（idle → busy → idle）
#[derive(Debug, Clone, Default)]
pub struct SearchDispatcher {
    issued: u64,
    latest: Option<u64>,
}

impl SearchDispatcher {
    /// 新しいチケットを発行してビジー状態にする
    pub fn issue(&mut self, ui: &mut UiState, mode: Mode) -> Ticket {
        self.issued += 1;
        self.latest = Some(self.issued);
        ui.set_busy(mode.busy_message());
        log::debug!("issued ticket #{} ({})", self.issued, mode.as_str());
        Ticket {
            seq: self.issued,
            mode,
        }
    }

    /// 応答到着。最新チケットなら `true` を返してビジー状態を解除する
    ///
    /// 古いチケットの場合はビジー状態に触れない（新しいリクエストが持っている）。
    pub fn settle(&mut self, ui: &mut UiState, ticket: Ticket) -> bool {
        if self.latest != Some(ticket.seq) {
            log::debug!("discarded stale response for ticket #{}", ticket.seq);
            return false;
        }
        self.latest = None;
        ui.clear_busy();
        log::debug!("settled ticket #{}", ticket.seq);
        true
    }

    pub fn in_flight(&self) -> bool {
        self.latest.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_k(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_text_request_empty_query() {
        assert!(SearchRequest::<()>::text("", top_k(5)).is_none());
    }

    #[test]
    fn test_text_request_keeps_raw_query() {
        let request = SearchRequest::<()>::text("  gold ring ", top_k(5)).unwrap();
        assert!(matches!(request, SearchRequest::Text { ref query, .. } if query == "  gold ring "));

        let blank = SearchRequest::<()>::text("   ", top_k(5)).unwrap();
        assert!(matches!(blank, SearchRequest::Text { ref query, .. } if query == "   "));
    }

    #[test]
    fn test_text_request() {
        let request = SearchRequest::<()>::text("gold ring", top_k(3)).unwrap();
        assert_eq!(request.mode(), Mode::Text);
        assert_eq!(request.top_k().get(), 3);
    }

    #[test]
    fn test_image_request_requires_file() {
        assert!(SearchRequest::<Vec<u8>>::image(None, top_k(5)).is_none());

        let file = SelectedFile::new(vec![1u8, 2, 3], "ring.jpg", "image/jpeg");
        let request = SearchRequest::image(Some(&file), top_k(5)).unwrap();
        assert_eq!(request.mode(), Mode::Image);
    }

    #[test]
    fn test_outcome_from_backend_error() {
        let response = SearchResponse {
            results: Some(vec![]),
            error: Some("index not loaded".to_string()),
        };
        let outcome: Result<SearchOutcome> = response.try_into();
        assert!(matches!(outcome, Err(Error::Backend(_))));
    }

    #[test]
    fn test_outcome_from_analyze() {
        let response = AnalyzeResponse {
            ocr_text: Some("925".to_string()),
            analysis: "Sterling silver bangle".to_string(),
            results: Some(vec![SearchResult::default()]),
            error: None,
        };
        let outcome: SearchOutcome = response.try_into().unwrap();
        assert_eq!(outcome.results.map(|r| r.len()), Some(1));
        assert_eq!(outcome.insight.unwrap().ocr_display(), "925");
    }

    #[test]
    fn test_issue_and_settle() {
        let mut ui = UiState::default();
        let mut dispatcher = SearchDispatcher::default();

        let ticket = dispatcher.issue(&mut ui, Mode::Image);
        assert!(ui.busy());
        assert_eq!(ui.busy_message(), Mode::Image.busy_message());
        assert!(dispatcher.in_flight());

        assert!(dispatcher.settle(&mut ui, ticket));
        assert!(!ui.busy());
        assert!(!dispatcher.in_flight());
    }

    #[test]
    fn test_stale_ticket() {
        let mut ui = UiState::default();
        let mut dispatcher = SearchDispatcher::default();

        let first = dispatcher.issue(&mut ui, Mode::Text);
        let second = dispatcher.issue(&mut ui, Mode::Text);
        assert!(second.seq() > first.seq());

        // 古い応答ではビジー解除しない
        assert!(!dispatcher.settle(&mut ui, first));
        assert!(ui.busy());

        assert!(dispatcher.settle(&mut ui, second));
        assert!(!ui.busy());
    }
}
