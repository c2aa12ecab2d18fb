//! 検索セッション
//!
//! UI状態・アップロード・結果表示・解析パネルをひとつの所有オブジェクトにまとめる。
//! 書き込みはすべてここで定義した遷移を通す。ブラウザ側はこれをシグナルに包み、
//! CLI側は直接保持する。

use std::num::NonZeroU32;

use crate::config::ClientConfig;
use crate::dispatcher::{dispatch, PendingSearch, SearchBackend, SearchDispatcher, SearchOutcome, SearchRequest, Ticket};
use crate::error::{Error, Result};
use crate::render::{build_results_view, InsightPanel, ResultsView};
use crate::tabs::{Mode, UiState};
use crate::upload::UploadManager;

/// 応答の反映結果
#[derive(Debug)]
pub enum Settlement {
    /// 結果を表示した
    Applied { result_count: usize },
    /// 失敗。`alert` をユーザーに表示する
    Failed { alert: &'static str, error: Error },
    /// 新しいリクエストが発行済みのため破棄した
    Stale,
}

/// 検索セッション
#[derive(Debug, Clone)]
pub struct Session<B> {
    config: ClientConfig,
    ui: UiState,
    upload: UploadManager<B>,
    dispatcher: SearchDispatcher,
    results: Option<ResultsView>,
    insight: InsightPanel,
}

impl<B> Session<B> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            ui: UiState::default(),
            upload: UploadManager::new(),
            dispatcher: SearchDispatcher::default(),
            results: None,
            insight: InsightPanel::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn upload(&self) -> &UploadManager<B> {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadManager<B> {
        &mut self.upload
    }

    /// 表示中の結果（まだ一度も検索していなければ `None`）
    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn insight(&self) -> &InsightPanel {
        &self.insight
    }

    pub fn switch_tab(&mut self, mode: &str) {
        self.ui.switch_tab(mode);
    }

    /// アップロードをリセットし、解析パネルも隠す
    pub fn reset_upload(&mut self) {
        self.upload.reset();
        self.insight.hide();
    }

    /// テキスト検索を開始する。空クエリなら何もしない
    pub fn begin_text_search(&mut self, query: &str, top_k: NonZeroU32) -> Option<PendingSearch<B>> {
        let request = SearchRequest::text(query, top_k)?;
        Some(self.begin(request))
    }

    /// 画像検索を開始する。ファイル未選択なら何もしない
    pub fn begin_image_search(&mut self, top_k: NonZeroU32) -> Option<PendingSearch<B>>
    where
        B: Clone,
    {
        let request = SearchRequest::image(self.upload.selected(), top_k)?;
        Some(self.begin(request))
    }

    fn begin(&mut self, request: SearchRequest<B>) -> PendingSearch<B> {
        let ticket = self.dispatcher.issue(&mut self.ui, request.mode());
        PendingSearch { ticket, request }
    }

    /// 応答を反映する
    ///
    /// 最新チケットであれば成功・失敗にかかわらずビジー状態を解除する。
    /// 失敗時は表示中の結果に触れない。
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<SearchOutcome>) -> Settlement {
        if !self.dispatcher.settle(&mut self.ui, ticket) {
            return Settlement::Stale;
        }

        match outcome {
            Ok(outcome) => {
                let view = build_results_view(outcome.results.as_deref(), &self.config);
                let result_count = view.cards().len();
                self.results = Some(view);

                match (ticket.mode(), outcome.insight) {
                    (Mode::Image, Some(insight)) => self.insight.show(&insight),
                    (Mode::Image, None) => {}
                    (Mode::Text, _) => self.insight.hide(),
                }
                Settlement::Applied { result_count }
            }
            Err(error) => {
                log::warn!("{} search failed: {}", ticket.mode().as_str(), error);
                Settlement::Failed {
                    alert: ticket.mode().failure_alert(),
                    error,
                }
            }
        }
    }

    /// 開始・送信・反映をまとめて実行する
    async fn run<K>(&mut self, backend: &K, pending: PendingSearch<B>) -> Settlement
    where
        K: SearchBackend<Blob = B>,
    {
        let outcome = dispatch(backend, &pending.request).await;
        self.settle(pending.ticket, outcome)
    }

    /// テキスト検索。空クエリなら `None`（リクエストは送らない）
    pub async fn run_text_search<K>(
        &mut self,
        backend: &K,
        query: &str,
        top_k: NonZeroU32,
    ) -> Option<Settlement>
    where
        K: SearchBackend<Blob = B>,
    {
        let pending = self.begin_text_search(query, top_k)?;
        Some(self.run(backend, pending).await)
    }

    /// 画像検索。ファイル未選択なら `None`
    pub async fn run_image_search<K>(&mut self, backend: &K, top_k: NonZeroU32) -> Option<Settlement>
    where
        B: Clone,
        K: SearchBackend<Blob = B>,
    {
        let pending = self.begin_image_search(top_k)?;
        Some(self.run(backend, pending).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalyzeResponse, SearchResponse, SearchResult};
    use crate::upload::SelectedFile;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// 呼び出しを記録するモックバックエンド
    #[derive(Default)]
    struct MockBackend {
        calls: RefCell<Vec<String>>,
        results: Vec<SearchResult>,
        fail: bool,
    }

    impl MockBackend {
        fn with_results(results: Vec<SearchResult>) -> Self {
            Self {
                results,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl SearchBackend for MockBackend {
        type Blob = Vec<u8>;

        async fn search_text(&self, query: &str, top_k: NonZeroU32) -> Result<SearchResponse> {
            self.calls.borrow_mut().push(format!("search:{}:{}", query, top_k));
            if self.fail {
                return Err(Error::Network("connection refused".into()));
            }
            Ok(SearchResponse {
                results: Some(self.results.clone()),
                error: None,
            })
        }

        async fn analyze_image(
            &self,
            file: &SelectedFile<Vec<u8>>,
            top_k: NonZeroU32,
        ) -> Result<AnalyzeResponse> {
            self.calls.borrow_mut().push(format!("analyze:{}:{}", file.name, top_k));
            if self.fail {
                return Err(Error::Status(500));
            }
            Ok(AnalyzeResponse {
                ocr_text: None,
                analysis: "Rose gold band".into(),
                results: Some(self.results.clone()),
                error: None,
            })
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    fn top_k(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn hit(name: &str, score: f64) -> SearchResult {
        SearchResult {
            image_name: name.into(),
            caption: format!("caption {}", name),
            category: "Ring".into(),
            material: "Gold".into(),
            style: "Classic".into(),
            score,
        }
    }

    fn session() -> Session<Vec<u8>> {
        Session::new(ClientConfig::default())
    }

    fn select_image(session: &mut Session<Vec<u8>>) {
        let file = SelectedFile::new(vec![0xff, 0xd8], "ring.jpg", "image/jpeg");
        let ticket = session.upload_mut().select_file(file).unwrap();
        session.upload_mut().complete_decode(ticket, "data:image/jpeg;base64,/9g=".into());
    }

    #[test]
    fn test_text_search_success() {
        let backend = MockBackend::with_results(vec![hit("a.jpg", 0.9), hit("b.jpg", 0.7), hit("c.jpg", 0.3)]);
        let mut session = session();

        let settlement = block_on(session.run_text_search(&backend, "gold ring", top_k(3)));
        assert!(matches!(settlement, Some(Settlement::Applied { result_count: 3 })));
        assert_eq!(*backend.calls.borrow(), vec!["search:gold ring:3".to_string()]);

        let names: Vec<&str> = session
            .results()
            .unwrap()
            .cards()
            .iter()
            .map(|c| c.image_src.as_str())
            .collect();
        assert_eq!(names, vec!["/images/a.jpg", "/images/b.jpg", "/images/c.jpg"]);
        assert!(!session.ui().busy());
        assert!(!session.insight().visible());
    }

    #[test]
    fn test_text_search_empty_query_sends_nothing() {
        let backend = MockBackend::default();
        let mut session = session();

        assert!(block_on(session.run_text_search(&backend, "", top_k(5))).is_none());
        assert!(backend.calls.borrow().is_empty());
        assert!(!session.ui().busy());
        assert!(session.results().is_none());
    }

    #[test]
    fn test_text_search_hides_insight() {
        let backend = MockBackend::with_results(vec![hit("a.jpg", 0.9)]);
        let mut session = session();
        select_image(&mut session);
        block_on(session.run_image_search(&backend, top_k(5)));
        assert!(session.insight().visible());

        block_on(session.run_text_search(&backend, "pendant", top_k(5)));
        assert!(!session.insight().visible());
    }

    #[test]
    fn test_failure_clears_busy_and_keeps_results() {
        let mut session = session();
        let ok = MockBackend::with_results(vec![hit("a.jpg", 0.9)]);
        block_on(session.run_text_search(&ok, "ring", top_k(5)));
        let before = session.results().cloned();

        let pending = session.begin_text_search("necklace", top_k(5)).unwrap();
        assert!(session.ui().busy());

        let failing = MockBackend::failing();
        let outcome = block_on(dispatch(&failing, &pending.request));
        let settlement = session.settle(pending.ticket, outcome);

        assert!(!session.ui().busy());
        assert!(matches!(
            settlement,
            Settlement::Failed { alert, .. } if alert == Mode::Text.failure_alert()
        ));
        assert_eq!(session.results().cloned(), before);
    }

    #[test]
    fn test_image_search_without_file() {
        let backend = MockBackend::default();
        let mut session = session();
        assert!(block_on(session.run_image_search(&backend, top_k(5))).is_none());
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn test_image_search_success() {
        let backend = MockBackend::with_results(vec![hit("r1.jpg", 0.83)]);
        let mut session = session();
        select_image(&mut session);

        let settlement = block_on(session.run_image_search(&backend, top_k(4)));
        assert!(matches!(settlement, Some(Settlement::Applied { result_count: 1 })));
        assert_eq!(*backend.calls.borrow(), vec!["analyze:ring.jpg:4".to_string()]);

        let insight = session.insight();
        assert!(insight.visible());
        assert_eq!(insight.ocr_text(), "Undetected");
        assert_eq!(insight.analysis(), "Rose gold band");
        assert_eq!(session.results().unwrap().cards()[0].badge_label, "83% Match");
    }

    #[test]
    fn test_image_search_failure_keeps_insight_visibility() {
        let mut session = session();
        select_image(&mut session);

        let settlement = block_on(session.run_image_search(&MockBackend::failing(), top_k(5)));
        assert!(matches!(
            settlement,
            Some(Settlement::Failed { alert, .. }) if alert == Mode::Image.failure_alert()
        ));
        assert!(!session.insight().visible());
        assert!(!session.ui().busy());
    }

    #[test]
    fn test_image_search_failure_leaves_shown_insight() {
        let mut session = session();
        select_image(&mut session);
        let ok = MockBackend::with_results(vec![hit("r1.jpg", 0.83)]);
        block_on(session.run_image_search(&ok, top_k(5)));
        assert!(session.insight().visible());
        let results_before = session.results().cloned();

        let settlement = block_on(session.run_image_search(&MockBackend::failing(), top_k(5)));
        assert!(matches!(settlement, Some(Settlement::Failed { .. })));
        let insight = session.insight();
        assert!(insight.visible());
        assert_eq!(insight.ocr_text(), "Undetected");
        assert_eq!(insight.analysis(), "Rose gold band");
        assert_eq!(session.results().cloned(), results_before);
    }

    #[test]
    fn test_text_failure_keeps_image_results() {
        let mut session = session();
        select_image(&mut session);
        let ok = MockBackend::with_results(vec![hit("r1.jpg", 0.83), hit("r2.jpg", 0.61)]);
        block_on(session.run_image_search(&ok, top_k(5)));
        let results_before = session.results().cloned();

        let settlement = block_on(session.run_text_search(&MockBackend::failing(), "bracelet", top_k(5)));
        assert!(matches!(
            settlement,
            Some(Settlement::Failed { alert, .. }) if alert == Mode::Text.failure_alert()
        ));
        assert_eq!(session.results().cloned(), results_before);
        assert_eq!(session.results().unwrap().cards().len(), 2);
        assert!(!session.ui().busy());
    }

    #[test]
    fn test_text_search_sends_query_verbatim() {
        let backend = MockBackend::with_results(vec![hit("a.jpg", 0.9)]);
        let mut session = session();

        assert!(block_on(session.run_text_search(&backend, "  gold ring ", top_k(5))).is_some());
        assert!(block_on(session.run_text_search(&backend, "   ", top_k(5))).is_some());
        assert_eq!(
            *backend.calls.borrow(),
            vec!["search:  gold ring :5".to_string(), "search:   :5".to_string()]
        );
    }

    #[test]
    fn test_empty_results_state() {
        let backend = MockBackend::with_results(vec![]);
        let mut session = session();
        block_on(session.run_text_search(&backend, "tiara", top_k(5)));
        assert!(session.results().unwrap().is_empty_state());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut session = session();
        let slow = session.begin_text_search("first", top_k(5)).unwrap();
        let fast = session.begin_text_search("second", top_k(5)).unwrap();

        let fast_outcome = Ok(SearchOutcome {
            results: Some(vec![hit("fast.jpg", 0.9)]),
            insight: None,
        });
        assert!(matches!(
            session.settle(fast.ticket, fast_outcome),
            Settlement::Applied { result_count: 1 }
        ));

        let slow_outcome = Ok(SearchOutcome {
            results: Some(vec![hit("slow1.jpg", 0.5), hit("slow2.jpg", 0.4)]),
            insight: None,
        });
        assert!(matches!(session.settle(slow.ticket, slow_outcome), Settlement::Stale));
        assert_eq!(session.results().unwrap().cards()[0].image_src, "/images/fast.jpg");
        assert!(!session.ui().busy());
    }

    #[test]
    fn test_reset_upload_hides_insight() {
        let backend = MockBackend::with_results(vec![hit("a.jpg", 0.9)]);
        let mut session = session();
        select_image(&mut session);
        block_on(session.run_image_search(&backend, top_k(5)));

        session.reset_upload();
        session.reset_upload();
        assert!(!session.insight().visible());
        assert!(session.upload().selected().is_none());
        assert_eq!(session.upload().view(), crate::upload::UploadView::DropZone);
    }
}
