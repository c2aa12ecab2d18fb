//! Jewel Search Common Library
//!
//! CLIとWeb(WASM)で共有される検索クライアントの状態機械とビューモデル

pub mod types;
pub mod error;
pub mod config;
pub mod tabs;
pub mod upload;
pub mod render;
pub mod dispatcher;
pub mod session;

pub use types::{AnalysisInsight, AnalyzeResponse, SearchResponse, SearchResult};
pub use error::{Error, Result};
pub use config::{parse_top_k, ClientConfig};
pub use tabs::{Mode, UiState};
pub use upload::{encode_data_url, is_image_mime, DecodeTicket, SelectedFile, UploadManager, UploadView};
pub use render::{build_results_view, InsightPanel, ResultCard, ResultsView, ScoreTier};
pub use dispatcher::{dispatch, PendingSearch, SearchBackend, SearchDispatcher, SearchOutcome, SearchRequest, Ticket};
pub use session::{Session, Settlement};
