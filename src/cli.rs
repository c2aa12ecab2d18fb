use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jewel-search")]
#[command(about = "ジュエリーカタログ検索クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// テキストで検索
    Search {
        /// 検索クエリ（例: "vintage gold ring"）
        #[arg(required = true)]
        query: String,

        /// 取得件数（デフォルト: 設定値）
        #[arg(short = 'k', long)]
        top_k: Option<u32>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像で検索（OCR + 画像解析）
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 取得件数
        #[arg(short = 'k', long)]
        top_k: Option<u32>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// バックエンドの疎通確認（スリープ中のサーバを起こす）
    Ping,

    /// 設定管理
    Config {
        /// APIベースURLを設定
        #[arg(long)]
        set_api_base: Option<String>,

        /// デフォルト取得件数を設定
        #[arg(long)]
        set_top_k: Option<u32>,

        /// タイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
