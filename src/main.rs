use clap::Parser;
use jewel_search::{backend, cli, config, error, files, output};
use backend::HttpBackend;
use cli::{Cli, Commands};
use config::Config;
use error::{JewelSearchError, Result};
use jewel_search_common::{dispatch, ClientConfig, PendingSearch, SearchBackend, Session, Settlement};
use std::num::NonZeroU32;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(base) = cli.api_base {
        config.override_api_base(base)?;
    }

    match cli.command {
        Commands::Search { query, top_k, json } => {
            let client = config.client_config();
            let top_k = resolve_top_k(top_k, &client);
            let backend = HttpBackend::new(client.clone())?;

            let mut session = Session::new(client);
            session.switch_tab("text");
            let pending = session
                .begin_text_search(&query, top_k)
                .ok_or(JewelSearchError::EmptyQuery)?;

            run_search(&mut session, &backend, pending, json).await?;
        }

        Commands::Analyze { image, top_k, json } => {
            let client = config.client_config();
            let top_k = resolve_top_k(top_k, &client);
            let backend = HttpBackend::new(client.clone())?;

            let mut session = Session::new(client);
            session.switch_tab("image");

            let file = files::load_image(&image)?;
            let ticket = session
                .upload_mut()
                .select_file(file)
                .ok_or_else(|| JewelSearchError::NotAnImage(image.display().to_string()))?;
            log::debug!("selected {} ({:?})", image.display(), ticket);

            let pending = session
                .begin_image_search(top_k)
                .ok_or_else(|| JewelSearchError::NotAnImage(image.display().to_string()))?;

            run_search(&mut session, &backend, pending, json).await?;
        }

        Commands::Ping => {
            let client = config.client_config();
            let backend = HttpBackend::new(client.clone())?;

            let spinner = output::spinner("Waking up the vault...");
            let result = backend.ping().await;
            spinner.finish_and_clear();

            match result {
                Ok(()) => println!("✔ {} は応答しています", client.api_base),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Config { set_api_base, set_top_k, set_timeout, show } => {
            let mut changed = false;

            if let Some(base) = set_api_base {
                config.set_api_base(base)?;
                changed = true;
            }
            if let Some(top_k) = set_top_k {
                config.set_default_top_k(top_k)?;
                changed = true;
            }
            if let Some(timeout) = set_timeout {
                config.timeout_seconds = timeout.max(1);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  APIベースURL: {}", config.api_base());
                println!("  取得件数: {}", config.default_top_k);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_level(verbose)),
    )
    .init();
}

fn resolve_top_k(top_k: Option<u32>, client: &ClientConfig) -> NonZeroU32 {
    top_k
        .and_then(NonZeroU32::new)
        .unwrap_or(client.default_top_k)
}

/// 送信・反映・表示
async fn run_search(
    session: &mut Session<Vec<u8>>,
    backend: &HttpBackend,
    pending: PendingSearch<Vec<u8>>,
    json: bool,
) -> Result<()> {
    let spinner = output::spinner(session.ui().busy_message());
    let outcome = dispatch(backend, &pending.request).await;
    spinner.finish_and_clear();

    let raw = outcome.as_ref().ok().cloned();

    match session.settle(pending.ticket, outcome) {
        Settlement::Applied { result_count } => {
            log::info!("{} results", result_count);
            if json {
                let raw = raw.unwrap_or_default();
                let payload = serde_json::json!({
                    "ocr_text": raw.insight.as_ref().and_then(|i| i.ocr_text.clone()),
                    "analysis": raw.insight.as_ref().map(|i| i.analysis.clone()),
                    "results": raw.results.unwrap_or_default(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            if let Some(insight) = output::format_insight(session.insight()) {
                println!("{}\n", insight);
            }
            if let Some(view) = session.results() {
                println!("{}", output::format_results(view));
            }
            Ok(())
        }
        Settlement::Failed { alert, error } => Err(JewelSearchError::SearchFailed {
            alert: alert.to_string(),
            source: error,
        }),
        Settlement::Stale => Ok(()),
    }
}
