//! 検索API連携（fetch + FormData）
//!
//! `POST /search`・`POST /analyze` を multipart で呼び出し、
//! `GET /ping` でスリープ中のバックエンドを起こす。
//! すべての呼び出しはタイムアウト付きで、期限切れは fetch を中断して失敗扱いにする。

use futures::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use jewel_search_common::{
    AnalyzeResponse, ClientConfig, Error, Result, SearchBackend, SearchResponse, SelectedFile,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, File, FormData, Request, RequestInit, RequestMode, Response};

/// `GET /ping` のレスポンス
#[derive(Deserialize)]
struct PingResponse {
    status: String,
}

#[derive(Clone)]
pub struct HttpBackend {
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// fetchを実行してJSONをデコードする
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<FormData>,
    ) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("{} {}", method, url);

        let controller = AbortController::new().map_err(network_error)?;
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_signal(Some(&controller.signal()));
        if let Some(form) = body {
            opts.set_body(&form.into());
        }

        let request = Request::new_with_str_and_init(&url, &opts).map_err(network_error)?;
        let window = web_sys::window().ok_or_else(|| Error::Network("window unavailable".into()))?;

        let fetch = async move {
            let resp_value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(network_error)?;
            let resp: Response = resp_value
                .dyn_into()
                .map_err(|_| Error::Decode("fetch did not return a Response".into()))?;

            if !resp.ok() {
                return Err(Error::Status(resp.status()));
            }

            let json = JsFuture::from(resp.json().map_err(decode_error)?)
                .await
                .map_err(decode_error)?;
            serde_wasm_bindgen::from_value::<T>(json).map_err(|e| Error::Decode(e.to_string()))
        };

        let timeout_ms = self.config.request_timeout_ms;
        let timeout = TimeoutFuture::new(timeout_ms.min(u32::MAX as u64) as u32);

        match select(Box::pin(fetch), Box::pin(timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                controller.abort();
                Err(Error::Timeout(timeout_ms))
            }
        }
    }
}

impl SearchBackend for HttpBackend {
    type Blob = File;

    async fn search_text(&self, query: &str, top_k: NonZeroU32) -> Result<SearchResponse> {
        let form = search_form(query, top_k).map_err(network_error)?;
        self.fetch_json("POST", "/search", Some(form)).await
    }

    async fn analyze_image(&self, file: &SelectedFile<File>, top_k: NonZeroU32) -> Result<AnalyzeResponse> {
        let form = analyze_form(&file.blob, &file.name, top_k).map_err(network_error)?;
        self.fetch_json("POST", "/analyze", Some(form)).await
    }

    async fn ping(&self) -> Result<()> {
        let response: PingResponse = self.fetch_json("GET", "/ping", None).await?;
        if response.status == "ok" {
            Ok(())
        } else {
            Err(Error::Backend(format!("unexpected ping status: {}", response.status)))
        }
    }
}

/// テキスト検索のフォーム（query, top_k）
pub fn search_form(query: &str, top_k: NonZeroU32) -> std::result::Result<FormData, JsValue> {
    let form = FormData::new()?;
    form.append_with_str("query", query)?;
    form.append_with_str("top_k", &top_k.to_string())?;
    Ok(form)
}

/// 画像検索のフォーム（file, top_k）
pub fn analyze_form(file: &File, name: &str, top_k: NonZeroU32) -> std::result::Result<FormData, JsValue> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", file, name)?;
    form.append_with_str("top_k", &top_k.to_string())?;
    Ok(form)
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn network_error(value: JsValue) -> Error {
    Error::Network(js_message(&value))
}

fn decode_error(value: JsValue) -> Error {
    Error::Decode(js_message(&value))
}
