//! 検索API クライアント（reqwest）
//!
//! `POST /search`・`POST /analyze` を multipart で呼び出す。
//! タイムアウトはクライアント全体に設定し、期限切れは `Error::Timeout` にする。

use jewel_search_common::{
    AnalyzeResponse, ClientConfig, Error as ApiError, Result as ApiResult, SearchBackend,
    SearchResponse, SelectedFile,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::Duration;

pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> ApiResult<T> {
        let url = self.config.endpoint(path);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.request_timeout_ms)
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl SearchBackend for HttpBackend {
    type Blob = Vec<u8>;

    async fn search_text(&self, query: &str, top_k: NonZeroU32) -> ApiResult<SearchResponse> {
        let form = Form::new()
            .text("query", query.to_string())
            .text("top_k", top_k.to_string());
        self.post_form("/search", form).await
    }

    async fn analyze_image(
        &self,
        file: &SelectedFile<Vec<u8>>,
        top_k: NonZeroU32,
    ) -> ApiResult<AnalyzeResponse> {
        let part = Part::bytes(file.blob.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::Config(format!("MIMEタイプが不正です: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("top_k", top_k.to_string());
        self.post_form("/analyze", form).await
    }

    async fn ping(&self) -> ApiResult<()> {
        let url = self.config.endpoint("/ping");
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(response.status().as_u16()))
        }
    }
}
