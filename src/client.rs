//! 推論サービスのHTTPクライアント
//!
//! `POST {base}/predict/{model}` に画像をmultipartで送り、
//! 順位付きの予測結果を受け取る。失敗はすべて `RequestFailure` にまとめる。

use crate::error::{ClassifyError, Result};
use async_trait::async_trait;
use image_classify_common::api::{self, HealthStatus, ServiceInfo, FILE_FIELD};
use image_classify_common::{ModelChoice, PredictionResult, RequestFailure, SelectedImage};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 画像を分類するもの（テストでは差し替える）
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        image: &SelectedImage,
        model: ModelChoice,
    ) -> std::result::Result<PredictionResult, RequestFailure>;
}

pub struct PredictClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// タイムアウト未指定ならreqwestの既定に任せる
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClassifyError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn predict(
        &self,
        image: &SelectedImage,
        model: ModelChoice,
    ) -> std::result::Result<PredictionResult, RequestFailure> {
        let url = api::predict_url(&self.base_url, model);

        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(failure_from_reqwest)?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(%url, %model, bytes = image.len(), "sending prediction request");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(failure_from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(failure_from_reqwest)?;

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "prediction request failed");
            return Err(api::failure_from_status(status.as_u16(), &body));
        }

        let result = api::parse_prediction(&body)?;
        debug!(model_type = %result.model_type, count = result.predictions.len(), "prediction received");
        Ok(result)
    }

    pub async fn health(&self) -> std::result::Result<HealthStatus, RequestFailure> {
        self.get_json(&api::health_url(&self.base_url)).await
    }

    pub async fn service_info(&self) -> std::result::Result<ServiceInfo, RequestFailure> {
        self.get_json(&api::service_info_url(&self.base_url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, RequestFailure> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(failure_from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(failure_from_reqwest)?;

        if !status.is_success() {
            return Err(api::failure_from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| RequestFailure::new(format!("Invalid response: {}", e)))
    }
}

#[async_trait]
impl Classifier for PredictClient {
    async fn classify(
        &self,
        image: &SelectedImage,
        model: ModelChoice,
    ) -> std::result::Result<PredictionResult, RequestFailure> {
        self.predict(image, model).await
    }
}

/// 接続できない場合はメッセージ無し（既定文言でサーバー起動を促す）
fn failure_from_reqwest(err: reqwest::Error) -> RequestFailure {
    if err.is_timeout() {
        RequestFailure::new("timeout")
    } else if err.is_connect() {
        warn!(error = %err, "inference service unreachable");
        RequestFailure::without_message()
    } else {
        RequestFailure::new(err.to_string())
    }
}
