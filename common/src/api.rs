//! 推論サービスのRESTコントラクト
//!
//! - `POST {base}/predict/{model}` multipart (フィールド名 `file`)
//! - `GET {base}/health`
//! - `GET {base}/`
//!
//! ネイティブ(reqwest)とブラウザ(fetch)の両アダプタがここを共有する。

use crate::error::RequestFailure;
use crate::types::{ModelChoice, PredictionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ベースURL未設定時の既定値
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// 画像を載せるmultipartフィールド名
pub const FILE_FIELD: &str = "file";

/// `GET /health` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// `GET /` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

/// FastAPIのエラーボディ `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub fn predict_url(base_url: &str, model: ModelChoice) -> String {
    join(base_url, &format!("predict/{}", model.as_str()))
}

pub fn health_url(base_url: &str) -> String {
    join(base_url, "health")
}

pub fn service_info_url(base_url: &str) -> String {
    join(base_url, "")
}

/// 成功レスポンスのボディをパース
pub fn parse_prediction(body: &str) -> Result<PredictionResult, RequestFailure> {
    serde_json::from_str(body).map_err(|e| RequestFailure::new(format!("Invalid response: {}", e)))
}

/// 2xx以外のレスポンスを失敗に変換
///
/// ボディに `detail` 文字列があればそれを、なければステータスコードを含む文言を使う。
pub fn failure_from_status(status: u16, body: &str) -> RequestFailure {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| match b.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        });

    match detail {
        Some(detail) => RequestFailure::new(detail),
        None => RequestFailure::new(format!("Request failed with status code {}", status)),
    }
}
