use image_classify_common::RequestFailure;
use thiserror::Error;

/// ヘルスチェックが理由なしで失敗した場合のメッセージ
pub const SERVICE_UNREACHABLE: &str = "応答がありません。推論サービスが起動しているか確認してください。";

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("予測エラー: {0}")]
    Prediction(String),

    #[error("サーバーに接続できません: {0}")]
    Unavailable(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifyError {
    /// ヘルスチェック失敗を変換（予測失敗の既定文言は使わない）
    pub fn unavailable(failure: &RequestFailure) -> Self {
        let message = match failure.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => SERVICE_UNREACHABLE.to_string(),
        };
        ClassifyError::Unavailable(message)
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
