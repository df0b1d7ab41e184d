//! エラー型定義

use thiserror::Error;

/// ファイル未選択で予測しようとした場合のメッセージ
pub const NO_FILE_SELECTED: &str = "画像を選択してください";

/// 失敗理由を取り出せなかった場合のメッセージ
pub const PREDICTION_FAILED: &str = "予測に失敗しました。サーバーが起動しているか確認してください。";

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown model: {0}. Use resnet152 or vit")]
    UnknownModel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 推論リクエストの失敗
///
/// タイムアウト・HTTPエラー・パース失敗を区別せず、表示用メッセージだけを運ぶ。
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", message_or_default(.message))]
pub struct RequestFailure {
    pub message: Option<String>,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }

    /// メッセージを取り出せない失敗（接続拒否など）
    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// 画面に出す文字列。メッセージが無ければ既定文言
    pub fn display_message(&self) -> &str {
        message_or_default(&self.message)
    }
}

fn message_or_default(message: &Option<String>) -> &str {
    match message.as_deref() {
        Some(message) if !message.trim().is_empty() => message,
        _ => PREDICTION_FAILED,
    }
}
