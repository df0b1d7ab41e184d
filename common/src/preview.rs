//! 選択画像とプレビュー生成
//!
//! プレビューは "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// ユーザーが選択した画像
///
/// 新しい選択で丸ごと置き換えられ、部分的に書き換えられることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// 拡張子からMIMEタイプを推定して作成
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name).to_string();
        Self::new(file_name, mime_type, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// 画像バイト列をData URLに変換
pub fn to_data_url(image: &SelectedImage) -> String {
    format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.bytes))
}

/// ファイル名の拡張子からMIMEタイプを推定
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// ファイル読込の世代
///
/// 読込は非同期に完了するため、最後に開始した読込の結果だけを採用する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadGeneration(u64);

impl ReadGeneration {
    /// 新しい読込を開始し、その世代番号を返す
    pub fn begin(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0 == ticket
    }
}
