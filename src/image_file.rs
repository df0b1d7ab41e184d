use crate::error::{ClassifyError, Result};
use image_classify_common::{mime_type_for, SelectedImage};
use std::path::Path;

/// 画像ファイルを読み込む
///
/// MIMEタイプは中身から判定し、判定できなければ拡張子から推定する。
/// 空ファイルは送信しない。
pub async fn load_image(path: &Path) -> Result<SelectedImage> {
    if !path.is_file() {
        return Err(ClassifyError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(ClassifyError::ImageLoad(format!("空のファイルです: {}", path.display())));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mime_type = match image::guess_format(&bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => mime_type_for(&file_name),
    };

    Ok(SelectedImage::new(file_name, mime_type, bytes))
}
