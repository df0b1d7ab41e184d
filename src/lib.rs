//! ResNet152 / ViT 画像分類クライアント
//!
//! 推論サービスへ画像を送り、順位付きの予測結果を表示する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod image_file;
pub mod render;
pub mod session;
