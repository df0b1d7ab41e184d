use clap::{Parser, Subcommand};
use image_classify_common::ModelChoice;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-classify")]
#[command(about = "ResNet152 / ViT 画像分類クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 推論サービスのベースURL（環境変数 CLASSIFY_API_URL より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を分類して予測結果を表示
    Classify {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// モデル (resnet152/vit)。省略時は設定ファイルの既定
        #[arg(short, long)]
        model: Option<ModelChoice>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 推論サービスの稼働確認
    Health,

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// リクエストのタイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 既定のモデルを設定
        #[arg(long)]
        set_model: Option<ModelChoice>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
