//! 表示モデル
//!
//! 画面状態から描画に必要な値だけを導出する。CLIとWebの両方で使う。

use crate::controller::ViewState;
use crate::types::PredictionResult;

/// 結果リストの1行
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    /// 1始まりの順位
    pub rank: usize,
    pub class_name: String,
    /// "91.00%"
    pub percent_label: String,
    /// バーの幅（%）
    pub bar_width: f64,
}

/// サーバーから受け取った順に行を作る
pub fn prediction_rows(result: &PredictionResult) -> Vec<PredictionRow> {
    result
        .predictions
        .iter()
        .enumerate()
        .map(|(index, item)| PredictionRow {
            rank: index + 1,
            class_name: item.class_name.clone(),
            percent_label: item.percent_label(),
            bar_width: item.percent(),
        })
        .collect()
}

pub fn submit_enabled(state: &ViewState) -> bool {
    state.selection().is_some() && !state.is_loading()
}

pub fn submit_label(state: &ViewState) -> &'static str {
    if state.is_loading() {
        "予測中..."
    } else {
        "予測する"
    }
}

pub fn file_label(state: &ViewState) -> String {
    state
        .selection()
        .map(|s| s.image.file_name.clone())
        .unwrap_or_else(|| "画像を選択".to_string())
}

/// 結果見出し "予測結果 (resnet152)"
pub fn result_heading(result: &PredictionResult) -> String {
    format!("予測結果 ({})", result.model_type)
}
