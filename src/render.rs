//! 端末への結果表示

use image_classify_common::view::{prediction_rows, result_heading};
use image_classify_common::{PredictionResult, ViewState};

const BAR_WIDTH: usize = 30;

/// 確信度バー（幅はクランプして描画のみ揃える）
pub fn confidence_bar(bar_width: f64) -> String {
    let filled = ((bar_width / 100.0) * BAR_WIDTH as f64).round();
    let filled = filled.clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// 結果を行ごとの文字列にする
pub fn format_result(result: &PredictionResult) -> Vec<String> {
    let rows = prediction_rows(result);
    let name_width = rows.iter().map(|r| r.class_name.chars().count()).max().unwrap_or(0);

    let mut lines = vec![result_heading(result)];
    lines.extend(rows.iter().map(|row| {
        format!(
            "  #{:<2} {:<width$}  {}  {:>7}",
            row.rank,
            row.class_name,
            confidence_bar(row.bar_width),
            row.percent_label,
            width = name_width
        )
    }));
    lines
}

/// 最上位の予測を1行で
pub fn summary_line(result: &PredictionResult) -> Option<String> {
    result
        .top()
        .map(|top| format!("✔ {} ({})", top.class_name, top.percent_label()))
}

pub fn print_state(state: &ViewState) {
    if let Some(message) = state.error() {
        println!("✖ {}", message);
        return;
    }

    if let Some(result) = state.result() {
        if let Some(summary) = summary_line(result) {
            println!("{}", summary);
        }
        for line in format_result(result) {
            println!("{}", line);
        }
    }
}
