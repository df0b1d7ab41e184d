//! 予測結果リストコンポーネント

use image_classify_common::view::{prediction_rows, result_heading};
use image_classify_common::PredictionResult;
use leptos::prelude::*;

#[component]
pub fn PredictionList(result: Signal<Option<PredictionResult>>) -> impl IntoView {
    move || {
        result.get().map(|result| {
            let heading = result_heading(&result);
            let rows = prediction_rows(&result);

            view! {
                <div class="results">
                    <h2>{heading}</h2>
                    <div class="predictions-list">
                        {rows
                            .into_iter()
                            .map(|row| {
                                view! {
                                    <div class="prediction-item">
                                        <div class="rank">{format!("#{}", row.rank)}</div>
                                        <div class="class-name">{row.class_name}</div>
                                        <div class="confidence-bar-wrapper">
                                            <div
                                                class="confidence-bar"
                                                style=format!("width: {}%", row.bar_width)
                                            />
                                        </div>
                                        <div class="confidence">{row.percent_label}</div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            }
        })
    }
}
