//! メインアプリケーションコンポーネント

use crate::api::predict::{predict, ApiConfig};
use crate::components::{
    header::Header,
    model_selector::ModelSelector,
    prediction_list::PredictionList,
    upload_area::UploadArea,
};
use image_classify_common::view::{submit_enabled, submit_label};
use image_classify_common::{to_data_url, Controller, Effect, ModelChoice, SelectedImage, ViewState};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// コントローラが要求した副作用を非同期に実行し、完了を戻す
fn run_effects(controller: RwSignal<Controller>, config: ApiConfig, effects: Vec<Effect>) {
    for effect in effects {
        let config = config.clone();
        spawn_local(async move {
            let next = match effect {
                Effect::ReadPreview { selection, image } => {
                    let data_url = to_data_url(&image);
                    controller.try_update(|c| c.preview_ready(selection, data_url))
                }
                Effect::Classify { request, image, model } => {
                    let outcome = predict(&config, &image, model).await;
                    controller.try_update(|c| c.classify_settled(request, outcome))
                }
            };
            run_effects(controller, config, next.unwrap_or_default());
        });
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::from_build_env();

    let controller = RwSignal::new(Controller::new());
    let state: Memo<ViewState> = Memo::new(move |_| controller.with(|c| c.state().clone()));

    // ファイル選択ハンドラ
    let on_file_selected = {
        let config = config.clone();
        move |image: SelectedImage| {
            let effects = controller.try_update(|c| c.select_file(image)).unwrap_or_default();
            run_effects(controller, config.clone(), effects);
        }
    };

    // モデル切替ハンドラ（モデル以外は変えない）
    let on_model_change = move |model: ModelChoice| {
        controller.update(|c| {
            c.choose_model(model);
        });
    };

    // 予測ハンドラ
    let on_submit = move |_| {
        let effects = controller.try_update(|c| c.submit()).unwrap_or_default();
        run_effects(controller, config.clone(), effects);
    };

    view! {
        <div class="app">
            <Header />

            <main class="main">
                <div class="upload-section">
                    <ModelSelector
                        model=Signal::derive(move || state.with(|s| s.model()))
                        on_change=on_model_change
                    />

                    <UploadArea state=state on_file_selected=on_file_selected />

                    <button
                        class="predict-button"
                        disabled=move || !state.with(submit_enabled)
                        on:click=on_submit
                    >
                        {move || state.with(submit_label)}
                    </button>
                </div>

                <Show when=move || state.with(|s| s.error().is_some())>
                    <div class="error">
                        <p>{move || state.with(|s| s.error().unwrap_or_default().to_string())}</p>
                    </div>
                </Show>

                <PredictionList result=Signal::derive(move || state.with(|s| s.result().cloned())) />
            </main>

            <footer class="footer">
                <p>"Powered by FastAPI + PyTorch + Leptos"</p>
            </footer>
        </div>
    }
}
