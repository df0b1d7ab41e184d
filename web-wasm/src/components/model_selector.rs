//! モデル選択コンポーネント

use image_classify_common::ModelChoice;
use leptos::prelude::*;

#[component]
pub fn ModelSelector<F>(model: Signal<ModelChoice>, on_change: F) -> impl IntoView
where
    F: Fn(ModelChoice) + 'static + Clone + Send + Sync,
{
    view! {
        <div class="model-selector">
            {ModelChoice::ALL
                .into_iter()
                .map(|choice| {
                    let on_change = on_change.clone();
                    view! {
                        <label>
                            <input
                                type="radio"
                                name="model"
                                value=choice.as_str()
                                prop:checked=move || model.get() == choice
                                on:change=move |_| on_change(choice)
                            />
                            {choice.label()}
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}
