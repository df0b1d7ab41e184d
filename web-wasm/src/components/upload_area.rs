//! 画像選択コンポーネント

use image_classify_common::view::file_label;
use image_classify_common::{mime_type_for, ReadGeneration, SelectedImage, ViewState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(state: Memo<ViewState>, on_file_selected: F) -> impl IntoView
where
    F: Fn(SelectedImage) + 'static + Clone + Send + Sync,
{
    let generation = StoredValue::new(ReadGeneration::default());

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Some(ticket) = generation.try_update_value(|g| g.begin()) else {
            return;
        };

        let on_file_selected = on_file_selected.clone();
        spawn_local(async move {
            let image = read_file(file).await;

            // 読込中に別のファイルが選ばれていたら破棄
            if !generation.with_value(|g| g.is_current(ticket)) {
                gloo::console::debug!("stale file read discarded");
                return;
            }

            match image {
                Ok(image) => on_file_selected(image),
                Err(e) => gloo::console::error!(e),
            }
        });
    };

    view! {
        <div class="file-input-wrapper">
            <input
                type="file"
                accept="image/*"
                class="file-input"
                id="file-input"
                on:change=on_change
            />
            <label for="file-input" class="file-label">
                {move || state.with(file_label)}
            </label>
        </div>

        <Show when=move || state.with(|s| s.preview().is_some())>
            <div class="preview">
                <img
                    src=move || state.with(|s| s.preview().unwrap_or_default().to_string())
                    alt="プレビュー"
                    class="preview-image"
                />
            </div>
        </Show>
    }
}

/// 選択されたファイルをバイト列として読み込む
async fn read_file(file: File) -> Result<SelectedImage, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("読込失敗: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let file_name = file.name();
    let mime_type = match file.type_() {
        t if !t.is_empty() => t,
        _ => mime_type_for(&file_name).to_string(),
    };

    Ok(SelectedImage::new(file_name, mime_type, bytes))
}
