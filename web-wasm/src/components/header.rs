//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"画像分類アプリ"</h1>
            <p>"ResNet152またはViTモデルで画像を分類します"</p>
        </header>
    }
}
