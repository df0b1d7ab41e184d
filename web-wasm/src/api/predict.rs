//! 推論サービス連携（ブラウザ版）
//!
//! fetch + FormData で `POST {base}/predict/{model}` を呼ぶ。
//! ベースURLはビルド時の環境変数 `CLASSIFY_API_URL`（未設定なら既定値）。

use image_classify_common::api::{self, DEFAULT_API_URL, FILE_FIELD};
use image_classify_common::{ModelChoice, PredictionResult, RequestFailure, SelectedImage};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

/// 推論サービスの接続先（ルートで作り、引数で渡す）
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_build_env() -> Self {
        Self {
            base_url: resolve_base_url(option_env!("CLASSIFY_API_URL")),
        }
    }
}

fn resolve_base_url(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

/// JSの例外から表示用メッセージを取り出す
fn js_failure(err: JsValue) -> RequestFailure {
    let message = err
        .as_string()
        .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())));
    RequestFailure { message }
}

/// fetchの拒否はネットワーク到達不能（既定メッセージで案内する）
fn fetch_rejection(err: JsValue) -> RequestFailure {
    gloo::console::warn!("fetch failed", err);
    RequestFailure::without_message()
}

fn image_blob(image: &SelectedImage) -> Result<Blob, RequestFailure> {
    let bytes = js_sys::Uint8Array::from(image.bytes.as_ref());
    let parts = js_sys::Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&image.mime_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_failure)
}

async fn response_text(resp: &Response) -> Result<String, RequestFailure> {
    let text = JsFuture::from(resp.text().map_err(js_failure)?)
        .await
        .map_err(js_failure)?;
    Ok(text.as_string().unwrap_or_default())
}

/// 画像を分類
pub async fn predict(
    config: &ApiConfig,
    image: &SelectedImage,
    model: ModelChoice,
) -> Result<PredictionResult, RequestFailure> {
    let url = api::predict_url(&config.base_url, model);

    let form = FormData::new().map_err(js_failure)?;
    form.append_with_blob_and_filename(FILE_FIELD, &image_blob(image)?, &image.file_name)
        .map_err(js_failure)?;

    // Content-Typeはブラウザがboundary付きで設定する
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_failure)?;

    let window = web_sys::window().ok_or_else(|| RequestFailure::new("window is not available"))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_rejection)?;
    let resp: Response = resp_value.dyn_into().map_err(js_failure)?;

    let body = response_text(&resp).await?;

    if !resp.ok() {
        return Err(api::failure_from_status(resp.status(), &body));
    }

    api::parse_prediction(&body)
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use image_classify_common::PREDICTION_FAILED;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_image_blob_keeps_type_and_size() {
        let image = SelectedImage::from_bytes("cat.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 1, 2, 3]);

        let blob = image_blob(&image).expect("Blob creation failed");
        assert_eq!(blob.type_(), "image/jpeg");
        assert_eq!(blob.size() as usize, image.len());
    }

    #[wasm_bindgen_test]
    fn wasm_js_failure_takes_error_message() {
        let failure = js_failure(js_sys::Error::new("timeout").into());
        assert_eq!(failure.message.as_deref(), Some("timeout"));
    }

    #[wasm_bindgen_test]
    fn wasm_js_failure_takes_thrown_string() {
        let failure = js_failure(JsValue::from_str("aborted"));
        assert_eq!(failure.message.as_deref(), Some("aborted"));
    }

    #[wasm_bindgen_test]
    fn wasm_js_failure_without_message() {
        let failure = js_failure(JsValue::NULL);
        assert_eq!(failure.display_message(), PREDICTION_FAILED);
    }

    #[wasm_bindgen_test]
    fn wasm_fetch_rejection_uses_fallback() {
        let failure = fetch_rejection(js_sys::TypeError::new("Failed to fetch").into());
        assert!(failure.message.is_none());
        assert_eq!(failure.display_message(), PREDICTION_FAILED);
    }
}
