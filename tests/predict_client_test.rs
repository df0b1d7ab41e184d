//! 推論サービスとの通信テスト
//!
//! tiny_httpのモックサーバーに対してリクエスト内容とエラー処理を検証

use image_classify::client::PredictClient;
use image_classify::image_file::load_image;
use image_classify::session::Session;
use image_classify_common::{ModelChoice, SelectedImage, StateKind, PREDICTION_FAILED};
use std::io::Read;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;
use tiny_http::{Header, Response, Server};

const CAT_DOG: &str = r#"{
    "model_type": "resnet152",
    "predictions": [
        {"class_name": "cat", "confidence": 0.91},
        {"class_name": "dog", "confidence": 0.05}
    ]
}"#;

/// モックサーバーが受け取ったリクエスト
struct Captured {
    method: String,
    url: String,
    content_type: String,
    body: Vec<u8>,
}

/// 1回だけ応答するモックサーバーを起動
fn mock_server(status: u16, body: &'static str, delay: Duration) -> (String, mpsc::Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").expect("Failed to bind mock server");
    let addr = server.server_addr().to_ip().expect("Mock server has no IP address");
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let mut bytes = Vec::new();
            let _ = request.as_reader().read_to_end(&mut bytes);
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();

            let _ = tx.send(Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body: bytes,
            });

            std::thread::sleep(delay);

            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
            let _ = request.respond(response);
        }
    });

    (format!("http://{}", addr), rx)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    bytes.extend((0..len - bytes.len()).map(|i| (i % 251) as u8));
    bytes
}

fn small_image() -> SelectedImage {
    SelectedImage::from_bytes("cat.jpg", jpeg_bytes(64))
}

/// 10KBのJPEGを選択→既定モデルで予測→2件の結果
#[tokio::test]
async fn test_end_to_end_resnet152() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cat.jpg");
    let bytes = jpeg_bytes(10 * 1024);
    std::fs::write(&path, &bytes).unwrap();

    let (base_url, captured) = mock_server(200, CAT_DOG, Duration::ZERO);
    let mut session = Session::new(PredictClient::new(base_url).unwrap());
    assert_eq!(session.state().model(), ModelChoice::Resnet152);

    let image = load_image(&path).await.expect("画像読み込み失敗");
    assert_eq!(image.mime_type, "image/jpeg");
    session.select_file(image).await;

    let state = session.submit().await;
    let result = state.result().expect("予測結果がありません");
    assert_eq!(result.model_type, "resnet152");
    assert_eq!(result.predictions.len(), 2);
    assert_eq!(result.predictions[0].class_name, "cat");
    assert_eq!(result.predictions[0].percent_label(), "91.00%");
    assert_eq!(result.predictions[1].class_name, "dog");
    assert_eq!(result.predictions[1].percent_label(), "5.00%");

    assert_eq!(
        session.trace(),
        &[StateKind::Idle, StateKind::FileSelected, StateKind::Loading, StateKind::ResultReady]
    );

    let request = captured.recv_timeout(Duration::from_secs(5)).expect("リクエストが届いていません");
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/predict/resnet152");
    assert!(request.content_type.starts_with("multipart/form-data"));
    assert!(contains(&request.body, b"name=\"file\""));
    assert!(contains(&request.body, b"filename=\"cat.jpg\""));
    assert!(contains(&request.body, &bytes));
}

/// モデルはURLパスで渡す
#[tokio::test]
async fn test_vit_model_in_path() {
    let (base_url, captured) = mock_server(200, CAT_DOG, Duration::ZERO);
    let client = PredictClient::new(format!("{}/", base_url)).unwrap();

    let result = client.predict(&small_image(), ModelChoice::Vit).await;
    assert!(result.is_ok());

    let request = captured.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(request.url, "/predict/vit");
}

/// FastAPIのdetailをそのまま表示
#[tokio::test]
async fn test_server_error_detail() {
    let (base_url, _captured) = mock_server(
        500,
        r#"{"detail": "Prediction failed: CUDA out of memory"}"#,
        Duration::ZERO,
    );
    let mut session = Session::new(PredictClient::new(base_url).unwrap());
    session.select_file(small_image()).await;

    let state = session.submit().await;
    assert_eq!(state.error(), Some("Prediction failed: CUDA out of memory"));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_server_error_without_detail() {
    let (base_url, _captured) = mock_server(502, "Bad Gateway", Duration::ZERO);
    let client = PredictClient::new(base_url).unwrap();

    let failure = client.predict(&small_image(), ModelChoice::Resnet152).await.unwrap_err();
    assert_eq!(failure.display_message(), "Request failed with status code 502");
}

/// 形の合わないレスポンスも通信エラーと同じ扱い
#[tokio::test]
async fn test_malformed_response() {
    let (base_url, _captured) = mock_server(200, r#"{"label": "cat"}"#, Duration::ZERO);
    let mut session = Session::new(PredictClient::new(base_url).unwrap());
    session.select_file(small_image()).await;

    let state = session.submit().await;
    assert_eq!(state.kind(), StateKind::Errored);
    assert!(state.error().unwrap().starts_with("Invalid response"));
}

/// サーバー未起動なら既定メッセージ
#[tokio::test]
async fn test_connection_refused_uses_fallback() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut session = Session::new(PredictClient::new(format!("http://127.0.0.1:{}", port)).unwrap());
    session.select_file(small_image()).await;

    let state = session.submit().await;
    assert_eq!(state.error(), Some(PREDICTION_FAILED));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_timeout_message() {
    let (base_url, _captured) = mock_server(200, CAT_DOG, Duration::from_secs(3));
    let client = PredictClient::with_timeout(base_url, Some(Duration::from_millis(300))).unwrap();
    let mut session = Session::new(client);
    session.select_file(small_image()).await;

    let state = session.submit().await;
    assert_eq!(state.error(), Some("timeout"));
}

#[tokio::test]
async fn test_health() {
    let (base_url, captured) = mock_server(200, r#"{"status": "ok"}"#, Duration::ZERO);
    let client = PredictClient::new(base_url).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.is_ok());

    let request = captured.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/health");
}
