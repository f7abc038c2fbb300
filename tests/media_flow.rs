//! Capability pipelines against a mock backend
//!
//! Exercises the full request path: multipart encoding, response
//! parsing, 2xx error bodies, and the single-in-flight rule.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Json;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tokio::net::TcpListener;

use echoface::api::ApiClient;
use echoface::capability::face::face_compare_request;
use echoface::capability::speech::text_to_speech_request;
use echoface::capability::{FaceCompare, TextToSpeech};
use echoface::config::ClientConfig;
use echoface::pipeline::{MediaRequestPipeline, MediaResult, PipelineState};

const FAKE_WAV: &[u8] = b"RIFF....WAVEfmt fake";

type Counter = Arc<AtomicUsize>;

async fn face_ok(State(counter): State<Counter>, mut multipart: Multipart) -> impl IntoResponse {
    counter.fetch_add(1, Ordering::SeqCst);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        fields.push(field.name().unwrap_or("").to_string());
        field.bytes().await.unwrap();
    }
    assert_eq!(fields, vec!["image1", "image2"]);

    Json(json!({
        "match": true,
        "confidence": {"l2_score": 0.42, "cosine_score": 0.91}
    }))
}

async fn face_soft_error(
    State(counter): State<Counter>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    counter.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.unwrap() {
        field.bytes().await.unwrap();
    }

    // Failure reported inside a 200 body
    Json(json!({"error": "No face detected in one or both images"}))
}

async fn tts_ok(State(counter): State<Counter>, mut multipart: Multipart) -> impl IntoResponse {
    counter.fetch_add(1, Ordering::SeqCst);

    let mut text = None;
    let mut voice = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        let value = field.text().await.unwrap();
        match name.as_str() {
            "text" => text = Some(value),
            "voice" => voice = Some(value),
            _ => {}
        }
    }
    assert_eq!(text.as_deref(), Some("hello"));
    assert_eq!(voice.as_deref(), Some("af_heart"));

    Json(json!({"audio": STANDARD.encode(FAKE_WAV)}))
}

async fn tts_slow(State(counter): State<Counter>, mut multipart: Multipart) -> impl IntoResponse {
    counter.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.unwrap() {
        field.bytes().await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({"audio": STANDARD.encode(FAKE_WAV)}))
}

async fn always_503(State(counter): State<Counter>) -> impl IntoResponse {
    counter.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn start_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> Arc<ApiClient> {
    let config = ClientConfig::default().with_base_url(format!("http://{}", addr));
    Arc::new(ApiClient::new(&config).unwrap())
}

fn jpeg(name: &str) -> echoface::pipeline::BinaryPayload {
    echoface::pipeline::BinaryPayload::new(name, "image/jpeg", vec![0xff, 0xd8, 0xff])
}

#[tokio::test]
async fn test_face_compare_success() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/face-detection", post(face_ok))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = MediaRequestPipeline::new(FaceCompare, client_for(addr));
    let result = pipeline
        .submit(face_compare_request(jpeg("a.jpg"), jpeg("b.jpg")))
        .await
        .unwrap();

    assert_eq!(
        result,
        MediaResult::FaceCompare {
            matched: true,
            l2_score: 0.42,
            cosine_score: 0.91,
        }
    );
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(matches!(pipeline.state(), PipelineState::Succeeded(_)));
}

#[tokio::test]
async fn test_error_inside_success_body_fails_the_request() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/face-detection", post(face_soft_error))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = MediaRequestPipeline::new(FaceCompare, client_for(addr));
    let err = pipeline
        .submit(face_compare_request(jpeg("a.jpg"), jpeg("b.jpg")))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "No face detected in one or both images");
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}

#[tokio::test]
async fn test_text_to_speech_decodes_audio() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/tts", post(tts_ok))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = MediaRequestPipeline::new(TextToSpeech, client_for(addr));
    let result = pipeline
        .submit(text_to_speech_request("hello", "af_heart"))
        .await
        .unwrap();

    match result {
        MediaResult::Speech { audio, mime } => {
            assert_eq!(audio, FAKE_WAV);
            assert_eq!(mime, "audio/wav");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_request_makes_no_network_call() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/tts", post(tts_ok))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = MediaRequestPipeline::new(TextToSpeech, client_for(addr));
    let err = pipeline
        .submit(text_to_speech_request("   ", "af_heart"))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Please enter some text to convert to speech."
    );
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_status_code_without_body_synthesizes_message() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/face-detection", post(always_503))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = MediaRequestPipeline::new(FaceCompare, client_for(addr));
    let err = pipeline
        .submit(face_compare_request(jpeg("a.jpg"), jpeg("b.jpg")))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "HTTP error! status: 503");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_submit_rejected_while_in_flight() {
    let counter: Counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/tts", post(tts_slow))
        .with_state(counter.clone());
    let addr = start_server(app).await;

    let pipeline = Arc::new(MediaRequestPipeline::new(TextToSpeech, client_for(addr)));

    let first = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            pipeline
                .submit(text_to_speech_request("hello", "af_heart"))
                .await
        })
    };

    // Wait until the first request is past encoding
    let mut waited = Duration::ZERO;
    while !pipeline.state().is_in_flight() && waited < Duration::from_secs(2) {
        tokio::time::sleep(Duration::from_millis(5)).await;
        waited += Duration::from_millis(5);
    }
    assert!(pipeline.state().is_in_flight());

    let err = pipeline
        .submit(text_to_speech_request("another", "af_heart"))
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "A request is already being processed. Please wait for it to finish."
    );

    // The first request still completes normally
    let result = first.await.unwrap().unwrap();
    assert!(matches!(result, MediaResult::Speech { .. }));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
