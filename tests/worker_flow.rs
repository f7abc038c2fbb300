//! Worker loop against a mock backend
//!
//! Drives the command channel the way the UI does and checks the events
//! that come back.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use echoface::capability::CapabilityKind;
use echoface::config::ClientConfig;
use echoface::health::AvailabilityState;
use echoface::pipeline::{BinaryPayload, MediaResult};
use echoface::session::SessionStatus;
use echoface::worker::{ClientCommand, ClientEvent, ClientWorker};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn login() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "session=tok42; Path=/")],
        Json(json!({
            "message": "Login successful",
            "user": {"id": 7, "username": "ana"}
        })),
    )
}

async fn face_detection(mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        field.bytes().await.unwrap();
    }
    Json(json!({
        "match": false,
        "confidence": {"l2_score": 1.3, "cosine_score": 0.12}
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "tts_available": true}))
}

fn start_server(runtime: &tokio::runtime::Runtime) -> SocketAddr {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/face-detection", post(face_detection))
        .route("/api/health", get(health));

    runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    })
}

fn jpeg(name: &str) -> BinaryPayload {
    BinaryPayload::new(name, "image/jpeg", vec![0xff, 0xd8, 0xff])
}

#[test]
fn test_worker_drives_login_media_and_health() {
    // The mock server needs its own runtime; the worker brings one
    let server_runtime = tokio::runtime::Runtime::new().unwrap();
    let addr = start_server(&server_runtime);

    let config = ClientConfig::default()
        .with_base_url(format!("http://{}", addr))
        .with_probe_policy(Duration::from_millis(10), 3);
    let worker = ClientWorker::new(config);
    let commands = worker.command_sender();
    let events = worker.event_receiver();
    let health_updates = worker.health_receiver();
    worker.start_worker().unwrap();

    // Login
    commands
        .send(ClientCommand::Login {
            username: "ana".to_string(),
            password: "secret".to_string(),
        })
        .unwrap();
    match events.recv_timeout(RECV_TIMEOUT).unwrap() {
        ClientEvent::Session(snapshot) => {
            assert_eq!(snapshot.status, SessionStatus::Authenticated);
            assert_eq!(snapshot.identity.unwrap().username, "ana");
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Face comparison
    commands
        .send(ClientCommand::CompareFaces {
            image1: jpeg("a.jpg"),
            image2: jpeg("b.jpg"),
        })
        .unwrap();
    match events.recv_timeout(RECV_TIMEOUT).unwrap() {
        ClientEvent::Media { kind, result } => {
            assert_eq!(kind, CapabilityKind::FaceCompare);
            assert!(matches!(result, MediaResult::FaceCompare { matched: false, .. }));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Availability probe
    commands.send(ClientCommand::CheckHealth).unwrap();
    let mut final_state = AvailabilityState::Unknown;
    let deadline = std::time::Instant::now() + RECV_TIMEOUT;
    while std::time::Instant::now() < deadline {
        match health_updates.recv_timeout(RECV_TIMEOUT).unwrap().state {
            AvailabilityState::Available => {
                final_state = AvailabilityState::Available;
                break;
            }
            state => final_state = state,
        }
    }
    assert_eq!(final_state, AvailabilityState::Available);

    // Clean shutdown
    commands.send(ClientCommand::Shutdown).unwrap();
    loop {
        match events.recv_timeout(RECV_TIMEOUT).unwrap() {
            ClientEvent::Shutdown => break,
            _ => continue,
        }
    }
}
