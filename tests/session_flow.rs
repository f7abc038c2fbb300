//! Session lifecycle against a mock backend
//!
//! Covers cookie-carrying login, rehydration, rejected credentials, and
//! the logout-always-clears rule.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Json;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use echoface::api::ApiClient;
use echoface::config::ClientConfig;
use echoface::session::{SessionManager, SessionStatus};

const SESSION_COOKIE: &str = "session=tok42";

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    let username = body.get("username").and_then(|v| v.as_str());
    let password = body.get("password").and_then(|v| v.as_str());

    if username == Some("ana") && password == Some("secret") {
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({
                "message": "Login successful",
                "user": {"id": 7, "username": "ana"}
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        )
            .into_response()
    }
}

async fn current_user(headers: HeaderMap) -> impl IntoResponse {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.contains(SESSION_COOKIE))
        .unwrap_or(false);

    if has_session {
        (
            StatusCode::OK,
            Json(json!({"user": {"id": 7, "username": "ana"}})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Not authenticated"})),
        )
            .into_response()
    }
}

async fn broken_logout() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Session store exploded"})),
    )
}

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/current_user", get(current_user))
        .route("/api/logout", post(broken_logout));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn manager_for(addr: SocketAddr) -> SessionManager {
    let config = ClientConfig::default().with_base_url(format!("http://{}", addr));
    SessionManager::new(Arc::new(ApiClient::new(&config).unwrap()))
}

#[tokio::test]
async fn test_login_establishes_session() {
    let addr = start_server().await;
    let manager = manager_for(addr);

    let identity = manager.login("ana", "secret").await.unwrap();
    assert_eq!(identity.id, 7);
    assert_eq!(identity.username, "ana");
    assert_eq!(manager.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn test_rehydrate_carries_login_cookie() {
    let addr = start_server().await;
    let manager = manager_for(addr);

    manager.login("ana", "secret").await.unwrap();

    // A fresh session check on the same client must reuse the cookie
    manager.rehydrate().await;
    assert_eq!(manager.status(), SessionStatus::Authenticated);
    assert_eq!(manager.identity().unwrap().username, "ana");
}

#[tokio::test]
async fn test_rejected_credentials_surface_server_message() {
    let addr = start_server().await;
    let manager = manager_for(addr);

    let err = manager.login("ana", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid username or password");
    assert_eq!(manager.status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_rehydrate_without_cookie_fails_open() {
    let addr = start_server().await;
    let manager = manager_for(addr);

    manager.rehydrate().await;
    assert_eq!(manager.status(), SessionStatus::Anonymous);
    assert!(manager.identity().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_despite_server_error() {
    let addr = start_server().await;
    let manager = manager_for(addr);

    manager.login("ana", "secret").await.unwrap();
    assert_eq!(manager.status(), SessionStatus::Authenticated);

    // The backend fails the logout, the local session clears anyway
    manager.logout().await;
    assert_eq!(manager.status(), SessionStatus::Anonymous);
    assert!(manager.identity().is_none());
}
