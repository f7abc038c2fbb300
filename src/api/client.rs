//! HTTP client for the backend service
//!
//! Thin wrapper over `reqwest` that owns the session cookie store and
//! normalizes non-2xx responses into `EchofaceError::Backend` with the
//! backend's own error message when one is present.

use crate::api::types::{
    ContactRequest, CurrentUserResponse, ErrorResponse, HealthResponse, HistoryEntry,
    LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserIdentity,
};
use crate::config::ClientConfig;
use crate::{EchofaceError, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from the given configuration.
    ///
    /// The underlying cookie store carries the backend session across
    /// requests; callers never touch the cookie directly.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate().map_err(EchofaceError::Config)?;

        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EchofaceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into the success body or a `Backend` error carrying
    /// the server's message; a body that cannot be parsed falls back to a
    /// message synthesized from the status code.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body
                .error
                .or(body.details)
                .unwrap_or_else(|| synthesized_message(status)),
            Err(_) => synthesized_message(status),
        };

        Err(EchofaceError::Backend(message))
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse> {
        debug!("POST /api/signup for {}", request.username);
        let response = self
            .http
            .post(self.url("/api/signup"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        debug!("POST /api/login for {}", request.username);
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn logout(&self) -> Result<MessageResponse> {
        debug!("POST /api/logout");
        let response = self.http.post(self.url("/api/logout")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// "Who am I" query. `Ok(None)` means the backend does not recognize
    /// the session; only transport failures surface as errors.
    pub async fn current_user(&self) -> Result<Option<UserIdentity>> {
        debug!("GET /api/current_user");
        let response = self.http.get(self.url("/api/current_user")).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let body: CurrentUserResponse = response.json().await?;
        Ok(Some(body.user))
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        debug!("GET /api/history");
        let response = self.http.get(self.url("/api/history")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn contact(&self, request: &ContactRequest) -> Result<MessageResponse> {
        debug!("POST /api/contact");
        let response = self
            .http
            .post(self.url("/api/contact"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        debug!("GET /api/health");
        let response = self.http.get(self.url("/api/health")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Submit a multipart form to a capability endpoint and return the raw
    /// JSON body. Capability descriptors own the parsing.
    pub async fn post_multipart(&self, endpoint: &str, form: Form) -> Result<serde_json::Value> {
        debug!("POST {} (multipart)", endpoint);
        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

fn synthesized_message(status: StatusCode) -> String {
    format!("HTTP error! status: {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = ClientConfig::default().with_base_url("http://localhost:5000/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_base_url("");
        assert!(matches!(
            ApiClient::new(&config),
            Err(EchofaceError::Config(_))
        ));
    }

    #[test]
    fn test_synthesized_message() {
        assert_eq!(
            synthesized_message(StatusCode::SERVICE_UNAVAILABLE),
            "HTTP error! status: 503"
        );
    }
}
