//! Client configuration
//!
//! Centralized configuration for the backend connection and probing policy.

use std::time::Duration;

/// Configuration for the Echoface client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the backend server
    pub base_url: String,

    /// Timeout applied to every backend request
    pub request_timeout: Duration,

    /// Delay between health probe attempts
    pub probe_retry_delay: Duration,

    /// Maximum number of health probe attempts before settling unavailable
    pub probe_max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            probe_retry_delay: Duration::from_millis(2000),
            probe_max_attempts: 3,
        }
    }
}

impl ClientConfig {
    /// Set the backend base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the health probing policy
    pub fn with_probe_policy(mut self, retry_delay: Duration, max_attempts: u32) -> Self {
        self.probe_retry_delay = retry_delay;
        self.probe_max_attempts = max_attempts;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL is required".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("Base URL must be http(s): {}", self.base_url));
        }
        if self.probe_max_attempts == 0 {
            return Err("At least one probe attempt is required".to_string());
        }
        Ok(())
    }
}
