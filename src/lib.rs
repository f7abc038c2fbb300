pub mod api;
pub mod capability;
pub mod config;
pub mod gate;
pub mod health;
pub mod pipeline;
pub mod playback;
pub mod session;
pub mod transfer;
pub mod ui;
pub mod worker;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EchofaceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<reqwest::Error> for EchofaceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            EchofaceError::Decode(e.to_string())
        } else {
            EchofaceError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EchofaceError {
    fn from(e: serde_json::Error) -> Self {
        EchofaceError::Decode(e.to_string())
    }
}

impl From<base64::DecodeError> for EchofaceError {
    fn from(e: base64::DecodeError) -> Self {
        EchofaceError::Decode(e.to_string())
    }
}

impl EchofaceError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Bad input, fixable by the user
            EchofaceError::Validation(_) => true,
            // Typically transient
            EchofaceError::Network(_) => true,
            EchofaceError::ServiceUnavailable(_) => true,
            EchofaceError::Backend(_) => true,
            EchofaceError::Decode(_) => true,
            EchofaceError::Playback(_) => true,
            // These require fixing the setup or restarting
            EchofaceError::Config(_) => false,
            EchofaceError::Channel(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            EchofaceError::Validation(msg) => msg.clone(),
            EchofaceError::Network(_) => {
                "Cannot connect to the server. Please make sure the backend server is running."
                    .to_string()
            }
            EchofaceError::ServiceUnavailable(_) => {
                "The service is currently unavailable. Please try again later.".to_string()
            }
            EchofaceError::Backend(msg) => msg.clone(),
            EchofaceError::Decode(_) => {
                "Received a malformed response from the server. Please try again.".to_string()
            }
            EchofaceError::Playback(_) => {
                "Audio playback failed. Please check your output device.".to_string()
            }
            EchofaceError::Config(_) => "Configuration error. Please check settings.".to_string(),
            EchofaceError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EchofaceError>;
