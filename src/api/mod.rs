pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    ContactRequest, HealthResponse, HistoryEntry, LoginRequest, LoginResponse, MessageResponse,
    SignupRequest, UserIdentity,
};
