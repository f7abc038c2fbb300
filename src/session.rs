//! Session lifecycle management
//!
//! One `SessionManager` instance per running client holds the
//! authenticated-identity state. All mutation goes through
//! `rehydrate` / `login` / `logout`; each transition is applied under a
//! single lock so callers never observe a half-applied state.

use crate::api::types::{LoginRequest, UserIdentity};
use crate::api::ApiClient;
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication status of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No authenticated user
    Anonymous,
    /// A "who am I" query is in flight
    Checking,
    /// A user is signed in
    Authenticated,
}

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub identity: Option<UserIdentity>,
}

struct SessionState {
    status: SessionStatus,
    identity: Option<UserIdentity>,
}

pub struct SessionManager {
    client: Arc<ApiClient>,
    state: Arc<Mutex<SessionState>>,
}

impl SessionManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SessionState {
                status: SessionStatus::Anonymous,
                identity: None,
            })),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.state.lock().identity.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            status: state.status,
            identity: state.identity.clone(),
        }
    }

    /// Ask the backend who the session cookie belongs to.
    ///
    /// Single attempt, fail-open: any failure (transport or an
    /// unauthenticated response) lands in Anonymous. Never leaves the
    /// session in Checking past the one in-flight call.
    pub async fn rehydrate(&self) {
        self.set(SessionStatus::Checking, None);

        match self.client.current_user().await {
            Ok(Some(user)) => {
                info!("Session rehydrated for {}", user.username);
                self.set(SessionStatus::Authenticated, Some(user));
            }
            Ok(None) => {
                debug!("No active session");
                self.set(SessionStatus::Anonymous, None);
            }
            Err(e) => {
                warn!("Session rehydration failed: {}", e);
                self.set(SessionStatus::Anonymous, None);
            }
        }
    }

    /// Exchange credentials with the backend, then adopt the returned
    /// identity.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let response = self
            .client
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!("Logged in as {}", response.user.username);
        self.set(SessionStatus::Authenticated, Some(response.user.clone()));
        Ok(response.user)
    }

    /// Adopt an identity already validated by the backend exchange.
    /// Trusts the caller; no independent verification.
    pub fn adopt_identity(&self, identity: UserIdentity) {
        info!("Session adopted identity {}", identity.username);
        self.set(SessionStatus::Authenticated, Some(identity));
    }

    /// Sign out. The "sign out" request outcome is ignored: local state
    /// always transitions to Anonymous so the client cannot get stuck
    /// looking authenticated after a failed network call.
    pub async fn logout(&self) {
        if let Err(e) = self.client.logout().await {
            warn!("Logout request failed, clearing session anyway: {}", e);
        } else {
            info!("Logged out");
        }
        self.set(SessionStatus::Anonymous, None);
    }

    fn set(&self, status: SessionStatus, identity: Option<UserIdentity>) {
        // identity is non-null iff authenticated
        debug_assert_eq!(identity.is_some(), status == SessionStatus::Authenticated);
        let mut state = self.state.lock();
        state.status = status;
        state.identity = identity;
    }
}
