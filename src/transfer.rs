//! Transfer encoding utilities
//!
//! Binary payloads cross the wire as base64 text; decoded results are
//! addressed locally through revocable `mem://` URLs backed by an
//! in-process store.

use crate::{EchofaceError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Encode a binary buffer as base64 transfer text
pub fn encode(buffer: &[u8]) -> String {
    STANDARD.encode(buffer)
}

/// Decode base64 transfer text back into a binary buffer
pub fn decode(transfer_text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(transfer_text)
        .map_err(|e| EchofaceError::Decode(format!("Invalid base64 payload: {}", e)))
}

struct EphemeralEntry {
    bytes: Arc<Vec<u8>>,
    mime: String,
}

/// Registry of transient in-memory resources addressed by `mem://` URLs.
///
/// URLs must be released exactly once by their owner; releasing an already
/// released (or unknown) URL is a no-op.
#[derive(Default)]
pub struct EphemeralStore {
    entries: Mutex<HashMap<String, EphemeralEntry>>,
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a buffer and return a revocable URL for it
    pub fn to_ephemeral_url(&self, bytes: Vec<u8>, mime: impl Into<String>) -> String {
        let url = format!("mem://{}", Uuid::new_v4());
        self.entries.lock().insert(
            url.clone(),
            EphemeralEntry {
                bytes: Arc::new(bytes),
                mime: mime.into(),
            },
        );
        debug!("Created ephemeral resource {}", url);
        url
    }

    /// Resolve a URL to its buffer and MIME type
    pub fn resolve(&self, url: &str) -> Option<(Arc<Vec<u8>>, String)> {
        self.entries
            .lock()
            .get(url)
            .map(|e| (Arc::clone(&e.bytes), e.mime.clone()))
    }

    /// Release a URL, dropping the backing buffer. Idempotent.
    pub fn release(&self, url: &str) {
        if self.entries.lock().remove(url).is_some() {
            debug!("Released ephemeral resource {}", url);
        }
    }

    /// Number of live resources
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
