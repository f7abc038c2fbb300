//! Backend availability monitoring
//!
//! Probes `/api/health` with bounded retry: up to `probe_max_attempts`
//! attempts spaced `probe_retry_delay` apart, settling Unavailable after
//! the last failure. A success on any attempt stops probing immediately
//! and replaces the capability flags with the probe's response. The probe
//! loop runs as a cancelable task owned by the monitor, so disposing the
//! monitor can never leave a timer firing into a torn-down consumer.

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reachability of the backend service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityState {
    /// No probe has completed yet
    Unknown,
    /// A probe cycle is in progress
    Probing,
    /// The service answered a probe
    Available,
    /// The retry budget was exhausted without an answer
    Unavailable,
}

/// Availability plus per-capability flags from the last successful probe.
///
/// A reachable service with a capability flagged off is still Available;
/// "service reachable" and "specific feature usable" are separate signals.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub state: AvailabilityState,
    pub capabilities: HashMap<String, bool>,
}

impl HealthStatus {
    fn unknown() -> Self {
        Self {
            state: AvailabilityState::Unknown,
            capabilities: HashMap::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == AvailabilityState::Available
    }

    /// Whether a named capability was reported usable. Unreported
    /// capabilities count as unusable.
    pub fn capability(&self, name: &str) -> bool {
        self.capabilities.get(name).copied().unwrap_or(false)
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

pub struct AvailabilityMonitor {
    client: Arc<ApiClient>,
    retry_delay: Duration,
    max_attempts: u32,
    status: Arc<Mutex<HealthStatus>>,
    updates: Option<Sender<HealthStatus>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AvailabilityMonitor {
    pub fn new(client: Arc<ApiClient>, config: &ClientConfig) -> Self {
        Self {
            client,
            retry_delay: config.probe_retry_delay,
            max_attempts: config.probe_max_attempts,
            status: Arc::new(Mutex::new(HealthStatus::unknown())),
            updates: None,
            task: Mutex::new(None),
        }
    }

    /// Forward every status transition to the given channel
    pub fn with_updates(mut self, updates: Sender<HealthStatus>) -> Self {
        self.updates = Some(updates);
        self
    }

    pub fn status(&self) -> HealthStatus {
        self.status.lock().clone()
    }

    /// Begin a probe cycle, replacing any cycle already running.
    ///
    /// Must be called from within a tokio runtime. After settling in
    /// Unavailable no further probes are issued until `start` is called
    /// again.
    pub fn start(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }

        let client = Arc::clone(&self.client);
        let status = Arc::clone(&self.status);
        let updates = self.updates.clone();
        let retry_delay = self.retry_delay;
        let max_attempts = self.max_attempts;

        let publish = move |status: &Arc<Mutex<HealthStatus>>,
                            updates: &Option<Sender<HealthStatus>>,
                            next: HealthStatus| {
            *status.lock() = next.clone();
            if let Some(tx) = updates {
                let _ = tx.send(next);
            }
        };

        let task = tokio::spawn(async move {
            publish(
                &status,
                &updates,
                HealthStatus {
                    state: AvailabilityState::Probing,
                    capabilities: HashMap::new(),
                },
            );

            for attempt in 1..=max_attempts {
                match client.health().await {
                    Ok(response) => {
                        info!(
                            "Health probe succeeded on attempt {} (status={})",
                            attempt, response.status
                        );
                        publish(
                            &status,
                            &updates,
                            HealthStatus {
                                state: AvailabilityState::Available,
                                capabilities: response.capabilities,
                            },
                        );
                        return;
                    }
                    Err(e) => {
                        warn!("Health probe attempt {}/{} failed: {}", attempt, max_attempts, e);
                        if attempt < max_attempts {
                            debug!("Re-probing in {:?}", retry_delay);
                            tokio::time::sleep(retry_delay).await;
                        }
                    }
                }
            }

            publish(
                &status,
                &updates,
                HealthStatus {
                    state: AvailabilityState::Unavailable,
                    capabilities: HashMap::new(),
                },
            );
        });

        *self.task.lock() = Some(task);
    }

    /// Cancel any probe cycle in flight, including a pending retry sleep
    pub fn dispose(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            debug!("Availability monitor disposed");
        }
    }
}

impl Drop for AvailabilityMonitor {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_starts_unknown() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
        let client = Arc::new(ApiClient::new(&config).unwrap());
        let monitor = AvailabilityMonitor::new(client, &config);

        let status = monitor.status();
        assert_eq!(status.state, AvailabilityState::Unknown);
        assert!(status.capabilities.is_empty());
        assert!(!status.is_available());
    }

    #[test]
    fn test_capability_defaults_to_unusable() {
        let mut status = HealthStatus::default();
        status.state = AvailabilityState::Available;
        status.capabilities.insert("tts_available".to_string(), true);

        assert!(status.capability("tts_available"));
        assert!(!status.capability("face_detection_available"));
    }

    #[tokio::test]
    async fn test_exhausted_retries_settle_unavailable() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_probe_policy(Duration::from_millis(5), 3);
        let client = Arc::new(ApiClient::new(&config).unwrap());
        let monitor = AvailabilityMonitor::new(client, &config);

        monitor.start();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(monitor.status().state, AvailabilityState::Unavailable);
    }

    #[tokio::test]
    async fn test_dispose_cancels_probe_cycle() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_probe_policy(Duration::from_secs(60), 3);
        let client = Arc::new(ApiClient::new(&config).unwrap());
        let monitor = AvailabilityMonitor::new(client, &config);

        monitor.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.dispose();

        // The first attempt failed and the retry sleep was aborted, so the
        // cycle never settles
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(monitor.status().state, AvailabilityState::Probing);
    }
}
