//! Backend worker for the UI
//!
//! Provides a channel-based interface between the egui thread and the
//! async orchestration core. Commands go in, events come out; the worker
//! thread owns the tokio runtime, the API client, the session manager,
//! the availability monitor and one pipeline per capability.

use crate::api::types::{ContactRequest, HistoryEntry, SignupRequest};
use crate::api::ApiClient;
use crate::capability::{
    face_compare_request, text_to_speech_request, voice_clone_request, CapabilityKind,
    FaceCompare, TextToSpeech, VoiceClone,
};
use crate::config::ClientConfig;
use crate::health::{AvailabilityMonitor, AvailabilityState, HealthStatus};
use crate::pipeline::{BinaryPayload, Capability, MediaRequest, MediaRequestPipeline, MediaResult};
use crate::session::{SessionManager, SessionSnapshot};
use crate::{EchofaceError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

/// Commands that can be sent to the client worker
#[derive(Debug, Clone)]
pub enum ClientCommand {
    /// Ask the backend who the stored session cookie belongs to
    Rehydrate,

    /// Exchange credentials for a session
    Login { username: String, password: String },

    /// Create an account
    Signup {
        username: String,
        email: String,
        password: String,
        confirm_password: String,
    },

    /// Sign out (always honored locally)
    Logout,

    /// Compare two face images
    CompareFaces {
        image1: BinaryPayload,
        image2: BinaryPayload,
    },

    /// Synthesize speech from text
    Synthesize { text: String, voice: String },

    /// Synthesize speech in the voice of a reference recording
    CloneVoice {
        reference_audio: BinaryPayload,
        text: String,
    },

    /// Fetch the user's request history
    FetchHistory,

    /// Send the contact form
    SendContact {
        name: String,
        email: String,
        message: String,
    },

    /// Start (or restart) a health probe cycle
    CheckHealth,

    /// Shut down the worker
    Shutdown,
}

/// Events emitted by the client worker
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Session state changed
    Session(SessionSnapshot),

    /// Login or signup was rejected
    AuthFailed(String),

    /// Account created; the auth view should switch to login
    SignupComplete(String),

    /// A capability request finished
    Media {
        kind: CapabilityKind,
        result: MediaResult,
    },

    /// A capability request failed
    MediaFailed { kind: CapabilityKind, error: String },

    /// History fetched
    History(Vec<HistoryEntry>),

    /// History could not be fetched
    HistoryFailed(String),

    /// Contact form delivered
    ContactSent(String),

    /// Contact form rejected
    ContactFailed(String),

    /// Worker has shut down
    Shutdown,
}

/// Client worker with channel-based communication
pub struct ClientWorker {
    config: ClientConfig,
    command_tx: Sender<ClientCommand>,
    command_rx: Receiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
    event_rx: Receiver<ClientEvent>,
    health_tx: Sender<HealthStatus>,
    health_rx: Receiver<HealthStatus>,
}

impl ClientWorker {
    pub fn new(config: ClientConfig) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);
        let (health_tx, health_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            health_tx,
            health_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<ClientCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<ClientEvent> {
        self.event_rx.clone()
    }

    /// Get a receiver for availability updates
    pub fn health_receiver(&self) -> Receiver<HealthStatus> {
        self.health_rx.clone()
    }

    /// Start the worker thread.
    ///
    /// Session operations run in command order; capability requests are
    /// spawned so independent pipelines stay independent.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();
        let health_tx = self.health_tx.clone();

        std::thread::Builder::new()
            .name("echoface-client".to_string())
            .spawn(move || {
                info!("Client worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(ClientEvent::Shutdown);
                        return;
                    }
                };

                let client = match ApiClient::new(&config) {
                    Ok(client) => Arc::new(client),
                    Err(e) => {
                        error!("Failed to build API client: {}", e);
                        let _ = event_tx.send(ClientEvent::Shutdown);
                        return;
                    }
                };

                let session = SessionManager::new(Arc::clone(&client));
                let monitor =
                    AvailabilityMonitor::new(Arc::clone(&client), &config).with_updates(health_tx);

                let face = Arc::new(MediaRequestPipeline::new(FaceCompare, Arc::clone(&client)));
                let tts = Arc::new(MediaRequestPipeline::new(TextToSpeech, Arc::clone(&client)));
                let clone = Arc::new(MediaRequestPipeline::new(VoiceClone, Arc::clone(&client)));

                info!("Client worker ready (backend {})", client.base_url());

                loop {
                    match command_rx.recv() {
                        Ok(ClientCommand::Rehydrate) => {
                            runtime.block_on(session.rehydrate());
                            let _ = event_tx.send(ClientEvent::Session(session.snapshot()));
                        }

                        Ok(ClientCommand::Login { username, password }) => {
                            match runtime.block_on(session.login(&username, &password)) {
                                Ok(_) => {
                                    let _ =
                                        event_tx.send(ClientEvent::Session(session.snapshot()));
                                }
                                Err(e) => {
                                    warn!("Login failed: {}", e);
                                    let _ =
                                        event_tx.send(ClientEvent::AuthFailed(e.user_message()));
                                }
                            }
                        }

                        Ok(ClientCommand::Signup {
                            username,
                            email,
                            password,
                            confirm_password,
                        }) => {
                            if password != confirm_password {
                                let _ = event_tx.send(ClientEvent::AuthFailed(
                                    "Passwords do not match.".to_string(),
                                ));
                                continue;
                            }
                            let request = SignupRequest {
                                username,
                                email,
                                password,
                            };
                            match runtime.block_on(client.signup(&request)) {
                                Ok(response) => {
                                    let message = response.message.unwrap_or_else(|| {
                                        "Signup successful! You can now log in.".to_string()
                                    });
                                    let _ = event_tx.send(ClientEvent::SignupComplete(message));
                                }
                                Err(e) => {
                                    warn!("Signup failed: {}", e);
                                    let _ =
                                        event_tx.send(ClientEvent::AuthFailed(e.user_message()));
                                }
                            }
                        }

                        Ok(ClientCommand::Logout) => {
                            runtime.block_on(session.logout());
                            let _ = event_tx.send(ClientEvent::Session(session.snapshot()));
                        }

                        Ok(ClientCommand::CompareFaces { image1, image2 }) => {
                            if backend_down(&monitor, CapabilityKind::FaceCompare, &event_tx) {
                                continue;
                            }
                            let request = face_compare_request(image1, image2);
                            spawn_media(
                                &runtime,
                                Arc::clone(&face),
                                request,
                                CapabilityKind::FaceCompare,
                                event_tx.clone(),
                            );
                        }

                        Ok(ClientCommand::Synthesize { text, voice }) => {
                            if backend_down(&monitor, CapabilityKind::TextToSpeech, &event_tx) {
                                continue;
                            }
                            let request = text_to_speech_request(text, voice);
                            spawn_media(
                                &runtime,
                                Arc::clone(&tts),
                                request,
                                CapabilityKind::TextToSpeech,
                                event_tx.clone(),
                            );
                        }

                        Ok(ClientCommand::CloneVoice {
                            reference_audio,
                            text,
                        }) => {
                            if backend_down(&monitor, CapabilityKind::VoiceClone, &event_tx) {
                                continue;
                            }
                            let request = voice_clone_request(reference_audio, text);
                            spawn_media(
                                &runtime,
                                Arc::clone(&clone),
                                request,
                                CapabilityKind::VoiceClone,
                                event_tx.clone(),
                            );
                        }

                        Ok(ClientCommand::FetchHistory) => {
                            let client = Arc::clone(&client);
                            let event_tx = event_tx.clone();
                            let _guard = runtime.enter();
                            tokio::spawn(async move {
                                let event = match client.history().await {
                                    Ok(entries) => ClientEvent::History(entries),
                                    Err(e) => ClientEvent::HistoryFailed(e.user_message()),
                                };
                                let _ = event_tx.send(event);
                            });
                        }

                        Ok(ClientCommand::SendContact {
                            name,
                            email,
                            message,
                        }) => {
                            let request = ContactRequest {
                                name,
                                email,
                                message,
                            };
                            match runtime.block_on(client.contact(&request)) {
                                Ok(response) => {
                                    let message = response.message.unwrap_or_else(|| {
                                        "Thank you for your message! We will get back to you soon."
                                            .to_string()
                                    });
                                    let _ = event_tx.send(ClientEvent::ContactSent(message));
                                }
                                Err(e) => {
                                    let _ =
                                        event_tx.send(ClientEvent::ContactFailed(e.user_message()));
                                }
                            }
                        }

                        Ok(ClientCommand::CheckHealth) => {
                            let _guard = runtime.enter();
                            monitor.start();
                        }

                        Ok(ClientCommand::Shutdown) => {
                            info!("Client worker shutting down");
                            monitor.dispose();
                            let _ = event_tx.send(ClientEvent::Shutdown);
                            break;
                        }

                        Err(e) => {
                            error!("Command channel error: {}", e);
                            break;
                        }
                    }
                }

                runtime.shutdown_background();
                info!("Client worker stopped");
            })
            .map_err(|e| EchofaceError::Channel(format!("Failed to spawn worker thread: {}", e)))?;

        Ok(())
    }
}

/// Reject a media command outright once the probe budget is exhausted.
/// A fresh `CheckHealth` re-arms the monitor.
fn backend_down(
    monitor: &AvailabilityMonitor,
    kind: CapabilityKind,
    event_tx: &Sender<ClientEvent>,
) -> bool {
    if monitor.status().state != AvailabilityState::Unavailable {
        return false;
    }

    warn!("{} rejected: backend unavailable", kind.label());
    let error = EchofaceError::ServiceUnavailable("probe budget exhausted".to_string());
    let _ = event_tx.send(ClientEvent::MediaFailed {
        kind,
        error: error.user_message(),
    });
    true
}

fn spawn_media<C: Capability>(
    runtime: &Runtime,
    pipeline: Arc<MediaRequestPipeline<C>>,
    request: MediaRequest,
    kind: CapabilityKind,
    event_tx: Sender<ClientEvent>,
) {
    let _guard = runtime.enter();
    tokio::spawn(async move {
        let event = match pipeline.submit(request).await {
            Ok(result) => ClientEvent::Media { kind, result },
            Err(e) => ClientEvent::MediaFailed {
                kind,
                error: e.user_message(),
            },
        };
        let _ = event_tx.send(event);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_creation() {
        let worker = ClientWorker::new(ClientConfig::default());

        let _cmd_tx = worker.command_sender();
        let _event_rx = worker.event_receiver();
        let _health_rx = worker.health_receiver();
    }

    #[test]
    fn test_worker_shutdown() {
        let worker = ClientWorker::new(
            ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        );
        let command_tx = worker.command_sender();
        let event_rx = worker.event_receiver();

        worker.start_worker().unwrap();
        command_tx.send(ClientCommand::Shutdown).unwrap();

        let event = event_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert!(matches!(event, ClientEvent::Shutdown));
    }

    #[test]
    fn test_signup_password_mismatch_is_local() {
        let worker = ClientWorker::new(
            ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        );
        let command_tx = worker.command_sender();
        let event_rx = worker.event_receiver();
        worker.start_worker().unwrap();

        command_tx
            .send(ClientCommand::Signup {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "one".to_string(),
                confirm_password: "two".to_string(),
            })
            .unwrap();

        let event = event_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        match event {
            ClientEvent::AuthFailed(message) => {
                assert_eq!(message, "Passwords do not match.")
            }
            other => panic!("Unexpected event: {:?}", other),
        }

        command_tx.send(ClientCommand::Shutdown).unwrap();
    }
}
