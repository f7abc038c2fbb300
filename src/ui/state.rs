//! Application state management
//!
//! Central state for the Echoface UI. The egui thread mutates this
//! directly; everything that touches the network goes through the client
//! worker channels and comes back as events consumed by `poll_events`.

use crate::capability::{speech, CapabilityKind};
use crate::health::HealthStatus;
use crate::pipeline::{BinaryPayload, MediaResult};
use crate::playback::PlaybackController;
use crate::session::{SessionSnapshot, SessionStatus};
use crate::transfer::EphemeralStore;
use crate::worker::{ClientCommand, ClientEvent};
use crate::api::types::HistoryEntry;
use chrono::Local;
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Views reachable from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    FaceCompare,
    TextToSpeech,
    VoiceClone,
    History,
    Contact,
    Auth,
}

/// Auth form mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

/// A transient notice shown near a form
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }
}

/// State of the authentication form
#[derive(Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub busy: bool,
    pub notice: Option<Notice>,
}

impl AuthForm {
    pub fn clear(&mut self) {
        self.username.clear();
        self.email.clear();
        self.password.clear();
        self.confirm_password.clear();
        self.notice = None;
    }
}

/// One image slot in the face comparison view
#[derive(Default)]
pub struct ImageSlot {
    pub path: String,
    pub payload: Option<BinaryPayload>,
}

/// State of the face comparison view
#[derive(Default)]
pub struct FaceCompareState {
    pub image1: ImageSlot,
    pub image2: ImageSlot,
    pub busy: bool,
    pub result: Option<MediaResult>,
    pub notice: Option<Notice>,
}

/// State of the text-to-speech view
pub struct SpeechState {
    pub text: String,
    pub voice: String,
    pub busy: bool,
    pub notice: Option<Notice>,
}

impl Default for SpeechState {
    fn default() -> Self {
        Self {
            text: String::new(),
            voice: speech::DEFAULT_VOICE.to_string(),
            busy: false,
            notice: None,
        }
    }
}

/// State of the voice cloning view
#[derive(Default)]
pub struct VoiceCloneState {
    pub reference_path: String,
    pub reference: Option<BinaryPayload>,
    pub text: String,
    pub busy: bool,
    pub notice: Option<Notice>,
}

/// State of the history view
#[derive(Default)]
pub struct HistoryState {
    pub entries: Vec<HistoryEntry>,
    pub busy: bool,
    pub notice: Option<Notice>,
}

/// State of the contact form
#[derive(Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub busy: bool,
    pub notice: Option<Notice>,
}

/// Central application state
pub struct AppState {
    /// Active view
    pub view: View,

    /// Latest session snapshot from the worker
    pub session: SessionSnapshot,

    /// Latest backend availability report
    pub health: HealthStatus,

    pub auth: AuthForm,
    pub face: FaceCompareState,
    pub speech: SpeechState,
    pub voice_clone: VoiceCloneState,
    pub history: HistoryState,
    pub contact: ContactForm,

    /// Playback for synthesized audio (speech and voice clone share it;
    /// at most one clip is ever live)
    pub playback: PlaybackController,

    /// Recent activity lines for the log panel
    pub activity_log: VecDeque<String>,

    /// Whether to show the log panel
    pub show_log_panel: bool,

    /// Channel to send worker commands
    pub command_tx: Option<Sender<ClientCommand>>,

    /// Channel to receive worker events
    pub event_rx: Option<Receiver<ClientEvent>>,

    /// Channel to receive availability updates
    pub health_rx: Option<Receiver<HealthStatus>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let store = Arc::new(EphemeralStore::new());
        Self {
            view: View::FaceCompare,
            session: SessionSnapshot {
                status: SessionStatus::Checking,
                identity: None,
            },
            health: HealthStatus::default(),
            auth: AuthForm::default(),
            face: FaceCompareState::default(),
            speech: SpeechState::default(),
            voice_clone: VoiceCloneState::default(),
            history: HistoryState::default(),
            contact: ContactForm::default(),
            playback: PlaybackController::new(store),
            activity_log: VecDeque::with_capacity(100),
            show_log_panel: false,
            command_tx: None,
            event_rx: None,
            health_rx: None,
        }
    }

    pub fn add_log(&mut self, message: impl Into<String>) {
        if self.activity_log.len() >= 100 {
            self.activity_log.pop_front();
        }
        self.activity_log
            .push_back(format!("{} {}", Local::now().format("%H:%M:%S"), message.into()));
    }

    fn send(&mut self, command: ClientCommand) {
        if let Some(tx) = &self.command_tx {
            if tx.send(command).is_err() {
                warn!("Client worker is gone");
                self.add_log("Worker unavailable; please restart the application");
            }
        }
    }

    /// Submit the auth form in its current mode
    pub fn submit_auth(&mut self, mode: AuthMode) {
        self.auth.notice = None;
        match mode {
            AuthMode::Signup => {
                if self.auth.password != self.auth.confirm_password {
                    self.auth.notice = Some(Notice::error("Passwords do not match."));
                    return;
                }
                self.auth.busy = true;
                let command = ClientCommand::Signup {
                    username: self.auth.username.clone(),
                    email: self.auth.email.clone(),
                    password: self.auth.password.clone(),
                    confirm_password: self.auth.confirm_password.clone(),
                };
                self.send(command);
            }
            AuthMode::Login => {
                self.auth.busy = true;
                let command = ClientCommand::Login {
                    username: self.auth.username.clone(),
                    password: self.auth.password.clone(),
                };
                self.send(command);
            }
        }
    }

    pub fn logout(&mut self) {
        self.send(ClientCommand::Logout);
    }

    /// Load an image file into one of the comparison slots
    pub fn load_face_image(&mut self, slot: usize) {
        let path = if slot == 0 {
            self.face.image1.path.clone()
        } else {
            self.face.image2.path.clone()
        };

        match load_binary(&path) {
            Ok(payload) => {
                let target = if slot == 0 {
                    &mut self.face.image1
                } else {
                    &mut self.face.image2
                };
                target.payload = Some(payload);
                // A new input invalidates the previous verdict
                self.face.result = None;
                self.face.notice = None;
            }
            Err(message) => self.face.notice = Some(Notice::error(message)),
        }
    }

    pub fn compare_faces(&mut self) {
        let (Some(image1), Some(image2)) = (
            self.face.image1.payload.clone(),
            self.face.image2.payload.clone(),
        ) else {
            self.face.notice = Some(Notice::error("Please select two images to compare."));
            return;
        };

        self.face.busy = true;
        self.face.result = None;
        self.face.notice = None;
        self.add_log("Comparing faces...");
        self.send(ClientCommand::CompareFaces { image1, image2 });
    }

    pub fn synthesize(&mut self) {
        if self.speech.text.trim().is_empty() {
            self.speech.notice = Some(Notice::error(
                "Please enter some text to convert to speech.",
            ));
            return;
        }

        self.speech.busy = true;
        self.speech.notice = None;
        self.add_log("Generating speech...");
        let command = ClientCommand::Synthesize {
            text: self.speech.text.clone(),
            voice: self.speech.voice.clone(),
        };
        self.send(command);
    }

    pub fn load_reference_audio(&mut self) {
        match load_binary(&self.voice_clone.reference_path.clone()) {
            Ok(payload) => {
                self.voice_clone.reference = Some(payload);
                self.voice_clone.notice = None;
            }
            Err(message) => self.voice_clone.notice = Some(Notice::error(message)),
        }
    }

    pub fn clone_voice(&mut self) {
        let Some(reference) = self.voice_clone.reference.clone() else {
            self.voice_clone.notice =
                Some(Notice::error("Please provide a reference audio recording."));
            return;
        };
        if self.voice_clone.text.trim().is_empty() {
            self.voice_clone.notice = Some(Notice::error(
                "Please enter some text to convert to speech.",
            ));
            return;
        }

        self.voice_clone.busy = true;
        self.voice_clone.notice = None;
        self.add_log("Cloning voice...");
        let command = ClientCommand::CloneVoice {
            reference_audio: reference,
            text: self.voice_clone.text.clone(),
        };
        self.send(command);
    }

    pub fn fetch_history(&mut self) {
        self.history.busy = true;
        self.history.notice = None;
        self.send(ClientCommand::FetchHistory);
    }

    pub fn send_contact(&mut self) {
        if self.contact.name.trim().is_empty()
            || self.contact.email.trim().is_empty()
            || self.contact.message.trim().is_empty()
        {
            self.contact.notice = Some(Notice::error("Please fill in all fields."));
            return;
        }

        self.contact.busy = true;
        self.contact.notice = None;
        let command = ClientCommand::SendContact {
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            message: self.contact.message.clone(),
        };
        self.send(command);
    }

    /// Process incoming events from the worker channels
    pub fn poll_events(&mut self) {
        let events: Vec<ClientEvent> = match &self.event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };

        for event in events {
            match event {
                ClientEvent::Session(snapshot) => {
                    let was_authenticated = self.session.status == SessionStatus::Authenticated;
                    match &snapshot.identity {
                        Some(user) => self.add_log(format!("Signed in as {}", user.username)),
                        None if was_authenticated => self.add_log("Signed out"),
                        None => {}
                    }
                    self.session = snapshot;
                    self.auth.busy = false;
                    if self.session.status == SessionStatus::Authenticated
                        && self.view == View::Auth
                    {
                        self.auth.clear();
                        self.view = View::FaceCompare;
                    }
                }

                ClientEvent::AuthFailed(message) => {
                    self.auth.busy = false;
                    self.auth.notice = Some(Notice::error(message));
                }

                ClientEvent::SignupComplete(message) => {
                    self.auth.busy = false;
                    self.auth.mode = AuthMode::Login;
                    self.auth.password.clear();
                    self.auth.confirm_password.clear();
                    self.auth.notice = Some(Notice::info(message));
                }

                ClientEvent::Media { kind, result } => self.on_media_result(kind, result),

                ClientEvent::MediaFailed { kind, error } => {
                    self.add_log(format!("{} failed: {}", kind.label(), error));
                    match kind {
                        CapabilityKind::FaceCompare => {
                            self.face.busy = false;
                            self.face.notice = Some(Notice::error(error));
                        }
                        CapabilityKind::TextToSpeech => {
                            self.speech.busy = false;
                            self.speech.notice = Some(Notice::error(error));
                        }
                        CapabilityKind::VoiceClone => {
                            self.voice_clone.busy = false;
                            self.voice_clone.notice = Some(Notice::error(error));
                        }
                    }
                }

                ClientEvent::History(entries) => {
                    self.history.busy = false;
                    self.add_log(format!("Loaded {} history entries", entries.len()));
                    self.history.entries = entries;
                }

                ClientEvent::HistoryFailed(message) => {
                    self.history.busy = false;
                    self.history.notice = Some(Notice::error(message));
                }

                ClientEvent::ContactSent(message) => {
                    self.contact.busy = false;
                    self.contact.name.clear();
                    self.contact.email.clear();
                    self.contact.message.clear();
                    self.contact.notice = Some(Notice::info(message));
                }

                ClientEvent::ContactFailed(message) => {
                    self.contact.busy = false;
                    self.contact.notice = Some(Notice::error(message));
                }

                ClientEvent::Shutdown => {
                    self.add_log("Worker shut down");
                    self.command_tx = None;
                }
            }
        }

        let updates: Vec<HealthStatus> = match &self.health_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        if let Some(latest) = updates.into_iter().last() {
            self.health = latest;
        }
    }

    fn on_media_result(&mut self, kind: CapabilityKind, result: MediaResult) {
        self.add_log(format!("{} finished", kind.label()));
        match kind {
            CapabilityKind::FaceCompare => {
                self.face.busy = false;
                self.face.result = Some(result);
            }
            CapabilityKind::TextToSpeech | CapabilityKind::VoiceClone => {
                if kind == CapabilityKind::TextToSpeech {
                    self.speech.busy = false;
                } else {
                    self.voice_clone.busy = false;
                }

                if let MediaResult::Speech { audio, mime } = result {
                    if let Err(e) = self.playback.install(audio, &mime) {
                        let notice = Some(Notice::error(e.user_message()));
                        match kind {
                            CapabilityKind::TextToSpeech => self.speech.notice = notice,
                            _ => self.voice_clone.notice = notice,
                        }
                    }
                }
            }
        }
    }
}

/// Read a local file into an upload payload, guessing the MIME type from
/// the extension
fn load_binary(path: &str) -> Result<BinaryPayload, String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err("Please enter a file path.".to_string());
    }

    let bytes = std::fs::read(trimmed).map_err(|e| format!("Could not read {}: {}", trimmed, e))?;
    if bytes.is_empty() {
        return Err(format!("{} is empty", trimmed));
    }

    let file_name = Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(BinaryPayload::new(file_name, mime_for_path(trimmed), bytes))
}

fn mime_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path("/tmp/photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_path("clip.wav"), "audio/wav");
        assert_eq!(mime_for_path("mystery.bin"), "application/octet-stream");
        assert_eq!(mime_for_path("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_compare_requires_both_images() {
        let mut state = AppState::new();
        state.compare_faces();

        let notice = state.face.notice.expect("expected a validation notice");
        assert!(notice.is_error);
        assert!(!state.face.busy);
    }

    #[test]
    fn test_synthesize_requires_text() {
        let mut state = AppState::new();
        state.speech.text = "   ".to_string();
        state.synthesize();

        assert!(state.speech.notice.is_some());
        assert!(!state.speech.busy);
    }

    #[test]
    fn test_signup_password_mismatch_rejected_locally() {
        let mut state = AppState::new();
        state.auth.password = "one".to_string();
        state.auth.confirm_password = "two".to_string();
        state.submit_auth(AuthMode::Signup);

        let notice = state.auth.notice.expect("expected a validation notice");
        assert_eq!(notice.message, "Passwords do not match.");
        assert!(!state.auth.busy);
    }

    #[test]
    fn test_speech_result_installs_playback() {
        let mut state = AppState::new();
        state.speech.busy = true;

        state.on_media_result(
            CapabilityKind::TextToSpeech,
            MediaResult::Speech {
                audio: vec![1, 2, 3],
                mime: "audio/wav".to_string(),
            },
        );

        assert!(!state.speech.busy);
        // Either the clip installed, or the environment has no audio
        // device and a notice explains why
        assert!(state.playback.has_audio() || state.speech.notice.is_some());
    }

    #[test]
    fn test_activity_log_bounded() {
        let mut state = AppState::new();
        for i in 0..150 {
            state.add_log(format!("line {}", i));
        }
        assert_eq!(state.activity_log.len(), 100);
    }
}
