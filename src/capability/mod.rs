//! Capability descriptors for the backend's processing features

pub mod face;
pub mod speech;

pub use face::{face_compare_request, FaceCompare};
pub use speech::{text_to_speech_request, voice_clone_request, TextToSpeech, VoiceClone};

/// Capability identifiers, used to tag results flowing back to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    FaceCompare,
    TextToSpeech,
    VoiceClone,
}

impl CapabilityKind {
    pub fn label(&self) -> &'static str {
        match self {
            CapabilityKind::FaceCompare => "Face Comparison",
            CapabilityKind::TextToSpeech => "Text to Speech",
            CapabilityKind::VoiceClone => "Voice Clone",
        }
    }
}
