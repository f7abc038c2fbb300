//! Speech synthesis capabilities
//!
//! Text-to-speech with a selectable voice, and voice cloning from a
//! reference recording. Both return WAV audio as base64 in the response
//! body.

use crate::pipeline::{BinaryPayload, Capability, MediaRequest, MediaResult, Payload};
use crate::transfer;
use crate::{EchofaceError, Result};
use serde::Deserialize;

/// Default voice id understood by the backend
pub const DEFAULT_VOICE: &str = "af_heart";

/// Voices offered in the speech view: (id, label)
pub const VOICES: &[(&str, &str)] = &[
    ("af_heart", "English (Default)"),
    ("en_GB", "English (British)"),
    ("en_AU", "English (Australian)"),
];

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    audio: String,
}

fn parse_speech_body(body: serde_json::Value) -> Result<MediaResult> {
    let response: SpeechResponse = serde_json::from_value(body)?;
    let audio = transfer::decode(&response.audio)?;
    Ok(MediaResult::Speech {
        audio,
        mime: "audio/wav".to_string(),
    })
}

fn require_text(request: &MediaRequest) -> Result<()> {
    match request.field("text") {
        Some(Payload::Text(text)) if !text.trim().is_empty() => Ok(()),
        _ => Err(EchofaceError::Validation(
            "Please enter some text to convert to speech.".to_string(),
        )),
    }
}

pub struct TextToSpeech;

impl Capability for TextToSpeech {
    fn name(&self) -> &'static str {
        "tts"
    }

    fn endpoint(&self) -> &'static str {
        "/api/tts"
    }

    fn validate(&self, request: &MediaRequest) -> Result<()> {
        require_text(request)
    }

    fn parse_result(&self, body: serde_json::Value) -> Result<MediaResult> {
        parse_speech_body(body)
    }
}

pub struct VoiceClone;

impl Capability for VoiceClone {
    fn name(&self) -> &'static str {
        "voice_clone"
    }

    fn endpoint(&self) -> &'static str {
        "/api/voice-clone"
    }

    fn validate(&self, request: &MediaRequest) -> Result<()> {
        match request.field("reference_audio") {
            Some(Payload::Binary(binary)) if !binary.bytes.is_empty() => {}
            _ => {
                return Err(EchofaceError::Validation(
                    "Please provide a reference audio recording.".to_string(),
                ))
            }
        }
        require_text(request)
    }

    fn parse_result(&self, body: serde_json::Value) -> Result<MediaResult> {
        parse_speech_body(body)
    }
}

/// Build a text-to-speech request
pub fn text_to_speech_request(text: impl Into<String>, voice: impl Into<String>) -> MediaRequest {
    MediaRequest::new(
        "tts",
        vec![
            ("text".to_string(), Payload::Text(text.into())),
            ("voice".to_string(), Payload::Text(voice.into())),
        ],
    )
}

/// Build a voice cloning request
pub fn voice_clone_request(reference_audio: BinaryPayload, text: impl Into<String>) -> MediaRequest {
    MediaRequest::new(
        "voice_clone",
        vec![
            (
                "reference_audio".to_string(),
                Payload::Binary(reference_audio),
            ),
            ("text".to_string(), Payload::Text(text.into())),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_requires_nonempty_text() {
        assert!(TextToSpeech
            .validate(&text_to_speech_request("   ", DEFAULT_VOICE))
            .is_err());
        assert!(TextToSpeech
            .validate(&text_to_speech_request("Hello there", DEFAULT_VOICE))
            .is_ok());
    }

    #[test]
    fn test_voice_clone_requires_reference_and_text() {
        let reference = BinaryPayload::new("ref.wav", "audio/wav", vec![1, 2, 3]);

        assert!(VoiceClone
            .validate(&voice_clone_request(reference.clone(), ""))
            .is_err());

        let no_reference = MediaRequest::new(
            "voice_clone",
            vec![("text".to_string(), Payload::Text("hi".to_string()))],
        );
        assert!(VoiceClone.validate(&no_reference).is_err());

        assert!(VoiceClone
            .validate(&voice_clone_request(reference, "hi"))
            .is_ok());
    }

    #[test]
    fn test_parse_decodes_audio() {
        let samples = vec![0u8, 159, 146, 150, 255];
        let body = serde_json::json!({ "audio": transfer::encode(&samples), "success": true });

        let result = TextToSpeech.parse_result(body).unwrap();
        assert_eq!(
            result,
            MediaResult::Speech {
                audio: samples,
                mime: "audio/wav".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let body = serde_json::json!({ "audio": "@@not-base64@@" });
        assert!(matches!(
            VoiceClone.parse_result(body),
            Err(EchofaceError::Decode(_))
        ));
    }
}
