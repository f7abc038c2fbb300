//! Face comparison capability
//!
//! Uploads two images and receives a match verdict with L2 and cosine
//! scores.

use crate::pipeline::{BinaryPayload, Capability, MediaRequest, MediaResult, Payload};
use crate::{EchofaceError, Result};
use serde::Deserialize;

pub struct FaceCompare;

#[derive(Debug, Deserialize)]
struct FaceCompareResponse {
    #[serde(rename = "match")]
    matched: bool,
    confidence: Confidence,
}

#[derive(Debug, Deserialize)]
struct Confidence {
    l2_score: f64,
    cosine_score: f64,
}

impl Capability for FaceCompare {
    fn name(&self) -> &'static str {
        "face_compare"
    }

    fn endpoint(&self) -> &'static str {
        "/api/face-detection"
    }

    fn validate(&self, request: &MediaRequest) -> Result<()> {
        for field in ["image1", "image2"] {
            match request.field(field) {
                Some(Payload::Binary(binary)) if !binary.bytes.is_empty() => {}
                _ => {
                    return Err(EchofaceError::Validation(
                        "Please select two images to compare.".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }

    fn parse_result(&self, body: serde_json::Value) -> Result<MediaResult> {
        let response: FaceCompareResponse = serde_json::from_value(body)?;
        Ok(MediaResult::FaceCompare {
            matched: response.matched,
            l2_score: response.confidence.l2_score,
            cosine_score: response.confidence.cosine_score,
        })
    }
}

/// Build a face comparison request from two uploaded images
pub fn face_compare_request(image1: BinaryPayload, image2: BinaryPayload) -> MediaRequest {
    MediaRequest::new(
        "face_compare",
        vec![
            ("image1".to_string(), Payload::Binary(image1)),
            ("image2".to_string(), Payload::Binary(image2)),
        ],
    )
}

/// Cosine score rendered as a whole-number similarity percentage
pub fn similarity_percent(cosine_score: f64) -> u8 {
    (cosine_score.clamp(0.0, 1.0) * 100.0).round() as u8
}
