//! Media request pipeline
//!
//! A `MediaRequestPipeline` binds one `Capability` descriptor to the
//! backend client and drives a single request through
//! Idle -> Encoding -> Submitted -> {Succeeded, Failed}. Validation
//! happens before any network I/O, there is no retry, and each pipeline
//! instance allows exactly one request in flight at a time. Independent
//! instances are fully independent.

use crate::api::ApiClient;
use crate::{EchofaceError, Result};
use parking_lot::Mutex;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Binary input with enough metadata to package it for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl BinaryPayload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// A single named input field
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Binary(BinaryPayload),
}

/// One capability request: an ordered sequence of named inputs.
/// Created by a UI action and consumed exactly once by a pipeline.
#[derive(Debug, Clone)]
pub struct MediaRequest {
    pub id: Uuid,
    pub capability: &'static str,
    pub inputs: Vec<(String, Payload)>,
}

impl MediaRequest {
    pub fn new(capability: &'static str, inputs: Vec<(String, Payload)>) -> Self {
        Self {
            id: Uuid::new_v4(),
            capability,
            inputs,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Payload> {
        self.inputs
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, payload)| payload)
    }
}

/// Decoded backend result, tagged per capability
#[derive(Debug, Clone, PartialEq)]
pub enum MediaResult {
    FaceCompare {
        matched: bool,
        l2_score: f64,
        cosine_score: f64,
    },
    Speech {
        audio: Vec<u8>,
        mime: String,
    },
}

/// Descriptor for one processing capability: where requests go, how
/// inputs are packaged, and how the response body is decoded.
pub trait Capability: Send + Sync + 'static {
    /// Capability name used for logging and request tagging
    fn name(&self) -> &'static str;

    /// Endpoint path, e.g. `/api/tts`
    fn endpoint(&self) -> &'static str;

    /// Reject requests missing mandatory inputs, before any network I/O
    fn validate(&self, request: &MediaRequest) -> Result<()>;

    /// Package the inputs into the wire format
    fn build_payload(&self, request: &MediaRequest) -> Result<Form> {
        multipart_from_inputs(request)
    }

    /// Decode a success body into a result
    fn parse_result(&self, body: serde_json::Value) -> Result<MediaResult>;
}

/// Default multipart packaging: text fields as-is, binary fields with
/// their file name and MIME hint
pub fn multipart_from_inputs(request: &MediaRequest) -> Result<Form> {
    let mut form = Form::new();
    for (field, payload) in &request.inputs {
        form = match payload {
            Payload::Text(value) => form.text(field.clone(), value.clone()),
            Payload::Binary(binary) => {
                let part = Part::bytes(binary.bytes.clone())
                    .file_name(binary.file_name.clone())
                    .mime_str(&binary.mime)
                    .map_err(|e| {
                        EchofaceError::Validation(format!(
                            "Invalid MIME type '{}': {}",
                            binary.mime, e
                        ))
                    })?;
                form.part(field.clone(), part)
            }
        };
    }
    Ok(form)
}

/// Observable pipeline state
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    Encoding,
    Submitted,
    Succeeded(MediaResult),
    Failed(String),
}

impl PipelineState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, PipelineState::Encoding | PipelineState::Submitted)
    }
}

pub struct MediaRequestPipeline<C: Capability> {
    capability: C,
    client: Arc<ApiClient>,
    state: Arc<Mutex<PipelineState>>,
}

impl<C: Capability> MediaRequestPipeline<C> {
    pub fn new(capability: C, client: Arc<ApiClient>) -> Self {
        Self {
            capability,
            client,
            state: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    pub fn state(&self) -> PipelineState {
        self.state.lock().clone()
    }

    /// Return a terminal pipeline to Idle. Refused while a request is in
    /// flight.
    pub fn reset(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_in_flight() {
            return false;
        }
        *state = PipelineState::Idle;
        true
    }

    /// Drive one request to a terminal state.
    ///
    /// Invalid inputs are rejected with zero network calls and leave the
    /// pipeline state untouched. A submit while another request is in
    /// flight is rejected the same way; retry on failure is the caller's
    /// concern, never the pipeline's.
    pub async fn submit(&self, request: MediaRequest) -> Result<MediaResult> {
        self.capability.validate(&request)?;

        {
            let mut state = self.state.lock();
            if state.is_in_flight() {
                warn!(
                    "{} pipeline rejected request {}: already in flight",
                    self.capability.name(),
                    request.id
                );
                return Err(EchofaceError::Validation(
                    "A request is already being processed. Please wait for it to finish."
                        .to_string(),
                ));
            }
            *state = PipelineState::Encoding;
        }

        debug!(
            "{} pipeline submitting request {}",
            self.capability.name(),
            request.id
        );

        match self.run(&request).await {
            Ok(result) => {
                info!(
                    "{} pipeline request {} succeeded",
                    self.capability.name(),
                    request.id
                );
                *self.state.lock() = PipelineState::Succeeded(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!(
                    "{} pipeline request {} failed: {}",
                    self.capability.name(),
                    request.id,
                    e
                );
                *self.state.lock() = PipelineState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    async fn run(&self, request: &MediaRequest) -> Result<MediaResult> {
        let form = self.capability.build_payload(request)?;
        *self.state.lock() = PipelineState::Submitted;

        let body = self
            .client
            .post_multipart(self.capability.endpoint(), form)
            .await?;

        // The backend occasionally reports failure inside a 2xx body
        if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
            return Err(EchofaceError::Backend(message.to_string()));
        }

        self.capability.parse_result(body)
    }
}
