//! Host capture pipeline
//!
//! The webview hosts the live capture and the encoder; the backend drives it
//! over Tauri events and receives encoded chunks back through IPC. The trait
//! keeps that boundary mockable.

use async_trait::async_trait;
use serde::Serialize;
use tauri::Emitter;
use thiserror::Error;

use super::sources::CaptureSource;
use crate::format::RecordFormat;

/// Event asking the host to acquire streams and begin the preview.
pub const EVENT_ARM: &str = "capture://arm";

/// Event asking the host to start encoding the armed stream.
pub const EVENT_START: &str = "record://start";

/// Event asking the host to stop the encoder and flush remaining chunks.
pub const EVENT_STOP: &str = "record://stop";

/// Event asking the host to drop the armed stream.
pub const EVENT_RELEASE: &str = "capture://release";

/// Errors crossing the host capture boundary.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture host error: {0}")]
    Host(String),
}

/// Result type for pipeline operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Descriptor of an acquired live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandle {
    /// Identifier of the bound capture source
    pub source_id: String,

    /// Whether a microphone stream was requested alongside the video
    pub has_audio: bool,
}

/// The host capability for stream acquisition and encoding.
#[async_trait]
pub trait CapturePipeline: Send + Sync {
    /// Acquire a live video stream for `source`, plus a microphone stream
    /// when `with_audio` is set, and begin the preview.
    async fn acquire(&self, source: &CaptureSource, with_audio: bool) -> CaptureResult<StreamHandle>;

    /// Start encoding the armed stream into `format`.
    async fn start_encoder(&self, format: RecordFormat) -> CaptureResult<()>;

    /// Stop the encoder; the host flushes trailing chunks afterwards.
    async fn stop_encoder(&self) -> CaptureResult<()>;

    /// Drop the armed stream and end the preview.
    async fn release(&self) -> CaptureResult<()>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArmPayload<'a> {
    source: &'a CaptureSource,
    audio: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartPayload<'a> {
    mime_type: &'a str,
}

/// Production pipeline: forwards every operation to the webview host.
///
/// Operations resolve as soon as the request event is dispatched. The host
/// answers out of band: `confirm_capture` once its stream is live, or
/// `capture_failed` — which tears the session down to `Idle` — when the
/// prompt is denied or the encoder dies.
pub struct WebviewPipeline<R: tauri::Runtime> {
    app: tauri::AppHandle<R>,
}

impl<R: tauri::Runtime> WebviewPipeline<R> {
    pub fn new(app: tauri::AppHandle<R>) -> Self {
        Self { app }
    }

    fn emit<P: Serialize + Clone>(&self, event: &str, payload: P) -> CaptureResult<()> {
        self.app
            .emit(event, payload)
            .map_err(|e| CaptureError::Host(e.to_string()))
    }
}

#[async_trait]
impl<R: tauri::Runtime> CapturePipeline for WebviewPipeline<R> {
    async fn acquire(&self, source: &CaptureSource, with_audio: bool) -> CaptureResult<StreamHandle> {
        tracing::info!(source = %source.id, audio = with_audio, "arming capture host");
        self.emit(
            EVENT_ARM,
            ArmPayload {
                source,
                audio: with_audio,
            },
        )?;
        Ok(StreamHandle {
            source_id: source.id.clone(),
            has_audio: with_audio,
        })
    }

    async fn start_encoder(&self, format: RecordFormat) -> CaptureResult<()> {
        self.emit(
            EVENT_START,
            StartPayload {
                mime_type: format.mime_type(),
            },
        )
    }

    async fn stop_encoder(&self) -> CaptureResult<()> {
        self.emit(EVENT_STOP, ())
    }

    async fn release(&self) -> CaptureResult<()> {
        self.emit(EVENT_RELEASE, ())
    }
}
