//! Recording session lifecycle
//!
//! One controller owns the tagged session state (`Idle | Armed | Recording`),
//! the chunk buffer, and every transition between them. The host capture and
//! encoder sit behind the `CapturePipeline` seam.

pub mod controller;
pub mod state;

use thiserror::Error;

use crate::capture::CaptureError;

pub use controller::RecordingController;
pub use state::{FinishedRecording, SessionPhase};

/// Errors raised by session transitions.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("no recording source selected")]
    NotArmed,

    #[error("no recording in progress")]
    NotRecording,

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("unknown recording format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Result type for session operations.
pub type RecordingResult<T> = Result<T, RecordingError>;
