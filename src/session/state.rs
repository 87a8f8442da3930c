//! Session state
//!
//! The tagged lifecycle value plus the data each phase carries.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capture::{CaptureSource, StreamHandle};
use crate::format::RecordFormat;

/// Lifecycle phase of the recording session, as shown to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No source selected
    #[default]
    Idle,
    /// Source selected, stream live, preview running
    Armed,
    /// Encoder active, chunks accumulating
    Recording,
}

/// The full session value. Transitions go through the controller only.
pub enum Session {
    Idle,
    Armed(ArmedSession),
    Recording(ActiveRecording),
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        match self {
            Session::Idle => SessionPhase::Idle,
            Session::Armed(_) => SessionPhase::Armed,
            Session::Recording(_) => SessionPhase::Recording,
        }
    }
}

/// A selected source with its live stream.
pub struct ArmedSession {
    /// The chosen capture source
    pub source: CaptureSource,

    /// Handle to the acquired stream
    pub stream: StreamHandle,
}

/// An in-flight recording: armed stream plus the accumulating chunk buffer.
pub struct ActiveRecording {
    /// Session id for log correlation
    pub session_id: Uuid,

    /// The armed stream being encoded
    pub armed: ArmedSession,

    /// Format captured when the recording started
    pub format: RecordFormat,

    /// When encoding started
    pub started_at: Instant,

    /// Encoded chunks in arrival order
    chunks: Vec<Vec<u8>>,
}

impl ActiveRecording {
    pub fn new(armed: ArmedSession, format: RecordFormat) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            armed,
            format,
            started_at: Instant::now(),
            chunks: Vec::new(),
        }
    }

    /// Append one encoded chunk. Arrival order is preserved.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate all chunks into the final buffer. Consumes the session.
    pub fn into_finished(self) -> FinishedRecording {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }

        FinishedRecording {
            format: self.format,
            chunk_count: self.chunks.len(),
            duration_ms: self.started_at.elapsed().as_secs_f64() * 1000.0,
            data,
        }
    }
}

/// The assembled recording, ready for the save flow.
pub struct FinishedRecording {
    /// Format the buffer is tagged with
    pub format: RecordFormat,

    /// Byte-concatenation of every chunk, in arrival order
    pub data: Vec<u8>,

    /// Number of chunks that went into the buffer
    pub chunk_count: usize,

    /// Wall-clock duration of the recording
    pub duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SourceKind;

    fn armed() -> ArmedSession {
        ArmedSession {
            source: CaptureSource {
                id: "screen:0".to_string(),
                name: "Main Display".to_string(),
                kind: SourceKind::Screen,
            },
            stream: StreamHandle {
                source_id: "screen:0".to_string(),
                has_audio: false,
            },
        }
    }

    #[test]
    fn finished_buffer_is_exact_concatenation() {
        let mut active = ActiveRecording::new(armed(), RecordFormat::WebmVp8);
        active.push_chunk(vec![1, 2, 3]);
        active.push_chunk(vec![]);
        active.push_chunk(vec![4]);
        active.push_chunk(vec![5, 6]);

        let finished = active.into_finished();
        assert_eq!(finished.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(finished.chunk_count, 4);
        assert_eq!(finished.format, RecordFormat::WebmVp8);
    }

    #[test]
    fn empty_recording_finishes_with_empty_buffer() {
        let finished = ActiveRecording::new(armed(), RecordFormat::Avi).into_finished();
        assert!(finished.data.is_empty());
        assert_eq!(finished.chunk_count, 0);
    }
}
