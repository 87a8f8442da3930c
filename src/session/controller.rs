//! Recording controller
//!
//! Owns the session lifecycle and the settings read at transition time: the
//! selected format (captured when encoding starts) and the audio flag (read
//! when a source is armed).

use super::state::{ActiveRecording, ArmedSession, FinishedRecording, Session, SessionPhase};
use super::{RecordingError, RecordingResult};
use crate::capture::{CapturePipeline, CaptureSource, SourceKind};
use crate::format::RecordFormat;
use uuid::Uuid;

pub struct RecordingController {
    session: Session,
    format: RecordFormat,
    audio_enabled: bool,
    pipeline: Box<dyn CapturePipeline>,
}

impl RecordingController {
    pub fn new(pipeline: Box<dyn CapturePipeline>) -> Self {
        Self {
            session: Session::Idle,
            format: RecordFormat::default(),
            audio_enabled: false,
            pipeline,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// The armed source, if any.
    pub fn armed_source(&self) -> Option<&CaptureSource> {
        match &self.session {
            Session::Idle => None,
            Session::Armed(armed) => Some(&armed.source),
            Session::Recording(active) => Some(&active.armed.source),
        }
    }

    /// Flip the audio flag; the new value applies at the next arm.
    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        tracing::info!(enabled = self.audio_enabled, "microphone toggled");
        self.audio_enabled
    }

    /// Select a format by its MIME string. The set is closed; anything else
    /// is rejected.
    pub fn select_format(&mut self, mime: &str) -> RecordingResult<RecordFormat> {
        let format = RecordFormat::from_mime(mime)
            .ok_or_else(|| RecordingError::UnknownFormat(mime.to_string()))?;
        self.format = format;
        tracing::info!(format = %format, "format selected");
        Ok(format)
    }

    /// Arm a capture source: acquire its stream (with a microphone stream
    /// when the audio flag is set) and start the preview. Re-arming replaces
    /// the previous stream; arming during a recording is rejected.
    pub async fn arm(&mut self, source: CaptureSource) -> RecordingResult<()> {
        if matches!(self.session, Session::Recording(_)) {
            return Err(RecordingError::AlreadyRecording);
        }

        if let Session::Armed(_) = std::mem::replace(&mut self.session, Session::Idle) {
            self.pipeline.release().await?;
        }

        let stream = self.pipeline.acquire(&source, self.audio_enabled).await?;
        tracing::info!(source = %source.id, audio = stream.has_audio, "source armed");
        self.session = Session::Armed(ArmedSession { source, stream });
        Ok(())
    }

    /// Reconcile the armed source with the target the host actually
    /// captured. The host's own picker has the final word, so the label
    /// must describe the real stream. Returns the updated label.
    pub fn confirm_capture(&mut self, track_label: &str, surface: &str) -> RecordingResult<String> {
        match &mut self.session {
            Session::Armed(armed) => {
                if !track_label.is_empty() && track_label != armed.source.name {
                    tracing::info!(
                        requested = %armed.source.name,
                        actual = %track_label,
                        "host captured a different target"
                    );
                    armed.source.name = track_label.to_string();
                }
                match surface {
                    "monitor" => armed.source.kind = SourceKind::Screen,
                    "window" => armed.source.kind = SourceKind::Window,
                    _ => {}
                }
                Ok(armed.source.label())
            }
            _ => Err(RecordingError::NotArmed),
        }
    }

    /// Host-reported failure path: drop the live stream and any accumulated
    /// chunks and return to `Idle`, whatever the current phase. Returns the
    /// phase the failure interrupted.
    pub async fn abort(&mut self) -> SessionPhase {
        let previous = self.session.phase();
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => {}
            Session::Armed(_) => {
                if let Err(e) = self.pipeline.release().await {
                    tracing::warn!("failed to release capture stream: {e}");
                }
            }
            Session::Recording(active) => {
                if let Err(e) = self.pipeline.release().await {
                    tracing::warn!("failed to release capture stream: {e}");
                }
                tracing::warn!(
                    session = %active.session_id,
                    chunks = active.chunk_count(),
                    "recording aborted, chunks discarded"
                );
            }
        }
        previous
    }

    /// Start encoding the armed stream into the selected format with a
    /// fresh, empty chunk buffer.
    pub async fn start(&mut self) -> RecordingResult<Uuid> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => Err(RecordingError::NotArmed),
            Session::Recording(active) => {
                self.session = Session::Recording(active);
                Err(RecordingError::AlreadyRecording)
            }
            Session::Armed(armed) => {
                if let Err(e) = self.pipeline.start_encoder(self.format).await {
                    self.session = Session::Armed(armed);
                    return Err(e.into());
                }

                let active = ActiveRecording::new(armed, self.format);
                let session_id = active.session_id;
                tracing::info!(session = %session_id, format = %self.format, "recording started");
                self.session = Session::Recording(active);
                Ok(session_id)
            }
        }
    }

    /// Append one encoded chunk to the active recording.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> RecordingResult<()> {
        match &mut self.session {
            Session::Recording(active) => {
                active.push_chunk(chunk);
                Ok(())
            }
            _ => Err(RecordingError::NotRecording),
        }
    }

    /// Ask the host to stop the encoder. A guarded edge: without an active
    /// recording this is a recoverable error, not a crash. The session stays
    /// in `Recording` until the host flushes its last chunks and calls
    /// `finalize`.
    pub async fn request_stop(&mut self) -> RecordingResult<()> {
        if !matches!(self.session, Session::Recording(_)) {
            return Err(RecordingError::NotRecording);
        }
        self.pipeline.stop_encoder().await?;
        Ok(())
    }

    /// Concatenate the chunk buffer into the final tagged buffer, release
    /// the stream, and return to `Idle`.
    pub async fn finalize(&mut self) -> RecordingResult<FinishedRecording> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Recording(active) => {
                if let Err(e) = self.pipeline.release().await {
                    tracing::warn!("failed to release capture stream: {e}");
                }

                let session_id = active.session_id;
                let finished = active.into_finished();
                tracing::info!(
                    session = %session_id,
                    chunks = finished.chunk_count,
                    bytes = finished.data.len(),
                    duration_ms = finished.duration_ms,
                    "recording finalized"
                );
                Ok(finished)
            }
            other => {
                self.session = other;
                Err(RecordingError::NotRecording)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureError, SourceKind, StreamHandle};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Acquire { source_id: String, with_audio: bool },
        StartEncoder(RecordFormat),
        StopEncoder,
        Release,
    }

    #[derive(Default, Clone)]
    struct MockPipeline {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl MockPipeline {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CapturePipeline for MockPipeline {
        async fn acquire(
            &self,
            source: &CaptureSource,
            with_audio: bool,
        ) -> Result<StreamHandle, CaptureError> {
            self.calls.lock().unwrap().push(Call::Acquire {
                source_id: source.id.clone(),
                with_audio,
            });
            Ok(StreamHandle {
                source_id: source.id.clone(),
                has_audio: with_audio,
            })
        }

        async fn start_encoder(&self, format: RecordFormat) -> Result<(), CaptureError> {
            self.calls.lock().unwrap().push(Call::StartEncoder(format));
            Ok(())
        }

        async fn stop_encoder(&self) -> Result<(), CaptureError> {
            self.calls.lock().unwrap().push(Call::StopEncoder);
            Ok(())
        }

        async fn release(&self) -> Result<(), CaptureError> {
            self.calls.lock().unwrap().push(Call::Release);
            Ok(())
        }
    }

    fn source(id: &str) -> CaptureSource {
        CaptureSource {
            id: id.to_string(),
            name: "Test Source".to_string(),
            kind: SourceKind::Screen,
        }
    }

    fn controller() -> (RecordingController, MockPipeline) {
        let pipeline = MockPipeline::default();
        (
            RecordingController::new(Box::new(pipeline.clone())),
            pipeline,
        )
    }

    #[tokio::test]
    async fn start_without_armed_source_is_rejected() {
        let (mut ctrl, pipeline) = controller();

        let err = ctrl.start().await.unwrap_err();
        assert!(matches!(err, RecordingError::NotArmed));
        assert_eq!(ctrl.phase(), SessionPhase::Idle);
        assert!(pipeline.calls().is_empty());
    }

    #[tokio::test]
    async fn audio_flag_at_arm_time_decides_microphone_request() {
        let (mut ctrl, pipeline) = controller();

        ctrl.arm(source("screen:0")).await.unwrap();
        assert_eq!(
            pipeline.calls().last(),
            Some(&Call::Acquire {
                source_id: "screen:0".to_string(),
                with_audio: false,
            })
        );

        ctrl.toggle_audio();
        // Format choice must not influence the microphone request.
        ctrl.select_format("video/x-msvideo").unwrap();
        ctrl.arm(source("screen:1")).await.unwrap();
        assert_eq!(
            pipeline.calls().last(),
            Some(&Call::Acquire {
                source_id: "screen:1".to_string(),
                with_audio: true,
            })
        );
    }

    #[tokio::test]
    async fn chunks_concatenate_in_arrival_order() {
        let (mut ctrl, _) = controller();
        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();

        let chunks: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; (i as usize) + 1]).collect();
        for chunk in &chunks {
            ctrl.push_chunk(chunk.clone()).unwrap();
        }

        ctrl.request_stop().await.unwrap();
        let finished = ctrl.finalize().await.unwrap();

        let expected: Vec<u8> = chunks.concat();
        assert_eq!(finished.data, expected);
        assert_eq!(finished.chunk_count, 5);
        assert_eq!(
            finished.data.len(),
            chunks.iter().map(Vec::len).sum::<usize>()
        );
        assert_eq!(ctrl.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn stop_without_active_recording_is_guarded() {
        let (mut ctrl, pipeline) = controller();

        assert!(matches!(
            ctrl.request_stop().await.unwrap_err(),
            RecordingError::NotRecording
        ));
        assert!(matches!(
            ctrl.finalize().await.unwrap_err(),
            RecordingError::NotRecording
        ));

        // Same guard while merely armed.
        ctrl.arm(source("screen:0")).await.unwrap();
        assert!(matches!(
            ctrl.request_stop().await.unwrap_err(),
            RecordingError::NotRecording
        ));
        assert_eq!(ctrl.phase(), SessionPhase::Armed);
        assert!(!pipeline.calls().contains(&Call::StopEncoder));
    }

    #[tokio::test]
    async fn second_recording_starts_with_an_empty_buffer() {
        let (mut ctrl, _) = controller();

        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();
        ctrl.push_chunk(vec![1, 2, 3]).unwrap();
        ctrl.request_stop().await.unwrap();
        ctrl.finalize().await.unwrap();

        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();
        ctrl.push_chunk(vec![9]).unwrap();
        let finished = ctrl.finalize().await.unwrap();

        assert_eq!(finished.data, vec![9]);
        assert_eq!(finished.chunk_count, 1);
    }

    #[tokio::test]
    async fn chunk_outside_recording_is_rejected() {
        let (mut ctrl, _) = controller();
        assert!(matches!(
            ctrl.push_chunk(vec![1]).unwrap_err(),
            RecordingError::NotRecording
        ));

        ctrl.arm(source("screen:0")).await.unwrap();
        assert!(matches!(
            ctrl.push_chunk(vec![1]).unwrap_err(),
            RecordingError::NotRecording
        ));
    }

    #[tokio::test]
    async fn format_set_is_closed() {
        let (mut ctrl, _) = controller();

        for format in RecordFormat::ALL {
            let selected = ctrl.select_format(format.mime_type()).unwrap();
            assert_eq!(selected, format);
            assert_eq!(ctrl.format(), format);
        }

        assert!(matches!(
            ctrl.select_format("video/mp4").unwrap_err(),
            RecordingError::UnknownFormat(_)
        ));
    }

    #[tokio::test]
    async fn format_is_captured_when_recording_starts() {
        let (mut ctrl, pipeline) = controller();

        ctrl.select_format("video/webm; codecs=vp9").unwrap();
        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();
        assert!(pipeline
            .calls()
            .contains(&Call::StartEncoder(RecordFormat::WebmVp9)));

        // Changing the selection mid-recording must not retag the buffer.
        ctrl.select_format("video/3gpp").unwrap();
        let finished = ctrl.finalize().await.unwrap();
        assert_eq!(finished.format, RecordFormat::WebmVp9);
    }

    #[tokio::test]
    async fn rearming_releases_the_previous_stream() {
        let (mut ctrl, pipeline) = controller();

        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.arm(source("window:42")).await.unwrap();

        let calls = pipeline.calls();
        assert_eq!(calls.iter().filter(|c| **c == Call::Release).count(), 1);
        assert_eq!(ctrl.armed_source().unwrap().id, "window:42");
    }

    #[tokio::test]
    async fn host_failure_while_armed_resets_to_idle() {
        // The host denied the capture prompt after the backend armed.
        let (mut ctrl, pipeline) = controller();
        ctrl.arm(source("screen:0")).await.unwrap();

        assert_eq!(ctrl.abort().await, SessionPhase::Armed);
        assert_eq!(ctrl.phase(), SessionPhase::Idle);
        assert!(pipeline.calls().contains(&Call::Release));

        // The slate is clean: arming again is allowed.
        ctrl.arm(source("screen:1")).await.unwrap();
        assert_eq!(ctrl.phase(), SessionPhase::Armed);
    }

    #[tokio::test]
    async fn host_failure_during_recording_discards_chunks() {
        let (mut ctrl, _) = controller();
        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();
        ctrl.push_chunk(vec![1, 2]).unwrap();

        assert_eq!(ctrl.abort().await, SessionPhase::Recording);
        assert_eq!(ctrl.phase(), SessionPhase::Idle);
        assert!(matches!(
            ctrl.push_chunk(vec![3]).unwrap_err(),
            RecordingError::NotRecording
        ));

        // A fresh recording is unaffected by the aborted one.
        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();
        ctrl.push_chunk(vec![9]).unwrap();
        let finished = ctrl.finalize().await.unwrap();
        assert_eq!(finished.data, vec![9]);
    }

    #[tokio::test]
    async fn abort_when_idle_is_a_quiet_no_op() {
        let (mut ctrl, pipeline) = controller();
        assert_eq!(ctrl.abort().await, SessionPhase::Idle);
        assert!(pipeline.calls().is_empty());
    }

    #[tokio::test]
    async fn host_confirmation_reconciles_the_armed_source() {
        let (mut ctrl, _) = controller();
        ctrl.arm(source("screen:0")).await.unwrap();

        let label = ctrl.confirm_capture("Entire screen", "monitor").unwrap();
        assert_eq!(label, "Entire screen [ID screen:0]");
        assert_eq!(ctrl.armed_source().unwrap().name, "Entire screen");
        assert_eq!(ctrl.armed_source().unwrap().kind, SourceKind::Screen);

        // An empty track label keeps the previous name.
        let label = ctrl.confirm_capture("", "window").unwrap();
        assert_eq!(label, "Entire screen [ID screen:0]");
        assert_eq!(ctrl.armed_source().unwrap().kind, SourceKind::Window);
    }

    #[tokio::test]
    async fn confirmation_without_an_armed_source_is_rejected() {
        let (mut ctrl, _) = controller();
        assert!(matches!(
            ctrl.confirm_capture("Entire screen", "monitor").unwrap_err(),
            RecordingError::NotArmed
        ));
    }

    #[tokio::test]
    async fn arming_during_a_recording_is_rejected() {
        let (mut ctrl, _) = controller();

        ctrl.arm(source("screen:0")).await.unwrap();
        ctrl.start().await.unwrap();

        assert!(matches!(
            ctrl.arm(source("screen:1")).await.unwrap_err(),
            RecordingError::AlreadyRecording
        ));
        assert_eq!(ctrl.phase(), SessionPhase::Recording);
    }
}
