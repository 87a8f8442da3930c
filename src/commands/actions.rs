//! Shared action table
//!
//! Every user-triggerable action has one entry here; menu items and inline
//! controls dispatch through the same handler so the two surfaces cannot
//! drift apart.

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter, Manager, Runtime};
use tauri_plugin_dialog::MessageDialogKind;

use super::recording::RecorderState;
use super::show_notice;
use crate::capture::{self, CaptureSource};
use crate::format::RecordFormat;
use crate::session::RecordingError;

/// Event carrying the fresh source list for the picker.
pub const EVENT_SOURCES: &str = "picker://sources";

/// Event carrying the format table for the picker.
pub const EVENT_FORMATS: &str = "picker://formats";

/// Event announcing a session phase change.
pub const EVENT_PHASE: &str = "session://phase";

/// Event announcing the new audio-flag value.
pub const EVENT_AUDIO: &str = "session://audio";

/// User-triggerable actions, shared by menu and inline controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppAction {
    PickSource,
    PickFormat,
    StartRecording,
    StopRecording,
    ToggleAudio,
}

impl AppAction {
    pub const ALL: [AppAction; 5] = [
        AppAction::PickSource,
        AppAction::PickFormat,
        AppAction::StartRecording,
        AppAction::StopRecording,
        AppAction::ToggleAudio,
    ];

    /// Stable identifier used as menu item id and IPC action name.
    pub fn id(&self) -> &'static str {
        match self {
            AppAction::PickSource => "pick-source",
            AppAction::PickFormat => "pick-format",
            AppAction::StartRecording => "start-recording",
            AppAction::StopRecording => "stop-recording",
            AppAction::ToggleAudio => "toggle-audio",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.id() == id)
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            AppAction::PickSource => "Select Recording Source…",
            AppAction::PickFormat => "Select Format…",
            AppAction::StartRecording => "Start Recording",
            AppAction::StopRecording => "Stop Recording",
            AppAction::ToggleAudio => "Record Microphone",
        }
    }

    pub fn accelerator(&self) -> Option<&'static str> {
        match self {
            AppAction::PickSource => Some("F5"),
            AppAction::PickFormat => Some("F6"),
            AppAction::StartRecording => Some("F7"),
            AppAction::StopRecording => Some("F8"),
            AppAction::ToggleAudio => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatOption {
    mime_type: &'static str,
    filter_label: &'static str,
}

/// Picker entry: display label plus the source to arm. The label is computed
/// here so the picker shows exactly what the CRS label will show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceOption {
    label: String,
    source: CaptureSource,
}

fn source_options(sources: Vec<CaptureSource>) -> Vec<SourceOption> {
    sources
        .into_iter()
        .map(|source| SourceOption {
            label: source.label(),
            source,
        })
        .collect()
}

/// Run one action against the live session.
pub async fn dispatch<R: Runtime>(app: &AppHandle<R>, action: AppAction) {
    tracing::debug!(action = action.id(), "dispatching action");

    match action {
        AppAction::PickSource => {
            let sources = capture::list_sources();
            tracing::info!(count = sources.len(), "enumerated capture sources");
            emit(app, EVENT_SOURCES, source_options(sources));
        }
        AppAction::PickFormat => {
            let formats: Vec<FormatOption> = RecordFormat::ALL
                .iter()
                .map(|f| FormatOption {
                    mime_type: f.mime_type(),
                    filter_label: f.save_filter().label,
                })
                .collect();
            emit(app, EVENT_FORMATS, &formats);
        }
        AppAction::StartRecording => {
            let state = app.state::<RecorderState>();
            let result = state.controller.lock().await.start().await;
            match result {
                Ok(_) => emit_phase(app).await,
                Err(RecordingError::NotArmed) => show_notice(
                    app,
                    "No Recording Source",
                    "Select a recording source before starting the recording.",
                    MessageDialogKind::Info,
                ),
                Err(e) => show_notice(
                    app,
                    "Recording Failed",
                    &format!("The recording could not be started: {e}"),
                    MessageDialogKind::Error,
                ),
            }
        }
        AppAction::StopRecording => {
            let state = app.state::<RecorderState>();
            let result = state.controller.lock().await.request_stop().await;
            match result {
                // The host flushes its last chunks and then finalizes.
                Ok(()) => {}
                Err(RecordingError::NotRecording) => show_notice(
                    app,
                    "Not Recording",
                    "There is no recording in progress to stop.",
                    MessageDialogKind::Warning,
                ),
                Err(e) => show_notice(
                    app,
                    "Stop Failed",
                    &format!("The recording could not be stopped: {e}"),
                    MessageDialogKind::Error,
                ),
            }
        }
        AppAction::ToggleAudio => {
            let state = app.state::<RecorderState>();
            let enabled = state.controller.lock().await.toggle_audio();
            emit(app, EVENT_AUDIO, enabled);
        }
    }
}

pub(crate) async fn emit_phase<R: Runtime>(app: &AppHandle<R>) {
    let state = app.state::<RecorderState>();
    let phase = state.controller.lock().await.phase();
    emit(app, EVENT_PHASE, phase);
}

fn emit<R: Runtime, P: Serialize + Clone>(app: &AppHandle<R>, event: &str, payload: P) {
    if let Err(e) = app.emit(event, payload) {
        tracing::warn!("failed to emit {event}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SourceKind;

    #[test]
    fn action_ids_round_trip() {
        for action in AppAction::ALL {
            assert_eq!(AppAction::from_id(action.id()), Some(action));
        }
        assert_eq!(AppAction::from_id("reload"), None);
    }

    #[test]
    fn picker_entries_carry_the_source_label() {
        let options = source_options(vec![CaptureSource {
            id: "screen:0".into(),
            name: "Display 1".into(),
            kind: SourceKind::Screen,
        }]);
        assert_eq!(options[0].label, options[0].source.label());
        assert_eq!(options[0].label, "Display 1 [ID screen:0]");
    }

    #[test]
    fn primary_actions_carry_function_key_accelerators() {
        assert_eq!(AppAction::PickSource.accelerator(), Some("F5"));
        assert_eq!(AppAction::PickFormat.accelerator(), Some("F6"));
        assert_eq!(AppAction::StartRecording.accelerator(), Some("F7"));
        assert_eq!(AppAction::StopRecording.accelerator(), Some("F8"));
    }
}
