//! Recording-related Tauri commands

use std::sync::Arc;

use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::MessageDialogKind;
use tokio::sync::Mutex;

use super::actions::{self, AppAction};
use super::show_notice;
use crate::capture::CaptureSource;
use crate::save::{self, DialogSavePrompt, SaveOutcome};
use crate::session::{RecordingController, SessionPhase};

/// Event announcing the armed source, for the CRS label.
pub const EVENT_SOURCE: &str = "session://source";

/// Event announcing the selected format, for the format label.
pub const EVENT_FORMAT: &str = "session://format";

/// Application state for recording
pub struct RecorderState {
    pub controller: Arc<Mutex<RecordingController>>,
}

impl RecorderState {
    pub fn new(controller: RecordingController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}

/// Run one entry of the shared action table.
#[tauri::command]
pub async fn run_action(app: AppHandle, action: String) -> Result<(), String> {
    let action =
        AppAction::from_id(&action).ok_or_else(|| format!("unknown action: {action}"))?;
    actions::dispatch(&app, action).await;
    Ok(())
}

/// Arm the selected capture source: acquire its stream and start the preview.
#[tauri::command]
pub async fn arm_source(
    app: AppHandle,
    state: State<'_, RecorderState>,
    source: CaptureSource,
) -> Result<(), String> {
    let label = source.label();
    state
        .controller
        .lock()
        .await
        .arm(source)
        .await
        .map_err(|e| e.to_string())?;

    if let Err(e) = app.emit(EVENT_SOURCE, &label) {
        tracing::warn!("failed to emit armed source: {e}");
    }
    actions::emit_phase(&app).await;
    Ok(())
}

/// Host confirmation that a stream is live, carrying the track label and
/// display surface the browser actually captured. The picker there has the
/// final word, so the armed source is reconciled with what it reports.
#[tauri::command]
pub async fn confirm_capture(
    app: AppHandle,
    state: State<'_, RecorderState>,
    track_label: String,
    surface: String,
) -> Result<(), String> {
    let label = state
        .controller
        .lock()
        .await
        .confirm_capture(&track_label, &surface)
        .map_err(|e| e.to_string())?;

    if let Err(e) = app.emit(EVENT_SOURCE, &label) {
        tracing::warn!("failed to emit armed source: {e}");
    }
    Ok(())
}

/// Host-reported capture or encoder failure. Whatever phase the session was
/// in, it is torn down to `Idle` so the next arm starts clean.
#[tauri::command]
pub async fn capture_failed(
    app: AppHandle,
    state: State<'_, RecorderState>,
    reason: String,
) -> Result<(), String> {
    let previous = state.controller.lock().await.abort().await;
    tracing::error!(phase = ?previous, "host reported capture failure: {reason}");
    actions::emit_phase(&app).await;

    if previous != SessionPhase::Idle {
        if let Err(e) = app.emit(EVENT_SOURCE, "none selected") {
            tracing::warn!("failed to emit armed source: {e}");
        }
        show_notice(
            &app,
            "Capture Failed",
            &format!("The capture stream was lost: {reason}"),
            MessageDialogKind::Error,
        );
    }
    Ok(())
}

/// Select a format by MIME string. Returns the exact string for the label.
#[tauri::command]
pub async fn select_format(
    app: AppHandle,
    state: State<'_, RecorderState>,
    mime: String,
) -> Result<String, String> {
    let format = state
        .controller
        .lock()
        .await
        .select_format(&mime)
        .map_err(|e| e.to_string())?;

    let mime = format.mime_type().to_string();
    if let Err(e) = app.emit(EVENT_FORMAT, &mime) {
        tracing::warn!("failed to emit selected format: {e}");
    }
    Ok(mime)
}

/// Append one encoded chunk delivered by the host encoder.
#[tauri::command]
pub async fn record_chunk(
    state: State<'_, RecorderState>,
    chunk: Vec<u8>,
) -> Result<(), String> {
    state
        .controller
        .lock()
        .await
        .push_chunk(chunk)
        .map_err(|e| e.to_string())
}

/// Assemble the finished buffer and run the save flow. Called by the host
/// after the encoder has flushed its last chunk.
#[tauri::command]
pub async fn finalize_recording(
    app: AppHandle,
    state: State<'_, RecorderState>,
) -> Result<(), String> {
    // Release the lock before the dialog: the prompt waits on the user.
    let finished = state
        .controller
        .lock()
        .await
        .finalize()
        .await
        .map_err(|e| e.to_string())?;
    actions::emit_phase(&app).await;

    let prompt = DialogSavePrompt::new(app.clone());
    match save::save_recording(&prompt, &finished).await {
        SaveOutcome::Saved(path) => show_notice(
            &app,
            "Recording Saved",
            &format!("Your recording was saved to {}.", path.display()),
            MessageDialogKind::Info,
        ),
        SaveOutcome::Cancelled => show_notice(
            &app,
            "Save Cancelled",
            "The save dialog was dismissed and the recording was discarded.",
            MessageDialogKind::Warning,
        ),
        SaveOutcome::Failed(reason) => show_notice(
            &app,
            "Save Failed",
            &format!("The recording could not be written: {reason}"),
            MessageDialogKind::Error,
        ),
    }
    Ok(())
}

/// Current lifecycle phase, for UI initialization.
#[tauri::command]
pub async fn get_session_phase(state: State<'_, RecorderState>) -> Result<SessionPhase, String> {
    Ok(state.controller.lock().await.phase())
}

/// Currently selected format as its MIME string.
#[tauri::command]
pub async fn get_selected_format(state: State<'_, RecorderState>) -> Result<String, String> {
    Ok(state
        .controller
        .lock()
        .await
        .format()
        .mime_type()
        .to_string())
}

/// Whether the microphone will be requested at the next arm.
#[tauri::command]
pub async fn get_audio_enabled(state: State<'_, RecorderState>) -> Result<bool, String> {
    Ok(state.controller.lock().await.audio_enabled())
}
