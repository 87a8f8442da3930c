//! Save flow
//!
//! Prompts for a destination through the native save dialog and writes the
//! finished buffer. Outcomes are three-way: saved, cancelled, or a write
//! failure — a failed write is never reported as success.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::format::SaveFilter;
use crate::session::FinishedRecording;

/// Title of the native save dialog.
pub const SAVE_DIALOG_TITLE: &str = "Save recording";

/// The native save-dialog capability.
#[async_trait]
pub trait SavePrompt: Send + Sync {
    /// Ask the user for a destination path. `None` means the dialog was
    /// dismissed.
    async fn pick_save_path(&self, suggested_name: &str, filter: SaveFilter) -> Option<PathBuf>;
}

/// Result of one pass through the save flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Buffer written to this path
    Saved(PathBuf),
    /// Dialog dismissed; nothing written
    Cancelled,
    /// Dialog confirmed but the write failed
    Failed(String),
}

/// Default output filename, `SRVid-<unix-epoch-millis>`.
pub fn default_file_name() -> String {
    format!("SRVid-{}", chrono::Utc::now().timestamp_millis())
}

/// Run the save flow for a finished recording. The filter comes from the
/// format the buffer was tagged with; a cancelled dialog never touches the
/// filesystem.
pub async fn save_recording(
    prompt: &dyn SavePrompt,
    recording: &FinishedRecording,
) -> SaveOutcome {
    let filter = recording.format.save_filter();

    let Some(path) = prompt.pick_save_path(&default_file_name(), filter).await else {
        tracing::info!("save dialog dismissed, recording discarded");
        return SaveOutcome::Cancelled;
    };

    match tokio::fs::write(&path, &recording.data).await {
        Ok(()) => {
            tracing::info!(
                path = %path.display(),
                bytes = recording.data.len(),
                "recording saved"
            );
            SaveOutcome::Saved(path)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to write recording: {e}");
            SaveOutcome::Failed(e.to_string())
        }
    }
}

/// Production prompt backed by the dialog plugin.
pub struct DialogSavePrompt<R: tauri::Runtime> {
    app: tauri::AppHandle<R>,
}

impl<R: tauri::Runtime> DialogSavePrompt<R> {
    pub fn new(app: tauri::AppHandle<R>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl<R: tauri::Runtime> SavePrompt for DialogSavePrompt<R> {
    async fn pick_save_path(&self, suggested_name: &str, filter: SaveFilter) -> Option<PathBuf> {
        use tauri_plugin_dialog::DialogExt;

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.app
            .dialog()
            .file()
            .set_title(SAVE_DIALOG_TITLE)
            .set_file_name(suggested_name)
            .add_filter(filter.label, &[filter.extension])
            .add_filter("All Files", &["*"])
            .save_file(move |picked| {
                let _ = tx.send(picked);
            });

        rx.await
            .ok()
            .flatten()
            .and_then(|picked| picked.into_path().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RecordFormat;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct StubPrompt {
        path: Option<PathBuf>,
        seen: Mutex<Option<(String, SaveFilter)>>,
    }

    impl StubPrompt {
        fn new(path: Option<PathBuf>) -> Self {
            Self {
                path,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SavePrompt for StubPrompt {
        async fn pick_save_path(
            &self,
            suggested_name: &str,
            filter: SaveFilter,
        ) -> Option<PathBuf> {
            *self.seen.lock().unwrap() = Some((suggested_name.to_string(), filter));
            self.path.clone()
        }
    }

    fn recording(chunks: &[&[u8]], format: RecordFormat) -> FinishedRecording {
        FinishedRecording {
            format,
            data: chunks.concat(),
            chunk_count: chunks.len(),
            duration_ms: 0.0,
        }
    }

    #[tokio::test]
    async fn cancelled_dialog_skips_the_write() {
        let dir = tempdir().unwrap();
        let prompt = StubPrompt::new(None);
        let rec = recording(&[b"abc", b"def"], RecordFormat::WebmVp8);

        let outcome = save_recording(&prompt, &rec).await;

        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn confirmed_dialog_writes_every_chunk_byte() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.webm");
        let prompt = StubPrompt::new(Some(path.clone()));
        let chunks: [&[u8]; 3] = [b"first", b"", b"second"];
        let rec = recording(&chunks, RecordFormat::WebmVp9);

        let outcome = save_recording(&prompt, &rec).await;

        assert_eq!(outcome, SaveOutcome::Saved(path.clone()));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, rec.data);
        assert_eq!(
            written.len(),
            chunks.iter().map(|c| c.len()).sum::<usize>()
        );
    }

    #[tokio::test]
    async fn prompt_sees_filter_for_the_tagged_format() {
        let dir = tempdir().unwrap();
        let prompt = StubPrompt::new(Some(dir.path().join("clip.avi")));
        let rec = recording(&[b"x"], RecordFormat::Avi);

        save_recording(&prompt, &rec).await;

        let (name, filter) = prompt.seen.lock().unwrap().clone().unwrap();
        assert!(name.starts_with("SRVid-"));
        assert_eq!(filter, RecordFormat::Avi.save_filter());
    }

    #[tokio::test]
    async fn write_failure_is_its_own_outcome() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.webm");
        let prompt = StubPrompt::new(Some(path));
        let rec = recording(&[b"abc"], RecordFormat::WebmVp8);

        match save_recording(&prompt, &rec).await {
            SaveOutcome::Failed(reason) => assert!(!reason.is_empty()),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn default_file_name_carries_epoch_millis() {
        let name = default_file_name();
        let millis: i64 = name.strip_prefix("SRVid-").unwrap().parse().unwrap();
        assert!(millis > 0);
    }
}
