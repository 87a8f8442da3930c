//! Tauri command handlers
//!
//! The IPC surface of the recorder. Inline UI controls and the application
//! menu both go through the `AppAction` table in `actions` — one command
//! layer, two front ends.

pub mod actions;
pub mod recording;

use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

/// Show a modal notice. Every user-facing failure in the recorder ends here;
/// nothing is retried.
pub(crate) fn show_notice<R: Runtime>(
    app: &AppHandle<R>,
    title: &str,
    message: &str,
    kind: MessageDialogKind,
) {
    app.dialog()
        .message(message)
        .title(title)
        .kind(kind)
        .show(|_| {});
}
