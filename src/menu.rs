//! Application menu
//!
//! Mirrors the inline controls through the shared action table (same ids,
//! same handlers) and adds window management plus static About entries.

use tauri::menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, SubmenuBuilder};
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::MessageDialogKind;

use crate::commands::actions::{self, AppAction};
use crate::commands::show_notice;

const MENU_ABOUT_APP: &str = "about-app";
const MENU_DOCS_TAURI: &str = "docs-tauri";
const MENU_DOCS_MEDIA_RECORDER: &str = "docs-media-recorder";

/// Build the application menu.
pub fn build<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<Menu<R>> {
    let window = SubmenuBuilder::new(app, "Window")
        .fullscreen()
        .minimize()
        .separator()
        .close_window()
        .quit()
        .build()?;

    let mut recording = SubmenuBuilder::new(app, "Recording");
    for action in AppAction::ALL {
        let mut item = MenuItemBuilder::with_id(action.id(), action.menu_label());
        if let Some(accelerator) = action.accelerator() {
            item = item.accelerator(accelerator);
        }
        recording = recording.item(&item.build(app)?);
    }
    let recording = recording.build()?;

    let about = SubmenuBuilder::new(app, "About")
        .text(MENU_ABOUT_APP, "About SRVid…")
        .separator()
        .text(MENU_DOCS_TAURI, "Tauri Documentation")
        .text(MENU_DOCS_MEDIA_RECORDER, "MediaRecorder Reference")
        .build()?;

    MenuBuilder::new(app)
        .items(&[&window, &recording, &about])
        .build()
}

/// Route menu events into the shared action table.
pub fn on_menu_event<R: Runtime>(app: &AppHandle<R>, event: MenuEvent) {
    let id = event.id().as_ref();

    if let Some(action) = AppAction::from_id(id) {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            actions::dispatch(&app, action).await;
        });
        return;
    }

    match id {
        MENU_ABOUT_APP => show_notice(
            app,
            "About SRVid",
            &format!(
                "SRVid v{} — a minimal screen recorder. Pick a screen or window, \
                 optionally record the microphone, and save the result where you like.",
                env!("CARGO_PKG_VERSION")
            ),
            MessageDialogKind::Info,
        ),
        MENU_DOCS_TAURI => open_link(app, "https://tauri.app/"),
        MENU_DOCS_MEDIA_RECORDER => open_link(
            app,
            "https://developer.mozilla.org/en-US/docs/Web/API/MediaRecorder",
        ),
        other => tracing::warn!("unhandled menu item: {other}"),
    }
}

fn open_link<R: Runtime>(app: &AppHandle<R>, url: &str) {
    use tauri_plugin_shell::ShellExt;

    if let Err(e) = app.shell().open(url, None) {
        tracing::warn!("failed to open {url}: {e}");
    }
}
