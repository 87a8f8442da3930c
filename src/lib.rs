//! SRVid - minimal screen recorder.
//!
//! Pick a capture source, choose a container/codec combination, record into
//! an in-memory buffer, and save through the native dialog. Capture and
//! encoding are hosted by the webview; this crate owns the session
//! lifecycle, the save flow, and the command/menu surface.

pub mod capture;
pub mod commands;
pub mod format;
pub mod menu;
pub mod save;
pub mod session;

use capture::WebviewPipeline;
use commands::recording::RecorderState;
use session::RecordingController;
use tauri::Manager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srvid=debug,tauri=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SRVid v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .menu(menu::build)
        .on_menu_event(|app, event| menu::on_menu_event(app, event))
        .invoke_handler(tauri::generate_handler![
            commands::recording::run_action,
            commands::recording::arm_source,
            commands::recording::confirm_capture,
            commands::recording::capture_failed,
            commands::recording::select_format,
            commands::recording::record_chunk,
            commands::recording::finalize_recording,
            commands::recording::get_session_phase,
            commands::recording::get_selected_format,
            commands::recording::get_audio_enabled,
        ])
        .setup(|app| {
            let pipeline = Box::new(WebviewPipeline::new(app.handle().clone()));
            app.manage(RecorderState::new(RecordingController::new(pipeline)));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
