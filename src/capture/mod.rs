//! Capture source enumeration and the host pipeline seam
//!
//! Source enumeration is platform-specific; stream acquisition and encoding
//! are delegated to the webview host through the `CapturePipeline` trait.

pub mod pipeline;
pub mod sources;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

pub use pipeline::{CaptureError, CapturePipeline, StreamHandle, WebviewPipeline};
pub use sources::{list_sources, CaptureSource, SourceKind};
