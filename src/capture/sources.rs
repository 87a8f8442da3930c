//! Capture source descriptions and enumeration
//!
//! A capture source is an opaque target handed back by the host: a screen or
//! a window, identified by a string token plus a display name. The list is
//! queried fresh on every picker request.

use serde::{Deserialize, Serialize};

/// Kind of capture target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Screen,
    Window,
}

/// One selectable capture target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSource {
    /// Opaque identifier, e.g. `screen:1` or `window:4242`
    pub id: String,

    /// Human-readable name shown in the picker
    pub name: String,

    /// Whether this is a whole screen or a single window
    pub kind: SourceKind,
}

impl CaptureSource {
    /// Picker label, name plus identifier.
    pub fn label(&self) -> String {
        format!("{} [ID {}]", self.name, self.id)
    }
}

/// Enumerate the capture targets the host currently offers.
pub fn list_sources() -> Vec<CaptureSource> {
    #[cfg(target_os = "macos")]
    {
        super::macos::list_sources()
    }

    #[cfg(target_os = "windows")]
    {
        super::windows::list_sources()
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Vec::new()
    }
}
