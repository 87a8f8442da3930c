//! macOS capture source enumeration
//!
//! Screens come from CoreGraphics display enumeration, windows from the
//! on-screen window list.

use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_graphics::display::CGDisplay;
use core_graphics::window::{
    copy_window_info, kCGNullWindowID, kCGWindowListExcludeDesktopElements,
    kCGWindowListOptionOnScreenOnly,
};

use super::sources::{CaptureSource, SourceKind};

/// Enumerate screens and on-screen windows.
pub fn list_sources() -> Vec<CaptureSource> {
    let mut sources = list_screens();
    sources.extend(list_windows());
    sources
}

fn list_screens() -> Vec<CaptureSource> {
    let display_ids = CGDisplay::active_displays().unwrap_or_default();

    display_ids
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let display = CGDisplay::new(id);
            let name = if display.is_main() {
                "Main Display".to_string()
            } else {
                format!("Display {}", index + 1)
            };

            CaptureSource {
                id: format!("screen:{id}"),
                name,
                kind: SourceKind::Screen,
            }
        })
        .collect()
}

fn list_windows() -> Vec<CaptureSource> {
    let Some(info) = copy_window_info(
        kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements,
        kCGNullWindowID,
    ) else {
        return Vec::new();
    };

    let mut sources = Vec::new();
    for item in info.iter() {
        let entry = unsafe {
            CFDictionary::<CFString, CFType>::wrap_under_get_rule(*item as CFDictionaryRef)
        };

        // Layer 0 filters out menu bar items, the dock, and overlays.
        let layer = dict_number(&entry, "kCGWindowLayer").unwrap_or(-1);
        if layer != 0 {
            continue;
        }

        let Some(number) = dict_number(&entry, "kCGWindowNumber") else {
            continue;
        };

        let title = dict_string(&entry, "kCGWindowName");
        let owner = dict_string(&entry, "kCGWindowOwnerName");
        let name = match (owner, title) {
            (Some(owner), Some(title)) if !title.is_empty() => format!("{owner} — {title}"),
            (Some(owner), _) => owner,
            (None, Some(title)) if !title.is_empty() => title,
            _ => continue,
        };

        sources.push(CaptureSource {
            id: format!("window:{number}"),
            name,
            kind: SourceKind::Window,
        });
    }

    sources
}

fn dict_string(entry: &CFDictionary<CFString, CFType>, key: &'static str) -> Option<String> {
    entry
        .find(CFString::from_static_string(key))
        .and_then(|value| value.downcast::<CFString>())
        .map(|value| value.to_string())
}

fn dict_number(entry: &CFDictionary<CFString, CFType>, key: &'static str) -> Option<i64> {
    entry
        .find(CFString::from_static_string(key))
        .and_then(|value| value.downcast::<CFNumber>())
        .and_then(|value| value.to_i64())
}
