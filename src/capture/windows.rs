//! Windows capture source enumeration
//!
//! Screens come from `EnumDisplayMonitors`, windows from `EnumWindows`
//! filtered to visible, titled top-level windows.

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible,
};

use super::sources::{CaptureSource, SourceKind};

/// Enumerate monitors and visible top-level windows.
pub fn list_sources() -> Vec<CaptureSource> {
    let mut sources = list_monitors();
    sources.extend(list_windows());
    sources
}

fn list_monitors() -> Vec<CaptureSource> {
    use std::mem::zeroed;

    let mut sources = Vec::new();
    let sources_ptr = &mut sources as *mut Vec<CaptureSource>;

    unsafe extern "system" fn enum_monitors_callback(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        lparam: LPARAM,
    ) -> BOOL {
        let sources = unsafe { &mut *(lparam.0 as *mut Vec<CaptureSource>) };

        let mut monitor_info: MONITORINFOEXW = unsafe { zeroed() };
        monitor_info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

        if unsafe { GetMonitorInfoW(hmonitor, &mut monitor_info.monitorInfo) }.as_bool() {
            let is_primary = (monitor_info.monitorInfo.dwFlags & 1) != 0; // MONITORINFOF_PRIMARY

            let name_len = monitor_info
                .szDevice
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(monitor_info.szDevice.len());
            let device_name = String::from_utf16_lossy(&monitor_info.szDevice[..name_len]);

            sources.push(CaptureSource {
                id: format!("screen:{}", sources.len()),
                name: if is_primary {
                    "Primary Display".to_string()
                } else {
                    device_name
                },
                kind: SourceKind::Screen,
            });
        }

        BOOL::from(true)
    }

    unsafe {
        let _ = EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(enum_monitors_callback),
            LPARAM(sources_ptr as isize),
        );
    }

    sources
}

fn list_windows() -> Vec<CaptureSource> {
    let mut sources = Vec::new();
    let sources_ptr = &mut sources as *mut Vec<CaptureSource>;

    unsafe extern "system" fn enum_windows_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let sources = unsafe { &mut *(lparam.0 as *mut Vec<CaptureSource>) };

        if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
            return BOOL::from(true);
        }

        let title_len = unsafe { GetWindowTextLengthW(hwnd) };
        if title_len == 0 {
            return BOOL::from(true);
        }

        let mut buffer = vec![0u16; title_len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
        if copied > 0 {
            sources.push(CaptureSource {
                id: format!("window:{}", hwnd.0 as isize),
                name: String::from_utf16_lossy(&buffer[..copied as usize]),
                kind: SourceKind::Window,
            });
        }

        BOOL::from(true)
    }

    unsafe {
        let _ = EnumWindows(Some(enum_windows_callback), LPARAM(sources_ptr as isize));
    }

    sources
}
