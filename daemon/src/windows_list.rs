/// Top-level window enumeration.
///
/// On Windows this walks every top-level window with `EnumWindows` and reads
/// titles with `GetWindowTextW`. On other platforms the public API compiles but
/// reports no windows, so the monitor simply idles.
use anyhow::Result;

/// A top-level window as seen at poll time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Raw OS window handle. Only used for diagnostics.
    pub handle: isize,
    pub title: String,
}

impl WindowInfo {
    pub fn new(handle: isize, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }
}

/// Inbound side of the monitor: a read-only view of the desktop.
pub trait WindowSource {
    /// Returns every top-level window. Order is unspecified.
    fn list_windows(&mut self) -> Result<Vec<WindowInfo>>;
    /// Returns the foreground window, or `None` if no window has focus.
    fn focused_window(&mut self) -> Result<Option<WindowInfo>>;
}

/// [`WindowSource`] for the current desktop session.
#[derive(Debug, Default)]
pub struct DesktopWindows;

impl WindowSource for DesktopWindows {
    fn list_windows(&mut self) -> Result<Vec<WindowInfo>> {
        imp::list_windows()
    }

    fn focused_window(&mut self) -> Result<Option<WindowInfo>> {
        imp::focused_window()
    }
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(windows)]
mod imp {
    use anyhow::{Context, Result};
    use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW,
    };

    use super::WindowInfo;

    /// Reads the title of `hwnd`. Returns an empty string for untitled windows.
    fn window_title(hwnd: HWND) -> String {
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return String::new();
        }
        let mut buf: Vec<u16> = vec![0; len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
        if copied <= 0 {
            return String::new();
        }
        String::from_utf16_lossy(&buf[..copied as usize])
    }

    /// `EnumWindows` callback. `lparam` carries a `*mut Vec<WindowInfo>`.
    unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowInfo>) };
        windows.push(WindowInfo::new(hwnd.0, window_title(hwnd)));
        BOOL(1)
    }

    pub fn list_windows() -> Result<Vec<WindowInfo>> {
        let mut windows: Vec<WindowInfo> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_window),
                LPARAM(&mut windows as *mut Vec<WindowInfo> as isize),
            )
        }
        .context("EnumWindows failed")?;
        Ok(windows)
    }

    pub fn focused_window() -> Result<Option<WindowInfo>> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0 == 0 {
            return Ok(None);
        }
        Ok(Some(WindowInfo::new(hwnd.0, window_title(hwnd))))
    }
}

// ── Non-Windows stub ──────────────────────────────────────────────────────────

#[cfg(not(windows))]
mod imp {
    use anyhow::Result;

    use super::WindowInfo;

    pub fn list_windows() -> Result<Vec<WindowInfo>> {
        Ok(Vec::new())
    }

    pub fn focused_window() -> Result<Option<WindowInfo>> {
        Ok(None)
    }
}
