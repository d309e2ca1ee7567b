//! Platform-specific commands for system actions.
//!
//! - **Windows**: `rundll32`, `shutdown`, `taskkill`, PowerShell
//! - **macOS**: `pmset`, `osascript`, `screencapture`, `pkill`
//! - **Linux**: `loginctl`, `systemctl`, `pactl`, `gnome-screenshot`, `pkill`

use nexis_core::traits::VolumeDirection;
use std::path::Path;

/// A program plus arguments, run directly (no shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// A system action the launcher knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Lock,
    Shutdown,
    Restart,
    Sleep,
    Volume(VolumeDirection),
}

#[cfg(target_os = "windows")]
pub(crate) fn action(action: Action) -> Invocation {
    const SEND_KEYS: &str = "(New-Object -com WScript.Shell).SendKeys";
    match action {
        Action::Lock => Invocation::new("rundll32.exe", &["user32.dll,LockWorkStation"]),
        Action::Shutdown => Invocation::new("shutdown", &["/s", "/t", "10"]),
        Action::Restart => Invocation::new("shutdown", &["/r", "/t", "10"]),
        Action::Sleep => {
            Invocation::new("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"])
        }
        Action::Volume(dir) => {
            let script = match dir {
                VolumeDirection::Up => format!("(1..5) | % {{ {SEND_KEYS}([char]175) }}"),
                VolumeDirection::Down => format!("(1..5) | % {{ {SEND_KEYS}([char]174) }}"),
                VolumeDirection::Mute => format!("{SEND_KEYS}([char]173)"),
            };
            Invocation::new("powershell", &["-NoProfile", "-Command", &script])
        }
    }
}

#[cfg(target_os = "macos")]
pub(crate) fn action(action: Action) -> Invocation {
    match action {
        Action::Lock => Invocation::new("pmset", &["displaysleepnow"]),
        Action::Shutdown => Invocation::new(
            "osascript",
            &["-e", "tell app \"System Events\" to shut down"],
        ),
        Action::Restart => {
            Invocation::new("osascript", &["-e", "tell app \"System Events\" to restart"])
        }
        Action::Sleep => Invocation::new("pmset", &["sleepnow"]),
        Action::Volume(dir) => {
            let script = match dir {
                VolumeDirection::Up => {
                    "set volume output volume ((output volume of (get volume settings)) + 10)"
                }
                VolumeDirection::Down => {
                    "set volume output volume ((output volume of (get volume settings)) - 10)"
                }
                VolumeDirection::Mute => {
                    "set volume output muted (not (output muted of (get volume settings)))"
                }
            };
            Invocation::new("osascript", &["-e", script])
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub(crate) fn action(action: Action) -> Invocation {
    match action {
        Action::Lock => Invocation::new("loginctl", &["lock-session"]),
        Action::Shutdown => Invocation::new("systemctl", &["poweroff"]),
        Action::Restart => Invocation::new("systemctl", &["reboot"]),
        Action::Sleep => Invocation::new("systemctl", &["suspend"]),
        Action::Volume(dir) => match dir {
            VolumeDirection::Up => {
                Invocation::new("pactl", &["set-sink-volume", "@DEFAULT_SINK@", "+10%"])
            }
            VolumeDirection::Down => {
                Invocation::new("pactl", &["set-sink-volume", "@DEFAULT_SINK@", "-10%"])
            }
            VolumeDirection::Mute => {
                Invocation::new("pactl", &["set-sink-mute", "@DEFAULT_SINK@", "toggle"])
            }
        },
    }
}

/// Terminate every process with the given image name.
#[cfg(target_os = "windows")]
pub(crate) fn kill_process(image: &str) -> Invocation {
    Invocation::new("taskkill", &["/F", "/IM", image, "/T"])
}

/// Terminate every process with the given image name.
#[cfg(not(target_os = "windows"))]
pub(crate) fn kill_process(image: &str) -> Invocation {
    Invocation::new("pkill", &["-x", image])
}

/// Open a folder in the platform file manager.
#[cfg(target_os = "windows")]
pub(crate) fn open_path(path: &Path) -> Invocation {
    Invocation::new("explorer", &[&path.to_string_lossy()])
}

/// Open a folder in the platform file manager.
#[cfg(target_os = "macos")]
pub(crate) fn open_path(path: &Path) -> Invocation {
    Invocation::new("open", &[&path.to_string_lossy()])
}

/// Open a folder in the platform file manager.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub(crate) fn open_path(path: &Path) -> Invocation {
    Invocation::new("xdg-open", &[&path.to_string_lossy()])
}

/// Save a full-screen capture to `file`.
#[cfg(target_os = "windows")]
pub(crate) fn screenshot(file: &Path) -> Invocation {
    let script = format!(
        "Add-Type -AssemblyName System.Windows.Forms; Add-Type -AssemblyName System.Drawing; \
         $s=[System.Windows.Forms.Screen]::PrimaryScreen.Bounds; \
         $b=New-Object System.Drawing.Bitmap($s.Width,$s.Height); \
         $g=[System.Drawing.Graphics]::FromImage($b); \
         $g.CopyFromScreen($s.Location,[System.Drawing.Point]::Empty,$s.Size); \
         $b.Save('{}'); $g.Dispose(); $b.Dispose()",
        file.display()
    );
    Invocation::new("powershell", &["-NoProfile", "-Command", &script])
}

/// Save a full-screen capture to `file`.
#[cfg(target_os = "macos")]
pub(crate) fn screenshot(file: &Path) -> Invocation {
    Invocation::new("screencapture", &["-x", &file.to_string_lossy()])
}

/// Save a full-screen capture to `file`.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub(crate) fn screenshot(file: &Path) -> Invocation {
    Invocation::new("gnome-screenshot", &["-f", &file.to_string_lossy()])
}
