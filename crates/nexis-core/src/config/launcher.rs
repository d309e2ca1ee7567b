use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::defaults::default_launcher_timeout;

/// Launcher configuration: spoken name → command tables.
///
/// Names are matched against lowercased input, so keys should be lowercase.
/// Commands are run through the platform shell; `~/` and `%VAR%` are expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Upper bound on any single launch/close/system action.
    #[serde(default = "default_launcher_timeout")]
    pub timeout_secs: u64,
    /// Application name → launch command.
    #[serde(default = "default_apps")]
    pub apps: BTreeMap<String, String>,
    /// Folder name → path.
    #[serde(default = "default_folders")]
    pub folders: BTreeMap<String, String>,
    /// Application name → process image name used to terminate it.
    #[serde(default = "default_processes")]
    pub processes: BTreeMap<String, String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_launcher_timeout(),
            apps: default_apps(),
            folders: default_folders(),
            processes: default_processes(),
        }
    }
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[cfg(target_os = "windows")]
pub fn default_apps() -> BTreeMap<String, String> {
    const VSCODE: &str = r"%LOCALAPPDATA%\Programs\Microsoft VS Code\Code.exe";
    const CHROME: &str = r"C:\Program Files\Google\Chrome\Application\chrome.exe";
    table(&[
        ("chrome", CHROME),
        ("google chrome", CHROME),
        ("firefox", r"C:\Program Files\Mozilla Firefox\firefox.exe"),
        ("notepad", "notepad.exe"),
        ("calculator", "calc.exe"),
        ("vs code", VSCODE),
        ("vscode", VSCODE),
        ("visual studio code", VSCODE),
        ("file explorer", "explorer.exe"),
        ("task manager", "taskmgr.exe"),
        ("settings", "start ms-settings:"),
        ("paint", "mspaint.exe"),
        ("cmd", "cmd.exe"),
        ("command prompt", "cmd.exe"),
        ("powershell", "powershell.exe"),
        ("spotify", r"%APPDATA%\Spotify\Spotify.exe"),
        ("word", r"C:\Program Files\Microsoft Office\root\Office16\WINWORD.EXE"),
        ("excel", r"C:\Program Files\Microsoft Office\root\Office16\EXCEL.EXE"),
        ("vlc", r"C:\Program Files\VideoLAN\VLC\vlc.exe"),
    ])
}

#[cfg(target_os = "macos")]
pub fn default_apps() -> BTreeMap<String, String> {
    table(&[
        ("chrome", "open -a 'Google Chrome'"),
        ("google chrome", "open -a 'Google Chrome'"),
        ("firefox", "open -a Firefox"),
        ("safari", "open -a Safari"),
        ("code", "open -a 'Visual Studio Code'"),
        ("vs code", "open -a 'Visual Studio Code'"),
        ("vscode", "open -a 'Visual Studio Code'"),
        ("visual studio code", "open -a 'Visual Studio Code'"),
        ("finder", "open -a Finder"),
        ("terminal", "open -a Terminal"),
        ("calculator", "open -a Calculator"),
        ("settings", "open -a 'System Settings'"),
        ("spotify", "open -a Spotify"),
        ("vlc", "open -a VLC"),
    ])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_apps() -> BTreeMap<String, String> {
    table(&[
        ("chrome", "google-chrome"),
        ("google chrome", "google-chrome"),
        ("firefox", "firefox"),
        ("code", "code"),
        ("vs code", "code"),
        ("vscode", "code"),
        ("visual studio code", "code"),
        ("file explorer", "xdg-open ~"),
        ("terminal", "x-terminal-emulator"),
        ("calculator", "gnome-calculator"),
        ("settings", "gnome-control-center"),
        ("spotify", "spotify"),
        ("vlc", "vlc"),
    ])
}

#[cfg(target_os = "windows")]
pub fn default_processes() -> BTreeMap<String, String> {
    table(&[
        ("chrome", "chrome.exe"),
        ("google chrome", "chrome.exe"),
        ("firefox", "firefox.exe"),
        ("notepad", "notepad.exe"),
        ("calculator", "Calculator.exe"),
        ("vs code", "Code.exe"),
        ("vscode", "Code.exe"),
        ("visual studio code", "Code.exe"),
        ("spotify", "Spotify.exe"),
        ("vlc", "vlc.exe"),
        ("word", "WINWORD.EXE"),
        ("excel", "EXCEL.EXE"),
    ])
}

#[cfg(target_os = "macos")]
pub fn default_processes() -> BTreeMap<String, String> {
    table(&[
        ("chrome", "Google Chrome"),
        ("google chrome", "Google Chrome"),
        ("firefox", "firefox"),
        ("safari", "Safari"),
        ("code", "Electron"),
        ("vs code", "Electron"),
        ("vscode", "Electron"),
        ("visual studio code", "Electron"),
        ("spotify", "Spotify"),
        ("vlc", "VLC"),
    ])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_processes() -> BTreeMap<String, String> {
    table(&[
        ("chrome", "chrome"),
        ("google chrome", "chrome"),
        ("firefox", "firefox"),
        ("code", "code"),
        ("vs code", "code"),
        ("vscode", "code"),
        ("visual studio code", "code"),
        ("calculator", "gnome-calculator"),
        ("spotify", "spotify"),
        ("vlc", "vlc"),
    ])
}

pub fn default_folders() -> BTreeMap<String, String> {
    table(&[
        ("downloads", "~/Downloads"),
        ("documents", "~/Documents"),
        ("desktop", "~/Desktop"),
        ("pictures", "~/Pictures"),
        ("music", "~/Music"),
        ("videos", "~/Videos"),
    ])
}
