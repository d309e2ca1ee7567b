//! # nexis-control
//!
//! Host control for Nexis: launch and terminate applications, open folders,
//! and run power, volume, and screenshot actions.
//!
//! [`Launcher`] implements [`SystemControl`] on top of the name→command
//! tables in [`LauncherConfig`]. Every action is bounded by the configured
//! timeout and reports its outcome as a sentence; nothing here returns an
//! error to the caller.

mod command;
mod platform;

use async_trait::async_trait;
use nexis_core::config::{shellexpand, LauncherConfig};
use nexis_core::error::NexisError;
use nexis_core::traits::{SystemControl, VolumeDirection};
use platform::{Action, Invocation};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Spawns and terminates host programs from the launcher tables.
pub struct Launcher {
    config: LauncherConfig,
    timeout: Duration,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        Self { config, timeout }
    }

    /// Run a platform invocation to completion within the timeout.
    async fn run(&self, inv: &Invocation) -> Result<std::process::ExitStatus, NexisError> {
        let args: Vec<&str> = inv.args.iter().map(String::as_str).collect();
        command::run_with_timeout(
            command::program(inv.program, &args),
            inv.program,
            self.timeout,
        )
        .await
    }

    /// Run a system action and pick the reply for success or failure.
    async fn system_action(&self, action: Action, done: &str, failed: &str) -> String {
        match self.run(&platform::action(action)).await {
            Ok(_) => {
                info!("system action {action:?} issued");
                done.to_string()
            }
            Err(e) => {
                warn!("system action {action:?} failed: {e}");
                format!("{failed}: {e}")
            }
        }
    }
}

fn lookup<'a>(table: &'a std::collections::BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    table.get(&name.to_lowercase()).map(String::as_str)
}

/// `~/Desktop/screenshot_YYYYMMDD_HHMMSS.png`.
fn screenshot_path(now: chrono::NaiveDateTime) -> (PathBuf, String) {
    let filename = format!("screenshot_{}.png", now.format("%Y%m%d_%H%M%S"));
    let desktop = PathBuf::from(shellexpand("~/Desktop"));
    (desktop.join(&filename), filename)
}

#[async_trait]
impl SystemControl for Launcher {
    async fn open_app(&self, name: &str) -> String {
        let Some(line) = lookup(&self.config.apps, name) else {
            return format!(
                "I don't have a shortcut for '{name}'. You can add it to the [launcher.apps] config."
            );
        };
        let line = shellexpand(line);
        match command::spawn_detached(command::shell_command(&line), name) {
            Ok(()) => {
                info!("opened {name}: {line}");
                format!("Opening {name}.")
            }
            Err(e) => {
                warn!("open {name} failed: {e}");
                format!("Couldn't find '{name}'. Check the command in your config: {line}")
            }
        }
    }

    async fn close_app(&self, name: &str) -> String {
        let Some(image) = lookup(&self.config.processes, name) else {
            return format!(
                "I don't know the process name for '{name}'. Add it to the [launcher.processes] config."
            );
        };
        match self.run(&platform::kill_process(image)).await {
            Ok(status) if status.success() => {
                info!("closed {name} ({image})");
                format!("Closed {name}.")
            }
            Ok(_) => format!("{name} doesn't seem to be running."),
            Err(e) => {
                warn!("close {name} failed: {e}");
                format!("Couldn't close {name}: {e}")
            }
        }
    }

    async fn open_folder(&self, name: &str) -> String {
        let Some(path) = lookup(&self.config.folders, name) else {
            return format!("I don't have a shortcut for the '{name}' folder.");
        };
        let path = PathBuf::from(shellexpand(path));
        let opener = platform::open_path(&path);
        let arg_refs: Vec<&str> = opener.args.iter().map(String::as_str).collect();
        match command::spawn_detached(command::program(opener.program, &arg_refs), name) {
            Ok(()) => format!("Opening your {name} folder."),
            Err(e) => {
                warn!("open folder {name} failed: {e}");
                format!("Couldn't open {name}: {e}")
            }
        }
    }

    async fn lock_screen(&self) -> String {
        self.system_action(Action::Lock, "Screen locked.", "Couldn't lock screen")
            .await
    }

    async fn shutdown(&self) -> String {
        self.system_action(
            Action::Shutdown,
            "Shutting down the computer now.",
            "Couldn't initiate shutdown",
        )
        .await
    }

    async fn restart(&self) -> String {
        self.system_action(
            Action::Restart,
            "Restarting the computer now.",
            "Couldn't initiate restart",
        )
        .await
    }

    async fn sleep(&self) -> String {
        self.system_action(Action::Sleep, "Putting the PC to sleep.", "Couldn't sleep")
            .await
    }

    async fn screenshot(&self) -> String {
        let (file, filename) = screenshot_path(chrono::Local::now().naive_local());
        match self.run(&platform::screenshot(&file)).await {
            Ok(status) if status.success() => {
                info!("screenshot saved to {}", file.display());
                format!("Screenshot saved to Desktop as {filename}.")
            }
            Ok(status) => format!("Screenshot failed: capture exited with {status}"),
            Err(e) => format!("Screenshot failed: {e}"),
        }
    }

    async fn volume(&self, direction: VolumeDirection) -> String {
        let done = match direction {
            VolumeDirection::Up => "Volume increased.",
            VolumeDirection::Down => "Volume decreased.",
            VolumeDirection::Mute => "Audio muted / unmuted.",
        };
        self.system_action(Action::Volume(direction), done, "Volume control failed")
            .await
    }
}
