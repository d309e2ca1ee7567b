//! # nexis-voice
//!
//! Speech input and output for Nexis.
//!
//! - [`KeyboardListener`]: typed lines from stdin (the default, and the
//!   fallback when a recognizer fails to start)
//! - [`RecognizerListener`]: an external speech-to-text command, one run per utterance
//! - [`CommandSpeaker`]: console echo plus an optional external synthesizer

mod keyboard;
mod recognizer;
mod speaker;

pub use keyboard::KeyboardListener;
pub use recognizer::RecognizerListener;
pub use speaker::CommandSpeaker;

use nexis_core::config::VoiceConfig;
use nexis_core::traits::{Listener, Speaker};
use std::sync::Arc;
use tokio::process::Command;

/// Pick the listener for this configuration.
pub fn build_listener(config: &VoiceConfig) -> Arc<dyn Listener> {
    match config.stt_command.as_deref().map(str::trim) {
        Some(cmd) if !cmd.is_empty() => Arc::new(RecognizerListener::new(
            cmd.to_string(),
            config.listen_timeout_secs,
        )),
        _ => Arc::new(KeyboardListener::stdin()),
    }
}

/// Build the speaker. `name` prefixes every console echo.
pub fn build_speaker(name: &str, config: &VoiceConfig) -> Arc<dyn Speaker> {
    Arc::new(CommandSpeaker::new(name, config))
}

/// Run `line` through the platform shell.
pub(crate) fn shell_command(line: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    }
    #[cfg(not(target_os = "windows"))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_stt_command_uses_keyboard() {
        let config = VoiceConfig {
            stt_command: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(build_listener(&config).name(), "keyboard");
    }

    #[test]
    fn test_stt_command_uses_recognizer() {
        let config = VoiceConfig {
            stt_command: Some("whisper-cli --once".into()),
            ..Default::default()
        };
        assert_eq!(build_listener(&config).name(), "recognizer");
    }
}
