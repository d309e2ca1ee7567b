//! Console echo plus an optional external synthesizer.

use crate::shell_command;
use async_trait::async_trait;
use nexis_core::config::VoiceConfig;
use nexis_core::error::NexisError;
use nexis_core::traits::Speaker;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Prints every line as `NAME: text` and, when a synthesizer is configured,
/// speaks it. One utterance at a time: the session loop and the reminder
/// scheduler share this instance.
pub struct CommandSpeaker {
    name: String,
    argv: Option<Vec<String>>,
    voices_command: Option<String>,
    speaking: Mutex<()>,
}

impl CommandSpeaker {
    pub fn new(name: &str, config: &VoiceConfig) -> Self {
        let argv = config
            .tts_command
            .as_deref()
            .map(|t| synth_argv(t, config.tts_rate, config.tts_voice.as_deref()))
            .filter(|argv| !argv.is_empty());
        Self {
            name: name.to_string(),
            argv,
            voices_command: config.tts_voices_command.clone(),
            speaking: Mutex::new(()),
        }
    }

    async fn synthesize(&self, argv: &[String], text: &str) -> Result<(), NexisError> {
        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| NexisError::Voice(format!("synthesizer failed to start: {e}")))?;
        if !status.success() {
            return Err(NexisError::Voice(format!("synthesizer exited with {status}")));
        }
        Ok(())
    }
}

/// Split a synthesizer template into argv, substituting `{rate}` and `{voice}`.
///
/// With no voice configured, the `{voice}` token is dropped together with
/// the flag in front of it (`-v {voice}` disappears entirely).
pub(crate) fn synth_argv(template: &str, rate: u32, voice: Option<&str>) -> Vec<String> {
    let mut argv: Vec<String> = Vec::new();
    for token in template.split_whitespace() {
        if token.contains("{voice}") {
            match voice {
                Some(v) => argv.push(token.replace("{voice}", v)),
                None => {
                    let flag_before = argv.len() > 1
                        && argv.last().is_some_and(|t| t.starts_with('-'));
                    if token == "{voice}" && flag_before {
                        argv.pop();
                    }
                }
            }
            continue;
        }
        argv.push(token.replace("{rate}", &rate.to_string()));
    }
    argv
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<(), NexisError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let _guard = self.speaking.lock().await;
        println!("{}: {text}", self.name);
        if let Some(argv) = &self.argv {
            debug!("synthesizing {} chars", text.len());
            self.synthesize(argv, text).await?;
        }
        Ok(())
    }

    async fn voices(&self) -> Result<Vec<String>, NexisError> {
        let Some(cmd) = self.voices_command.as_deref() else {
            return Ok(Vec::new());
        };
        let output = shell_command(cmd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| NexisError::Voice(format!("voice listing failed: {e}")))?;
        if !output.status.success() {
            warn!("voice listing exited with {}", output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_argv_substitutes_rate_and_voice() {
        let argv = synth_argv("espeak -s {rate} -v {voice}", 175, Some("en-us"));
        assert_eq!(argv, vec!["espeak", "-s", "175", "-v", "en-us"]);
    }

    #[test]
    fn test_argv_drops_unset_voice_flag() {
        let argv = synth_argv("say -r {rate} -v {voice}", 200, None);
        assert_eq!(argv, vec!["say", "-r", "200"]);
    }

    #[test]
    fn test_argv_inline_voice_token() {
        assert_eq!(synth_argv("tts --voice={voice}", 175, None), vec!["tts"]);
        assert_eq!(
            synth_argv("tts --voice={voice}", 175, Some("amy")),
            vec!["tts", "--voice=amy"]
        );
    }

    #[tokio::test]
    async fn test_console_only_speaker_succeeds() {
        let speaker = CommandSpeaker::new("NEXIS", &VoiceConfig::default());
        speaker.speak("hello there").await.unwrap();
        speaker.speak("   ").await.unwrap();
        assert!(speaker.voices().await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_synthesizer_is_voice_error() {
        let config = VoiceConfig {
            tts_command: Some("false".into()),
            ..Default::default()
        };
        let speaker = CommandSpeaker::new("NEXIS", &config);
        let err = speaker.speak("hi").await.unwrap_err();
        assert!(matches!(err, NexisError::Voice(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_utterances_do_not_overlap() {
        use std::os::unix::fs::PermissionsExt;

        let script = std::env::temp_dir().join(format!("__nexis_tts_{}.sh", std::process::id()));
        std::fs::write(&script, "#!/bin/sh\nsleep 0.3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let config = VoiceConfig {
            tts_command: Some(script.to_string_lossy().to_string()),
            ..Default::default()
        };
        let speaker = Arc::new(CommandSpeaker::new("NEXIS", &config));
        let started = Instant::now();
        let a = tokio::spawn({
            let s = speaker.clone();
            async move { s.speak("one").await }
        });
        let b = tokio::spawn({
            let s = speaker.clone();
            async move { s.speak("two").await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(550));
        let _ = std::fs::remove_file(&script);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_voices_lists_lines() {
        let config = VoiceConfig {
            tts_voices_command: Some("printf 'alex\\n\\nsamantha\\n'".into()),
            ..Default::default()
        };
        let speaker = CommandSpeaker::new("NEXIS", &config);
        assert_eq!(speaker.voices().await.unwrap(), vec!["alex", "samantha"]);
    }
}
