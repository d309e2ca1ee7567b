//! External speech-to-text command.

use crate::keyboard::KeyboardListener;
use crate::shell_command;
use async_trait::async_trait;
use nexis_core::error::NexisError;
use nexis_core::traits::Listener;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs a recognizer command once per utterance and reads the transcript
/// from its stdout.
///
/// A timeout or an empty transcript yields `""` (nothing heard). If the
/// command cannot be started at all, input falls back to the keyboard.
pub struct RecognizerListener {
    command: String,
    timeout: Duration,
    /// Started on first use so stdin is left alone while the recognizer works.
    fallback: OnceLock<KeyboardListener>,
}

impl RecognizerListener {
    pub fn new(command: String, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            fallback: OnceLock::new(),
        }
    }
}

/// Normalize raw recognizer output: first non-blank line, trimmed, lowercased.
pub(crate) fn transcript(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_lowercase()
}

/// Run the recognizer once. `Ok(None)` means it ran but heard nothing usable.
pub(crate) async fn recognize(
    command: &str,
    timeout: Duration,
) -> Result<Option<String>, NexisError> {
    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => {
            result.map_err(|e| NexisError::Voice(format!("recognizer failed to start: {e}")))?
        }
        Err(_) => {
            info!("no speech detected (timeout)");
            return Ok(None);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("recognizer exited with {}: {}", output.status, stderr.trim());
        return Ok(None);
    }

    let text = transcript(&output.stdout);
    Ok((!text.is_empty()).then_some(text))
}

#[async_trait]
impl Listener for RecognizerListener {
    fn name(&self) -> &str {
        "recognizer"
    }

    async fn next_utterance(&self) -> Result<String, NexisError> {
        println!("Listening...");
        match recognize(&self.command, self.timeout).await {
            Ok(Some(text)) => {
                println!("You said: \"{text}\"");
                Ok(text)
            }
            Ok(None) => Ok(String::new()),
            Err(e) => {
                warn!("{e}; falling back to keyboard input");
                self.fallback
                    .get_or_init(KeyboardListener::stdin)
                    .next_utterance()
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_takes_first_line() {
        assert_eq!(transcript(b"\n  Open Firefox \nnoise\n"), "open firefox");
        assert_eq!(transcript(b"   \n"), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognize_reads_stdout() {
        let heard = recognize("echo 'What Time Is It'", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(heard.as_deref(), Some("what time is it"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognize_timeout_is_silence() {
        let heard = recognize("sleep 5", Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(heard, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognize_failure_is_silence() {
        let heard = recognize("exit 1", Duration::from_secs(5)).await.unwrap();
        assert_eq!(heard, None);
    }
}
