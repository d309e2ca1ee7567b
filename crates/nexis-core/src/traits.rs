use crate::error::NexisError;
use async_trait::async_trait;
use std::fmt;

/// Speech input: the ears.
///
/// Implementations capture one utterance (microphone transcription or a
/// typed line) and hand it back lowercased and trimmed.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Human-readable listener name.
    fn name(&self) -> &str;

    /// Block until the next utterance is available.
    ///
    /// Returns an empty string when nothing intelligible was heard before
    /// the listen timeout.
    async fn next_utterance(&self) -> Result<String, NexisError>;
}

/// Speech output: the voice.
///
/// Both the session loop and the reminder scheduler speak through the same
/// instance, so implementations must play at most one utterance at a time.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text` aloud. May block for the duration of playback.
    async fn speak(&self, text: &str) -> Result<(), NexisError>;

    /// Voices the underlying engine offers, if it can enumerate them.
    async fn voices(&self) -> Result<Vec<String>, NexisError> {
        Ok(Vec::new())
    }
}

/// Direction for a volume change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Up,
    Down,
    Mute,
}

impl fmt::Display for VolumeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Mute => f.write_str("mute"),
        }
    }
}

/// Application, folder, and power control on the host.
///
/// Every method returns a sentence suitable for speaking back to the user.
/// Failures are described in that sentence; these calls never error.
#[async_trait]
pub trait SystemControl: Send + Sync {
    /// Launch a configured application by its table name.
    async fn open_app(&self, name: &str) -> String;

    /// Terminate a configured application by its table name.
    async fn close_app(&self, name: &str) -> String;

    /// Open a configured folder in the file manager.
    async fn open_folder(&self, name: &str) -> String;

    async fn lock_screen(&self) -> String;

    async fn shutdown(&self) -> String;

    async fn restart(&self) -> String;

    async fn sleep(&self) -> String;

    async fn screenshot(&self) -> String;

    async fn volume(&self, direction: VolumeDirection) -> String;
}

/// Knowledge lookup: encyclopedia and web search.
#[async_trait]
pub trait Knowledge: Send + Sync {
    /// Answer `query` in a couple of sentences.
    ///
    /// With `prefer_encyclopedia` the encyclopedia is asked first and the web
    /// search is the fallback; otherwise the order is reversed. Always returns
    /// a non-empty sentence, "I couldn't find..." included.
    async fn find_answer(&self, query: &str, prefer_encyclopedia: bool) -> String;
}
