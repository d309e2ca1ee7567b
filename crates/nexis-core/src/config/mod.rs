mod defaults;
mod launcher;


pub use launcher::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NexisError;
use defaults::*;

/// Top-level Nexis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub launcher: LauncherConfig,
}

/// General assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Assistant identity, used in the banner and console echo.
    #[serde(default = "default_name")]
    pub name: String,
    /// How the assistant addresses the user.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// When set, utterances without this word are ignored.
    #[serde(default)]
    pub wake_word: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            user_name: default_user_name(),
            wake_word: None,
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl AssistantConfig {
    /// The wake word, lowercased, if one is configured and non-blank.
    pub fn wake_word(&self) -> Option<String> {
        self.wake_word
            .as_deref()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
    }
}

/// Speech input/output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// External speech recognizer. Run once per utterance; its stdout is the
    /// transcript. `None` = keyboard input.
    #[serde(default)]
    pub stt_command: Option<String>,
    /// External speech synthesizer (e.g. `espeak -s {rate}`, `say -r {rate}`).
    /// `{rate}` and `{voice}` are substituted; the text is passed as the final
    /// argument. `None` = console output only.
    #[serde(default)]
    pub tts_command: Option<String>,
    /// Command that prints one available voice per line (`nexis voices`).
    #[serde(default)]
    pub tts_voices_command: Option<String>,
    /// Words per minute, passed to engines that accept a rate flag.
    #[serde(default = "default_tts_rate")]
    pub tts_rate: u32,
    /// Voice name passed to the synthesizer, if it supports one.
    #[serde(default)]
    pub tts_voice: Option<String>,
    /// Seconds to wait for the recognizer before giving up on an utterance.
    #[serde(default = "default_listen_timeout")]
    pub listen_timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_command: None,
            tts_command: None,
            tts_voices_command: None,
            tts_rate: default_tts_rate(),
            tts_voice: None,
            listen_timeout_secs: default_listen_timeout(),
        }
    }
}

/// Knowledge lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Trim every answer to this many sentences.
    #[serde(default = "default_answer_max_sentences")]
    pub answer_max_sentences: usize,
    /// Encyclopedia search candidates to try.
    #[serde(default = "default_wikipedia_results")]
    pub wikipedia_results: usize,
    #[serde(default = "default_knowledge_timeout")]
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            answer_max_sentences: default_answer_max_sentences(),
            wikipedia_results: default_wikipedia_results(),
            timeout_secs: default_knowledge_timeout(),
        }
    }
}

/// Memory config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Scheduler configuration -- background reminder delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Expand `~` to the home directory and `%VAR%` to environment values.
pub fn shellexpand(path: &str) -> String {
    let mut out = path.to_string();
    if let Some(rest) = out.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            out = format!("{home}/{rest}");
        }
    } else if out == "~" {
        if let Some(home) = home_dir() {
            out = home;
        }
    }
    expand_percent_vars(&out)
}

fn home_dir() -> Option<String> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|h| h.to_string_lossy().into_owned())
}

/// Replace `%NAME%` with the value of `NAME`; unknown variables are left as-is.
fn expand_percent_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        let after = &rest[start + 1..];
        let Some(len) = after.find('%') else {
            break;
        };
        let name = &after[..len];
        out.push_str(&rest[..start]);
        match std::env::var(name) {
            Ok(value) if !name.is_empty() => out.push_str(&value),
            _ => {
                out.push('%');
                out.push_str(name);
                out.push('%');
            }
        }
        rest = &after[len + 1..];
    }
    out.push_str(rest);
    out
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, NexisError> {
    Ok(read(path)?.unwrap_or_default())
}

/// Read configuration from a TOML file, `None` if the file does not exist.
///
/// Lets the caller report the fallback to defaults once logging is up.
pub fn read(path: &str) -> Result<Option<Config>, NexisError> {
    let path = Path::new(path);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| NexisError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| NexisError::Config(format!("failed to parse config: {}", e)))?;

    Ok(Some(config))
}
