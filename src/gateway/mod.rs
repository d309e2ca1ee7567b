//! Session loop: listen, route, speak, repeat.
//!
//! Also hosts the background [`scheduler::ReminderScheduler`]. Faults inside
//! a turn are logged and answered with a generic apology; only a farewell,
//! Ctrl-C, or a listener that keeps failing ends the session.

pub mod scheduler;

use crate::banner;
use crate::router::Router;
use nexis_core::config::Config;
use nexis_core::sanitize::sanitize_for_speech;
use nexis_core::traits::{Listener, Speaker};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Spoken when a turn fails for any reason.
pub const APOLOGY: &str = "Something went wrong. Please try again.";

/// Phrases answered with the help text instead of being routed.
const HELP_PHRASES: &[&str] = &["help", "help me", "what can you do", "commands"];

/// Consecutive listener errors tolerated before the session gives up.
const MAX_LISTEN_FAILURES: u32 = 5;

/// What the loop does after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// Greeting spoken once at startup, by hour of day (0-23).
pub fn startup_greeting(user: &str, hour: u32) -> String {
    match hour {
        5..=11 => format!("What's up {user}? Good morning! How can I help you today?"),
        12..=16 => format!("What's up {user}? Good afternoon! What can I do for you?"),
        17..=20 => format!("What's up {user}? Good evening! Ready to assist."),
        _ => format!("What's up {user}? Working late? I'm here to help!"),
    }
}

/// One interactive session.
pub struct Session {
    user_name: String,
    wake_word: Option<String>,
    listener: Arc<dyn Listener>,
    speaker: Arc<dyn Speaker>,
    router: Arc<Router>,
}

impl Session {
    pub fn new(
        config: &Config,
        listener: Arc<dyn Listener>,
        speaker: Arc<dyn Speaker>,
        router: Arc<Router>,
    ) -> Self {
        Self {
            user_name: config.assistant.user_name.clone(),
            wake_word: config.assistant.wake_word(),
            listener,
            speaker,
            router,
        }
    }

    /// Greet, then serve turns until a farewell or Ctrl-C.
    pub async fn run(&self) -> anyhow::Result<()> {
        use chrono::Timelike;

        info!(
            "session started | listener: {} | wake word: {}",
            self.listener.name(),
            self.wake_word.as_deref().unwrap_or("(none)")
        );
        let hour = chrono::Local::now().hour();
        self.say(&startup_greeting(&self.user_name, hour)).await;

        let mut failures = 0u32;
        loop {
            tokio::select! {
                heard = self.listener.next_utterance() => {
                    let input = match heard {
                        Ok(input) => {
                            failures = 0;
                            input
                        }
                        Err(e) => {
                            failures += 1;
                            error!("listener failed ({failures}/{MAX_LISTEN_FAILURES}): {e}");
                            if failures >= MAX_LISTEN_FAILURES {
                                anyhow::bail!("listener keeps failing: {e}");
                            }
                            self.say(APOLOGY).await;
                            continue;
                        }
                    };
                    if self.handle_utterance(&input).await == Flow::Stop {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("received interrupt");
                    self.say(&format!("Interrupted! Goodbye, {}.", self.user_name)).await;
                    break;
                }
            }
        }

        info!("session ended");
        Ok(())
    }

    /// Serve one utterance end to end.
    pub(crate) async fn handle_utterance(&self, input: &str) -> Flow {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Flow::Continue;
        }

        if HELP_PHRASES.contains(&input.as_str()) {
            banner::print_help();
            self.say(banner::HELP_SUMMARY).await;
            return Flow::Continue;
        }

        let input = match &self.wake_word {
            Some(word) if !input.contains(word.as_str()) => {
                debug!("ignoring utterance without wake word");
                return Flow::Continue;
            }
            Some(word) => input.replace(word.as_str(), "").trim().to_string(),
            None => input,
        };

        // A panicking handler takes down only its own task.
        let router = self.router.clone();
        let routed = tokio::spawn(async move { router.route(&input).await }).await;

        match routed {
            Ok(reply) => {
                info!("intent: {}", reply.intent);
                self.say(&sanitize_for_speech(&reply.text)).await;
                if reply.terminate {
                    Flow::Stop
                } else {
                    Flow::Continue
                }
            }
            Err(e) => {
                error!("turn failed: {e}");
                self.say(APOLOGY).await;
                Flow::Continue
            }
        }
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.speaker.speak(text).await {
            warn!("speak failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nexis_core::error::NexisError;
    use nexis_core::traits::{Knowledge, SystemControl, VolumeDirection};
    use nexis_memory::Store;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a fixed script, then says "exit".
    struct ScriptedListener {
        lines: Mutex<VecDeque<Result<String, NexisError>>>,
    }

    impl ScriptedListener {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: Mutex::new(lines.iter().map(|l| Ok(l.to_string())).collect()),
            }
        }
    }

    #[async_trait]
    impl Listener for ScriptedListener {
        fn name(&self) -> &str {
            "script"
        }
        async fn next_utterance(&self) -> Result<String, NexisError> {
            self.lines
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("exit".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Speaker for RecordingSpeaker {
        async fn speak(&self, text: &str) -> Result<(), NexisError> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct NoControl;

    #[async_trait]
    impl SystemControl for NoControl {
        async fn open_app(&self, name: &str) -> String {
            format!("Opening {name}.")
        }
        async fn close_app(&self, name: &str) -> String {
            format!("Closed {name}.")
        }
        async fn open_folder(&self, name: &str) -> String {
            format!("Opening your {name} folder.")
        }
        async fn lock_screen(&self) -> String {
            "Screen locked.".into()
        }
        async fn shutdown(&self) -> String {
            "Shutting down.".into()
        }
        async fn restart(&self) -> String {
            "Restarting.".into()
        }
        async fn sleep(&self) -> String {
            "Sleeping.".into()
        }
        async fn screenshot(&self) -> String {
            "Screenshot saved.".into()
        }
        async fn volume(&self, direction: VolumeDirection) -> String {
            format!("Volume {direction}.")
        }
    }

    /// Panics on any query containing "explode".
    struct TouchyKnowledge;

    #[async_trait]
    impl Knowledge for TouchyKnowledge {
        async fn find_answer(&self, query: &str, _prefer_encyclopedia: bool) -> String {
            if query.contains("explode") {
                panic!("lookup exploded");
            }
            format!("See **{query}** at https://example.com")
        }
    }

    async fn session(
        wake_word: Option<&str>,
        script: &[&str],
    ) -> (Session, Arc<RecordingSpeaker>, Store) {
        let mut config = Config::default();
        config.assistant.user_name = "Sam".into();
        config.assistant.wake_word = wake_word.map(String::from);
        let store = Store::in_memory().await.unwrap();
        let router = Arc::new(Router::new(
            &config,
            store.clone(),
            Arc::new(NoControl),
            Arc::new(TouchyKnowledge),
        ));
        let speaker = Arc::new(RecordingSpeaker::default());
        let session = Session::new(
            &config,
            Arc::new(ScriptedListener::new(script)),
            speaker.clone(),
            router,
        );
        (session, speaker, store)
    }

    fn spoken(speaker: &RecordingSpeaker) -> Vec<String> {
        speaker.spoken.lock().unwrap().clone()
    }

    #[test]
    fn test_startup_greeting_by_hour() {
        assert_eq!(
            startup_greeting("Sam", 8),
            "What's up Sam? Good morning! How can I help you today?"
        );
        assert!(startup_greeting("Sam", 14).contains("Good afternoon"));
        assert!(startup_greeting("Sam", 19).contains("Good evening"));
        assert!(startup_greeting("Sam", 2).contains("Working late?"));
    }

    #[tokio::test]
    async fn test_help_is_answered_locally() {
        let (session, speaker, _) = session(None, &[]).await;
        assert_eq!(session.handle_utterance("What can you do").await, Flow::Continue);
        assert_eq!(spoken(&speaker), vec![banner::HELP_SUMMARY]);
    }

    #[tokio::test]
    async fn test_empty_input_is_silent() {
        let (session, speaker, _) = session(None, &[]).await;
        assert_eq!(session.handle_utterance("   ").await, Flow::Continue);
        assert!(spoken(&speaker).is_empty());
    }

    #[tokio::test]
    async fn test_wake_word_gates_and_is_stripped() {
        let (session, speaker, store) = session(Some("Nexis"), &[]).await;

        assert_eq!(session.handle_utterance("remember the milk").await, Flow::Continue);
        assert!(spoken(&speaker).is_empty());
        assert!(store.list_notes().await.unwrap().is_empty());

        session.handle_utterance("nexis remember the milk").await;
        assert_eq!(spoken(&speaker), vec!["I'll remember that: 'the milk'"]);
        assert_eq!(store.list_notes().await.unwrap()[0].content, "the milk");
    }

    #[tokio::test]
    async fn test_reply_is_sanitized_before_speaking() {
        let (session, speaker, _) = session(None, &[]).await;
        session.handle_utterance("what is rust").await;
        assert_eq!(spoken(&speaker), vec!["See rust at"]);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let (session, speaker, _) = session(None, &[]).await;
        assert_eq!(session.handle_utterance("what is explode").await, Flow::Continue);
        assert_eq!(spoken(&speaker), vec![APOLOGY]);

        // The session keeps working afterwards.
        session.handle_utterance("hello").await;
        assert_eq!(spoken(&speaker).len(), 2);
    }

    #[tokio::test]
    async fn test_farewell_stops() {
        let (session, speaker, _) = session(None, &[]).await;
        assert_eq!(session.handle_utterance("goodbye").await, Flow::Stop);
        assert_eq!(spoken(&speaker), vec!["Take care, Sam! Shutting down now."]);
    }

    #[tokio::test]
    async fn test_run_plays_script_until_farewell() {
        let (session, speaker, _) = session(None, &["", "help", "what is rust", "bye", "hello"]).await;
        session.run().await.unwrap();

        let said = spoken(&speaker);
        assert!(said[0].starts_with("What's up Sam?"));
        assert_eq!(said[1], banner::HELP_SUMMARY);
        assert_eq!(said[2], "See rust at");
        assert_eq!(said[3], "Take care, Sam! Shutting down now.");
        // Nothing after the farewell is served.
        assert_eq!(said.len(), 4);
    }

    #[tokio::test]
    async fn test_run_gives_up_on_broken_listener() {
        let (session, _, _) = session(None, &[]).await;
        let broken = ScriptedListener {
            lines: Mutex::new(
                (0..MAX_LISTEN_FAILURES)
                    .map(|_| Err(NexisError::Voice("mic unplugged".into())))
                    .collect(),
            ),
        };
        let session = Session {
            listener: Arc::new(broken),
            ..session
        };
        assert!(session.run().await.is_err());
    }
}
