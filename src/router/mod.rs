//! Intent router: one utterance in, one spoken reply out.
//!
//! Classification is an ordered rule table ([`RULES`]). Rules are tried top
//! to bottom; the first rule whose matcher fires *and* whose handler
//! produces a reply wins. A handler that declines (e.g. "open" with no
//! configured app name in the text) lets the next rule try.

mod calc;
mod remind;


use calc::try_calculate;

use chrono::NaiveDateTime;
use nexis_core::config::Config;
use nexis_core::traits::{Knowledge, SystemControl, VolumeDirection};
use nexis_memory::Store;
use regex::Regex;
use remind::ReminderRequest;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info};

/// Reply to empty input.
pub const UNHEARD: &str = "I didn't catch that. Could you repeat?";

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "I would tell you a UDP joke, but you might not get it.",
    "A SQL query walks into a bar, walks up to two tables and asks: Can I join you?",
    "Why did the computer go to the doctor? It had a virus!",
    "To understand recursion, you must first understand recursion.",
    "There are only 10 kinds of people: those who understand binary, and those who don't.",
];

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Nothing was said.
    Empty,
    Farewell,
    Greeting,
    HowAreYou,
    Time,
    Date,
    Day,
    Joke,
    Lock,
    Shutdown,
    Restart,
    Sleep,
    Screenshot,
    VolumeUp,
    VolumeDown,
    Mute,
    OpenFolder,
    OpenApp,
    CloseApp,
    Remind,
    ListReminders,
    Remember,
    Recall,
    ClearMemory,
    Calculate,
    Weather,
    WhatIs,
    Search,
    News,
    /// Unclassified input, answered by a knowledge lookup.
    CatchAll,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Farewell => "farewell",
            Self::Greeting => "greeting",
            Self::HowAreYou => "how_are_you",
            Self::Time => "time",
            Self::Date => "date",
            Self::Day => "day",
            Self::Joke => "joke",
            Self::Lock => "lock",
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
            Self::Sleep => "sleep",
            Self::Screenshot => "screenshot",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::Mute => "mute",
            Self::OpenFolder => "open_folder",
            Self::OpenApp => "open_app",
            Self::CloseApp => "close_app",
            Self::Remind => "remind",
            Self::ListReminders => "list_reminders",
            Self::Remember => "remember",
            Self::Recall => "recall",
            Self::ClearMemory => "clear_memory",
            Self::Calculate => "calculate",
            Self::Weather => "weather",
            Self::WhatIs => "what_is",
            Self::Search => "search",
            Self::News => "news",
            Self::CatchAll => "catch_all",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a rule's handler gets a chance to run.
pub enum Matcher {
    /// The pattern must occur somewhere in the (lowercased) text.
    Pattern(Regex),
    /// Always tried; the handler alone decides.
    Always,
}

impl Matcher {
    fn pattern(re: &str) -> Self {
        Self::Pattern(Regex::new(re).expect("valid intent regex"))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(text),
            Self::Always => true,
        }
    }
}

/// One row of the dispatch table.
pub struct Rule {
    pub intent: Intent,
    pub matcher: Matcher,
}

fn rule(intent: Intent, matcher: Matcher) -> Rule {
    Rule { intent, matcher }
}

/// The dispatch table, in evaluation order. Order is part of the contract:
/// farewell beats everything, small talk beats action verbs, system control
/// beats app launching, structured intents beat knowledge lookups.
pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use Intent::*;
    use Matcher::Always;
    let p = Matcher::pattern;
    vec![
        rule(Farewell, p(r"\b(bye|goodbye|exit|quit|see you|later|cya|peace out|shut down)\b")),
        rule(
            Greeting,
            p(r"\b(hi|hello|hey|yo|what's up|sup|howdy|hiya)\b|\b(good morning|good afternoon|good evening|good night)\b"),
        ),
        rule(HowAreYou, p(r"\b(how are you|how're you|how do you feel|are you okay|you good)\b")),
        rule(Time, p(r"\b(what time|current time|what's the time|tell me the time)\b")),
        rule(Date, p(r"\b(what('s| is) (today|the date)|today's date|current date)\b")),
        rule(Day, p(r"\b(what day|which day)\b")),
        rule(Joke, p(r"\b(joke|make me laugh|something funny|tell me a joke)\b")),
        rule(Lock, p(r"\b(lock (the )?screen|lock pc|lock computer)\b")),
        rule(Shutdown, p(r"\b(shutdown|shut down|power off|turn off (the )?pc)\b")),
        rule(Restart, p(r"\b(restart|reboot)\b")),
        rule(Sleep, p(r"\b(sleep|hibernate|put to sleep)\b")),
        rule(Screenshot, p(r"\b(screenshot|screen capture|capture screen)\b")),
        rule(VolumeUp, p(r"\b(volume up|louder|increase volume)\b")),
        rule(VolumeDown, p(r"\b(volume down|quieter|lower volume|decrease volume)\b")),
        rule(Mute, p(r"\b(mute|silence)\b")),
        rule(
            OpenFolder,
            p(r"\b(open|show|go to)\b.*(folder|directory|downloads|documents|desktop|pictures|music|videos)\b"),
        ),
        rule(OpenApp, p(r"\b(open|launch|start|run)\b")),
        rule(CloseApp, p(r"\b(close|kill|stop|quit|exit)\b")),
        rule(Remind, p(r"\bremind\s+me\b")),
        rule(ListReminders, p(r"\b(list reminders|show reminders|my reminders|pending reminders)\b")),
        rule(Remember, p(r"\bremember\s+(that\s+)?(.*)")),
        rule(Recall, p(r"\b(what do you remember|recall|show memories|my notes)\b")),
        rule(ClearMemory, p(r"\b(clear memory|forget everything|delete memories)\b")),
        rule(Calculate, Always),
        rule(Weather, p(r"\b(weather|temperature|forecast|rain|sunny)\b")),
        rule(WhatIs, p(WHAT_IS)),
        rule(Search, p(SEARCH)),
        rule(News, p(r"\b(news|latest|today's news|headlines)\b")),
        rule(CatchAll, Always),
    ]
});

const WHAT_IS: &str = r"\b(what is|what are|who is|who was|tell me about|explain|define|describe)\b";
const SEARCH: &str = r"\b(search for|look up|find|google|search)\b";

static REMEMBER_FACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"remember\s+(?:that\s+)?(.+)").expect("valid remember regex"));
static WHAT_IS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WHAT_IS).expect("valid what-is regex"));
static SEARCH_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEARCH).expect("valid search regex"));

/// The router's answer to one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    /// The session should end after speaking this.
    pub terminate: bool,
}

/// Longest configured name that occurs in `text`.
///
/// `names` must already be sorted longest-first.
pub fn longest_match<'a>(names: &'a [String], text: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|name| !name.is_empty() && text.contains(name.as_str()))
        .map(String::as_str)
}

fn longest_first<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut names: Vec<String> = keys.map(|k| k.to_lowercase()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();
    names
}

/// Time-of-day salutation for `hour` (0-23).
pub fn salutation(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        17..=20 => "Good evening",
        _ => "Hey",
    }
}

/// Maps utterances to replies, calling into the store and collaborators.
pub struct Router {
    user_name: String,
    apps: Vec<String>,
    folders: Vec<String>,
    processes: Vec<String>,
    store: Store,
    control: Arc<dyn SystemControl>,
    knowledge: Arc<dyn Knowledge>,
}

impl Router {
    pub fn new(
        config: &Config,
        store: Store,
        control: Arc<dyn SystemControl>,
        knowledge: Arc<dyn Knowledge>,
    ) -> Self {
        Self {
            user_name: config.assistant.user_name.clone(),
            apps: longest_first(config.launcher.apps.keys()),
            folders: longest_first(config.launcher.folders.keys()),
            processes: longest_first(config.launcher.processes.keys()),
            store,
            control,
            knowledge,
        }
    }

    /// Route `text` against the local clock.
    pub async fn route(&self, text: &str) -> Reply {
        self.route_at(text, chrono::Local::now().naive_local()).await
    }

    /// Route `text` as if the local time were `now`.
    pub async fn route_at(&self, text: &str, now: NaiveDateTime) -> Reply {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return Reply {
                intent: Intent::Empty,
                text: UNHEARD.to_string(),
                terminate: false,
            };
        }

        for rule in RULES.iter() {
            if !rule.matcher.matches(&text) {
                continue;
            }
            if let Some(reply) = self.handle(rule.intent, &text, now).await {
                debug!("routed {text:?} -> {}", rule.intent);
                return Reply {
                    intent: rule.intent,
                    text: reply,
                    terminate: rule.intent == Intent::Farewell,
                };
            }
        }

        // The catch-all always answers; this is only reached with an empty table.
        Reply {
            intent: Intent::CatchAll,
            text: self.knowledge.find_answer(&text, true).await,
            terminate: false,
        }
    }

    /// Run the handler for `intent`. `None` means "not mine after all".
    async fn handle(&self, intent: Intent, text: &str, now: NaiveDateTime) -> Option<String> {
        use chrono::Timelike;

        let user = &self.user_name;
        let reply = match intent {
            Intent::Empty => UNHEARD.to_string(),
            Intent::Farewell => format!("Take care, {user}! Shutting down now."),
            Intent::Greeting => format!(
                "{}, {user}! How can I help you today?",
                salutation(now.hour())
            ),
            Intent::HowAreYou => format!("I'm running perfectly and ready to help you, {user}!"),
            Intent::Time => format!("It's currently {}.", now.format("%I:%M %p")),
            Intent::Date => format!("Today is {}.", now.format("%A, %B %d, %Y")),
            Intent::Day => format!("Today is {}.", now.format("%A")),
            Intent::Joke => JOKES[rand::random_range(0..JOKES.len())].to_string(),
            Intent::Lock => self.control.lock_screen().await,
            Intent::Shutdown => self.control.shutdown().await,
            Intent::Restart => self.control.restart().await,
            Intent::Sleep => self.control.sleep().await,
            Intent::Screenshot => self.control.screenshot().await,
            Intent::VolumeUp => self.control.volume(VolumeDirection::Up).await,
            Intent::VolumeDown => self.control.volume(VolumeDirection::Down).await,
            Intent::Mute => self.control.volume(VolumeDirection::Mute).await,
            Intent::OpenFolder => {
                let name = longest_match(&self.folders, text)?;
                self.control.open_folder(name).await
            }
            Intent::OpenApp => {
                let name = longest_match(&self.apps, text)?;
                self.control.open_app(name).await
            }
            Intent::CloseApp => {
                let name = longest_match(&self.processes, text)?;
                self.control.close_app(name).await
            }
            Intent::Remind => self.remind(text, now).await,
            Intent::ListReminders => self.list_reminders().await,
            Intent::Remember => self.remember(text).await,
            Intent::Recall => self.recall().await,
            Intent::ClearMemory => match self.store.clear_notes().await {
                Ok(_) => "I've cleared all stored memories.".to_string(),
                Err(e) => {
                    error!("clear memory: {e}");
                    "I couldn't clear my memory right now.".to_string()
                }
            },
            Intent::Calculate => try_calculate(text)?,
            Intent::Weather => "I don't have a weather API, but you can check weather.com \
                                or ask me to open a browser and search for the weather."
                .to_string(),
            Intent::WhatIs => {
                let topic = strip_or_keep(&WHAT_IS_PREFIX, text);
                self.knowledge.find_answer(&topic, true).await
            }
            Intent::Search => {
                let topic = strip_or_keep(&SEARCH_PREFIX, text);
                self.knowledge.find_answer(&topic, false).await
            }
            Intent::News => self.knowledge.find_answer("latest news today", false).await,
            Intent::CatchAll => self.knowledge.find_answer(text, true).await,
        };
        Some(reply)
    }

    async fn remind(&self, text: &str, now: NaiveDateTime) -> String {
        match remind::parse(text, now) {
            ReminderRequest::MissingTask => {
                "What should I remind you about, and at what time?".to_string()
            }
            ReminderRequest::MissingTime { task } => {
                format!("When should I remind you to '{task}'? Please say a time like 'at 8 pm'.")
            }
            ReminderRequest::Complete { task, at } => {
                match self.store.add_reminder(&task, at).await {
                    Ok(r) => {
                        info!("reminder {} scheduled for {}", r.id, r.remind_at);
                        format!(
                            "Got it! I'll remind you to '{task}' at {}.",
                            at.format("%I:%M %p")
                        )
                    }
                    Err(e) => {
                        error!("add reminder: {e}");
                        "I couldn't save that reminder right now.".to_string()
                    }
                }
            }
        }
    }

    async fn list_reminders(&self) -> String {
        match self.store.list_pending_reminders().await {
            Ok(reminders) if reminders.is_empty() => "You have no pending reminders.".to_string(),
            Ok(reminders) => {
                let lines: Vec<String> = reminders
                    .iter()
                    .map(|r| format!("• {}, {}", r.task, r.remind_at.format("%A %I:%M %p")))
                    .collect();
                format!("Your reminders:\n{}", lines.join("\n"))
            }
            Err(e) => {
                error!("list reminders: {e}");
                "I couldn't read your reminders right now.".to_string()
            }
        }
    }

    async fn remember(&self, text: &str) -> String {
        let Some(fact) = REMEMBER_FACT
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|f| !f.is_empty())
        else {
            return "What would you like me to remember?".to_string();
        };
        match self.store.save_note(fact).await {
            Ok(_) => format!("I'll remember that: '{fact}'"),
            Err(e) => {
                error!("save note: {e}");
                "I couldn't save that right now.".to_string()
            }
        }
    }

    async fn recall(&self) -> String {
        match self.store.list_notes().await {
            Ok(notes) if notes.is_empty() => "I don't have anything saved in memory yet.".to_string(),
            Ok(notes) => {
                let lines: Vec<String> = notes
                    .iter()
                    .map(|n| format!("• {}  (saved {})", n.content, n.saved_at.format("%Y-%m-%d")))
                    .collect();
                format!("Here's what I remember:\n{}", lines.join("\n"))
            }
            Err(e) => {
                error!("recall: {e}");
                "I couldn't read my memory right now.".to_string()
            }
        }
    }
}

/// Remove the trigger phrase; if nothing is left, ask about the whole text.
fn strip_or_keep(prefix: &Regex, text: &str) -> String {
    let cleaned = prefix.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        text.to_string()
    } else {
        cleaned.to_string()
    }
}
