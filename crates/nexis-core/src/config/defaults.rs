//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "NEXIS".to_string()
}

pub fn default_user_name() -> String {
    "friend".to_string()
}

pub fn default_data_dir() -> String {
    "~/.nexis".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_tts_rate() -> u32 {
    175
}

pub fn default_listen_timeout() -> u64 {
    10
}

pub fn default_answer_max_sentences() -> usize {
    2
}

pub fn default_wikipedia_results() -> usize {
    3
}

pub fn default_knowledge_timeout() -> u64 {
    8
}

pub fn default_db_path() -> String {
    "~/.nexis/data/nexis.db".to_string()
}

pub fn default_poll_interval() -> u64 {
    30
}

pub fn default_launcher_timeout() -> u64 {
    5
}
