//! Speech sanitization.
//!
//! Text headed for the speech engine is stripped of the things that sound
//! wrong when read aloud:
//! - URLs
//! - Markdown emphasis and header markers
//! - Leading bullet characters
//! - Runs of whitespace and line breaks

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}(.*?)\*{1,3}").expect("valid emphasis regex"));
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid header regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[•\-\*]\s+").expect("valid bullet regex"));
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Clean `text` before it is handed to the speech engine.
pub fn sanitize_for_speech(text: &str) -> String {
    let text = URL_RE.replace_all(text, "");
    let text = BULLET_RE.replace_all(&text, "");
    let text = EMPHASIS_RE.replace_all(&text, "$1");
    let text = HEADER_RE.replace_all(&text, "");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}
