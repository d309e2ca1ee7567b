//! DuckDuckGo instant-answer API.

use nexis_core::error::NexisError;
use serde::Deserialize;

/// Related-topic snippets combined into one answer.
const MAX_SNIPPETS: usize = 2;

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct InstantAnswer {
    abstract_text: String,
    answer: serde_json::Value,
    definition: String,
    related_topics: Vec<Topic>,
}

/// Either a plain topic or a named group of topics.
#[derive(Deserialize)]
#[serde(untagged)]
enum Topic {
    Item {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<Topic>,
    },
    Other(serde::de::IgnoredAny),
}

fn collect_texts(topics: &[Topic], out: &mut Vec<String>) {
    for topic in topics {
        if out.len() >= MAX_SNIPPETS {
            return;
        }
        match topic {
            Topic::Item { text } if !text.trim().is_empty() => out.push(text.trim().to_string()),
            Topic::Item { .. } | Topic::Other(_) => {}
            Topic::Group { topics } => collect_texts(topics, out),
        }
    }
}

/// Best snippet in an instant-answer response: the abstract, a direct
/// answer, a definition, or the leading related topics.
pub(crate) fn best_snippet(body: &str) -> Result<Option<String>, NexisError> {
    let ia: InstantAnswer = serde_json::from_str(body)?;

    if !ia.abstract_text.trim().is_empty() {
        return Ok(Some(ia.abstract_text.trim().to_string()));
    }
    if let Some(answer) = ia.answer.as_str().map(str::trim).filter(|a| !a.is_empty()) {
        return Ok(Some(answer.to_string()));
    }
    if !ia.definition.trim().is_empty() {
        return Ok(Some(ia.definition.trim().to_string()));
    }

    let mut texts = Vec::new();
    collect_texts(&ia.related_topics, &mut texts);
    Ok((!texts.is_empty()).then(|| texts.join(" ")))
}

pub(crate) async fn lookup(
    client: &reqwest::Client,
    api_url: &str,
    query: &str,
) -> Result<Option<String>, NexisError> {
    let body = client
        .get(api_url)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .send()
        .await
        .map_err(|e| NexisError::Knowledge(format!("duckduckgo request failed: {e}")))?
        .text()
        .await
        .map_err(|e| NexisError::Knowledge(format!("duckduckgo read failed: {e}")))?;

    best_snippet(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstract_preferred() {
        let body = r#"{"AbstractText":"Tokio is an async runtime.","Answer":"","RelatedTopics":[{"Text":"other"}]}"#;
        assert_eq!(
            best_snippet(body).unwrap().as_deref(),
            Some("Tokio is an async runtime.")
        );
    }

    #[test]
    fn test_related_topics_with_groups() {
        let body = r#"{"AbstractText":"","Answer":"","RelatedTopics":[
            {"Name":"Languages","Topics":[{"Text":"Rust - a systems language.","FirstURL":"x"}]},
            {"Text":"Rust - iron oxide.","FirstURL":"y"},
            {"Text":"Rust - a video game.","FirstURL":"z"}]}"#;
        assert_eq!(
            best_snippet(body).unwrap().as_deref(),
            Some("Rust - a systems language. Rust - iron oxide.")
        );
    }

    #[test]
    fn test_answer_field_may_be_non_string() {
        let body = r#"{"AbstractText":"","Answer":{"from":"calc"},"Definition":"A word."}"#;
        assert_eq!(best_snippet(body).unwrap().as_deref(), Some("A word."));
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(best_snippet("{}").unwrap(), None);
        assert!(best_snippet("<html>").is_err());
    }
}
