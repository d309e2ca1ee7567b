//! # nexis-knowledge
//!
//! Short factual answers from Wikipedia and the DuckDuckGo instant-answer
//! API. No API keys are needed.
//!
//! [`WebKnowledge::find_answer`] asks one source first and the other as a
//! fallback, trims whatever comes back to a few sentences, and never fails:
//! the last resort is an honest "I couldn't find..." sentence.

mod duckduckgo;
mod trim;
mod wikipedia;

pub use trim::trim_sentences;

use async_trait::async_trait;
use nexis_core::config::KnowledgeConfig;
use nexis_core::error::NexisError;
use nexis_core::traits::Knowledge;
use std::time::Duration;
use tracing::{debug, warn};

/// Spoken when every source comes back empty.
pub const NO_ANSWER: &str =
    "I couldn't find a reliable answer for that. Try asking me something else!";

const WIKIPEDIA_API: &str = "https://en.wikipedia.org/w/api.php";
const WIKIPEDIA_SUMMARY: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const DUCKDUCKGO_API: &str = "https://api.duckduckgo.com/";

/// Knowledge lookup over HTTP.
pub struct WebKnowledge {
    client: reqwest::Client,
    config: KnowledgeConfig,
}

impl WebKnowledge {
    pub fn new(config: KnowledgeConfig) -> Result<Self, NexisError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nexis/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| NexisError::Knowledge(format!("http client init failed: {e}")))?;
        Ok(Self { client, config })
    }

    async fn encyclopedia(&self, query: &str) -> Option<String> {
        match wikipedia::lookup(
            &self.client,
            WIKIPEDIA_API,
            WIKIPEDIA_SUMMARY,
            query,
            self.config.wikipedia_results,
        )
        .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!("wikipedia: {e}");
                None
            }
        }
    }

    async fn web(&self, query: &str) -> Option<String> {
        match duckduckgo::lookup(&self.client, DUCKDUCKGO_API, query).await {
            Ok(found) => found,
            Err(e) => {
                warn!("duckduckgo: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Knowledge for WebKnowledge {
    async fn find_answer(&self, query: &str, prefer_encyclopedia: bool) -> String {
        let query = query.trim();
        if !self.config.enabled || query.is_empty() {
            return NO_ANSWER.to_string();
        }

        let found = if prefer_encyclopedia {
            match self.encyclopedia(query).await {
                Some(a) => Some(a),
                None => self.web(query).await,
            }
        } else {
            match self.web(query).await {
                Some(a) => Some(a),
                None => self.encyclopedia(query).await,
            }
        };

        match found
            .map(|a| trim_sentences(&a, self.config.answer_max_sentences))
            .filter(|a| !a.is_empty())
        {
            Some(answer) => {
                debug!("answer for {query:?}: {} chars", answer.len());
                answer
            }
            None => NO_ANSWER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_returns_fallback() {
        let config = KnowledgeConfig {
            enabled: false,
            ..Default::default()
        };
        let knowledge = WebKnowledge::new(config).unwrap();
        assert_eq!(knowledge.find_answer("rust", true).await, NO_ANSWER);
    }

    #[tokio::test]
    async fn test_blank_query_returns_fallback() {
        let knowledge = WebKnowledge::new(KnowledgeConfig::default()).unwrap();
        assert_eq!(knowledge.find_answer("   ", false).await, NO_ANSWER);
    }
}
