//! Wikipedia: title search, then the page summary of the first usable hit.
//!
//! Search: <https://www.mediawiki.org/wiki/API:Search>
//! Summary: <https://en.wikipedia.org/api/rest_v1/>

use nexis_core::error::NexisError;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
pub(crate) struct Summary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

impl Summary {
    /// The extract, unless the page is a disambiguation list or empty.
    pub(crate) fn usable_extract(self) -> Option<String> {
        let extract = self.extract.trim();
        if self.kind == "disambiguation" || extract.is_empty() {
            return None;
        }
        Some(extract.to_string())
    }
}

/// Titles from a search response, in rank order.
pub(crate) fn parse_titles(body: &str) -> Result<Vec<String>, NexisError> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    Ok(resp
        .query
        .map(|q| q.search.into_iter().map(|h| h.title).collect())
        .unwrap_or_default())
}

/// Search for `query` and return the first candidate page's summary.
pub(crate) async fn lookup(
    client: &reqwest::Client,
    api_url: &str,
    summary_url: &str,
    query: &str,
    candidates: usize,
) -> Result<Option<String>, NexisError> {
    let limit = candidates.max(1).to_string();
    let body = client
        .get(api_url)
        .query(&[
            ("action", "query"),
            ("list", "search"),
            ("format", "json"),
            ("srlimit", limit.as_str()),
            ("srsearch", query),
        ])
        .send()
        .await
        .map_err(|e| NexisError::Knowledge(format!("wikipedia search failed: {e}")))?
        .text()
        .await
        .map_err(|e| NexisError::Knowledge(format!("wikipedia search read failed: {e}")))?;

    for title in parse_titles(&body)? {
        let mut url = reqwest::Url::parse(summary_url)
            .map_err(|e| NexisError::Knowledge(format!("bad summary url: {e}")))?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&title);
        }

        let resp = match client.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!("wikipedia summary {title:?}: HTTP {}", r.status());
                continue;
            }
            Err(e) => {
                debug!("wikipedia summary {title:?} failed: {e}");
                continue;
            }
        };
        let summary: Summary = match resp.json().await {
            Ok(s) => s,
            Err(e) => {
                debug!("wikipedia summary {title:?} parse failed: {e}");
                continue;
            }
        };
        if let Some(extract) = summary.usable_extract() {
            return Ok(Some(extract));
        }
    }
    Ok(None)
}
