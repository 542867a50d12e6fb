use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Page, Wiki};
use crate::consts::DEFAULT_WIKI_URL;

/// wikiHow over HTTP: MediaWiki search API plus plain article pages.
pub struct WikiHow {
    base_url: String,
    client: reqwest::Client,
}

impl WikiHow {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_WIKI_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api.php", self.base_url)
    }

    fn page_url(&self, title: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(title))
    }

    /// Pull the titles out of a search response. The API is not trusted to
    /// return JSON; anything unreadable counts as no results.
    fn parse_titles(body: &str) -> Vec<String> {
        match serde_json::from_str::<SearchResponse>(body) {
            Ok(resp) => resp.query.search.into_iter().map(|hit| hit.title).collect(),
            Err(e) => {
                debug!(error = %e, "unreadable search response");
                Vec::new()
            }
        }
    }
}

impl Default for WikiHow {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Wiki for WikiHow {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = reqwest::Url::parse_with_params(
            &self.api_url(),
            &[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
            ],
        )
        .context("invalid wiki URL")?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("search request failed")?;

        let body = resp.text().await.context("failed to read search response")?;
        let titles = Self::parse_titles(&body);
        debug!(query, hits = titles.len(), "searched wiki");
        Ok(titles)
    }

    async fn page(&self, title: &str) -> Result<Page> {
        let url = self.page_url(title);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("page request failed: {url}"))?;

        let status = resp.status().as_u16();
        // An unreadable body is a bad page, not an unreachable one.
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to read page body");
                String::new()
            }
        };
        Ok(Page { status, body })
    }
}

// --- API types ---

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: SearchQuery,
}

#[derive(Deserialize, Default)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}
