use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Page, Wiki};

/// An in-memory wiki for tests. Records every query and page request.
/// Pages that were never added answer 404.
#[derive(Default)]
pub struct MockWiki {
    results: Option<Vec<String>>,
    pages: HashMap<String, Option<Page>>,
    queries: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl MockWiki {
    /// A wiki whose search returns `titles`.
    pub fn new(titles: &[&str]) -> Self {
        Self {
            results: Some(titles.iter().map(|t| t.to_string()).collect()),
            ..Self::default()
        }
    }

    /// A wiki whose search endpoint cannot be reached.
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Serve `html` for `title` with the given status.
    pub fn page(mut self, title: &str, status: u16, html: &str) -> Self {
        self.pages.insert(
            title.to_string(),
            Some(Page {
                status,
                body: html.to_string(),
            }),
        );
        self
    }

    /// Fail the transport when `title` is fetched.
    pub fn unreachable_page(mut self, title: &str) -> Self {
        self.pages.insert(title.to_string(), None);
        self
    }

    /// Every query passed to `search`, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Every title passed to `page`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wiki for MockWiki {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.results {
            Some(titles) => Ok(titles.clone()),
            None => bail!("MockWiki: search endpoint unreachable"),
        }
    }

    async fn page(&self, title: &str) -> Result<Page> {
        self.fetched.lock().unwrap().push(title.to_string());
        match self.pages.get(title) {
            Some(Some(page)) => Ok(page.clone()),
            Some(None) => bail!("MockWiki: page {title:?} unreachable"),
            None => Ok(Page {
                status: 404,
                body: String::new(),
            }),
        }
    }
}
