pub mod mock;
pub mod wikihow;

use anyhow::Result;
use async_trait::async_trait;

/// A fetched article page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Where instructions come from. `Err` means the wiki could not be reached
/// at all; anything the server answers (including errors) is `Ok`.
#[async_trait]
pub trait Wiki: Send + Sync {
    /// Titles of the articles matching `query`, best match first.
    async fn search(&self, query: &str) -> Result<Vec<String>>;

    /// The article page for `title`.
    async fn page(&self, title: &str) -> Result<Page>;
}
