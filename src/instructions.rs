//! Turns a question into a short, numbered, mostly accurate how-to.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{EXTRA_STEPS, MAX_ATTEMPTS, MIN_STEPS, PUNCHLINE, step_line};
use crate::dice::Dice;
use crate::scrape::PageScraper;
use crate::wiki::Wiki;

/// Why no instructions could be produced. The messages are shown to users.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    #[error("Sorry, I couldn't query the wikiHow API.")]
    SearchUnavailable,
    #[error("Sorry, but I don't know how to do that.")]
    NoResults,
    #[error("Sorry, but I couldn't fetch the wikiHow page.")]
    PageUnavailable,
    #[error("Sorry, but I don't know how to do that.")]
    Exhausted,
}

/// Searches the wiki, picks a random article and quotes its first few steps.
pub struct InstructionFetcher {
    wiki: Arc<dyn Wiki>,
    scraper: Box<dyn PageScraper>,
    dice: Box<dyn Dice>,
}

impl InstructionFetcher {
    pub fn new(wiki: Arc<dyn Wiki>, scraper: Box<dyn PageScraper>, dice: Box<dyn Dice>) -> Self {
        Self {
            wiki,
            scraper,
            dice,
        }
    }

    /// Instructions for `query`, or an apology if there are none.
    pub async fn fetch(&self, query: &str) -> String {
        match self.instructions(query).await {
            Ok(response) => response,
            Err(e) => {
                info!(query, reason = ?e, "no instructions");
                e.to_string()
            }
        }
    }

    /// Instructions for `query`.
    ///
    /// Tries up to [`MAX_ATTEMPTS`] random search hits. Bad pages (non-200,
    /// no steps, an empty step) move on to the next attempt, but a page that
    /// cannot be reached at all ends the search.
    pub async fn instructions(&self, query: &str) -> Result<String, FetchError> {
        let titles = self.wiki.search(query).await.map_err(|e| {
            warn!(query, error = %e, "wiki search failed");
            FetchError::SearchUnavailable
        })?;

        if titles.is_empty() {
            return Err(FetchError::NoResults);
        }

        for attempt in 1..=MAX_ATTEMPTS {
            let title = &titles[self.dice.below(titles.len())];

            let page = self.wiki.page(title).await.map_err(|e| {
                warn!(title = %title, error = %e, "wiki page fetch failed");
                FetchError::PageUnavailable
            })?;

            if !page.is_ok() {
                debug!(attempt, title = %title, status = page.status, "skipping page");
                continue;
            }

            let steps = self.scraper.steps(&page.body);
            if steps.is_empty() {
                debug!(attempt, title = %title, "page has no steps");
                continue;
            }

            match self.compose(title, &steps) {
                Some(response) => return Ok(response),
                None => debug!(attempt, title = %title, "page has an empty step"),
            }
        }

        Err(FetchError::Exhausted)
    }

    /// Format the leading steps plus the punchline. `None` if one of the
    /// chosen steps is empty. `steps` must not be empty.
    fn compose(&self, title: &str, steps: &[String]) -> Option<String> {
        let how_many = self.how_many(steps.len());

        let mut response = format!("*{title}*\n");
        for (i, step) in steps.iter().take(how_many).enumerate() {
            if step.is_empty() {
                return None;
            }
            response.push_str(&step_line(i + 1, step));
        }
        response.push_str(&step_line(how_many + 1, PUNCHLINE));
        Some(response)
    }

    /// Between [`MIN_STEPS`] and `MIN_STEPS + EXTRA_STEPS - 1` steps, never
    /// more than the page has.
    fn how_many(&self, available: usize) -> usize {
        let extra = self.dice.below(EXTRA_STEPS.min(available));
        available.min(MIN_STEPS + extra)
    }
}
