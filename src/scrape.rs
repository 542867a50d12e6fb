//! Pulls step text out of an article page.

use scraper::{Html, Selector};

/// wikiHow marks the headline of each step as `<b class="whb">`.
pub const STEP_SELECTOR: &str = "b.whb";

/// Turns an HTML page into its steps, in document order.
///
/// An empty result means the page had no recognizable structure.
pub trait PageScraper: Send + Sync {
    fn steps(&self, html: &str) -> Vec<String>;
}

/// Collects the text of every element matching a CSS selector.
pub struct WikiHowScraper {
    selector: Selector,
}

impl WikiHowScraper {
    pub fn new() -> Self {
        Self {
            selector: Selector::parse(STEP_SELECTOR).expect("step selector is valid CSS"),
        }
    }

    /// Use a custom selector, e.g. for a different page layout.
    pub fn with_selector(selector: &str) -> anyhow::Result<Self> {
        let selector = Selector::parse(selector)
            .map_err(|e| anyhow::anyhow!("invalid selector {selector:?}: {e}"))?;
        Ok(Self { selector })
    }
}

impl Default for WikiHowScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl PageScraper for WikiHowScraper {
    fn steps(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }
}
