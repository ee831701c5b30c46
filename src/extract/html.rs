//! `scraper`-based link extraction

use crate::config::ExtractConfig;
use crate::extract::LinkExtractor;
use crate::ExtractionError;
use scraper::{Html, Selector};

/// Extracts the first link of every marked content block
///
/// Blocks are matched with `block_selector`; inside each block the first
/// element matching `link_selector` supplies the `href`. A block without such an
/// element, or whose element lacks an `href`, yields `None`.
#[derive(Debug)]
pub struct HtmlLinkExtractor {
    block_selector: Selector,
    link_selector: Selector,
}

impl HtmlLinkExtractor {
    /// Compiles both selectors
    ///
    /// # Returns
    ///
    /// * `Ok(HtmlLinkExtractor)` - Both selectors parsed
    /// * `Err(ExtractionError::Selector)` - One of them is not valid CSS
    pub fn new(block_selector: &str, link_selector: &str) -> Result<Self, ExtractionError> {
        Ok(Self {
            block_selector: compile(block_selector)?,
            link_selector: compile(link_selector)?,
        })
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self, ExtractionError> {
        Self::new(&config.block_selector, &config.link_selector)
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, page_content: &str) -> Result<Vec<Option<String>>, ExtractionError> {
        let document = Html::parse_document(page_content);

        let links: Vec<Option<String>> = document
            .select(&self.block_selector)
            .map(|block| {
                block
                    .select(&self.link_selector)
                    .next()
                    .and_then(|link| link.value().attr("href"))
                    .map(|href| href.trim().to_string())
            })
            .collect();

        tracing::debug!("Found {} content blocks", links.len());
        Ok(links)
    }
}
