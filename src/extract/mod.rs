//! Link extraction from the seed page
//!
//! The batch only needs one thing from the seed page: for every marked content
//! block, the link it carries (if any). [`LinkExtractor`] is that narrow
//! interface; [`HtmlLinkExtractor`] implements it with CSS selectors.

mod html;

pub use html::HtmlLinkExtractor;

use crate::ExtractionError;
use url::Url;

/// Turns page content into one link candidate per marked block
///
/// Implementations must be pure: identical input yields identical output.
pub trait LinkExtractor: Send + Sync {
    /// Returns one entry per content block, `None` when the block has no link
    fn extract_links(&self, page_content: &str) -> Result<Vec<Option<String>>, ExtractionError>;
}

/// Resolves an href against the seed page URL
///
/// Only hrefs that land on an http(s) URL become jobs. Blank and
/// fragment-only hrefs point back at the seed page itself; anything else
/// (`javascript:`, `mailto:`, `data:`, `ftp://`, unparseable) is rejected by
/// its resolved scheme. Protocol-relative hrefs (`//host/path`) inherit the
/// seed page's scheme.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
