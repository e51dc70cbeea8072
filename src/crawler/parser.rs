//! HTML parser for extracting links
//!
//! This module handles parsing HTML content to extract:
//! - Navigation links (`href` attributes on any element)
//! - Resource references (`src` attributes on any element)

use scraper::{Html, Selector};
use url::Url;

/// Where a link was found on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Any element with an `href` attribute (`<a>`, `<link>`, `<area>`, ...)
    Href,
    /// Any element with a `src` attribute (`<script>`, `<img>`, `<iframe>`, ...)
    Src,
}

/// A link extracted from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    /// Absolute URL, fragment removed
    pub url: String,
}

/// Parses HTML content and extracts links in document order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `href` on any element as [`LinkKind::Href`]
/// - `src` on any element as [`LinkKind::Src`]
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to an HTTP(S) URL
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was fetched from
///
/// # Example
///
/// ```
/// use sigrawler::crawler::{extract_links, LinkKind};
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><script src="app.js"></script>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].url, "https://example.com/page");
/// assert_eq!(links[1].kind, LinkKind::Src);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Link> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(href_selector) = Selector::parse("[href]") {
        for element in document.select(&href_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    links.push(Link {
                        kind: LinkKind::Href,
                        url,
                    });
                }
            }
        }
    }

    if let Ok(src_selector) = Selector::parse("[src]") {
        for element in document.select(&src_selector) {
            if let Some(src) = element.value().attr("src") {
                if let Some(url) = resolve_link(src, base_url) {
                    links.push(Link {
                        kind: LinkKind::Src,
                        url,
                    });
                }
            }
        }
    }

    links
}

/// Resolves an attribute value to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only references
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}
