//! Fetch pipelines and their hooks
//!
//! A session runs two pipelines. The page pipeline fetches HTML documents,
//! follows their links and hands scripts over to the script pipeline. The
//! script pipeline mines JavaScript for endpoints and feeds them back to the
//! page pipeline. Both look for S3 buckets in every body they receive.
//!
//! Hooks run synchronously on the task that owns the request and only touch
//! the session's concurrent state and its submission API.

use crate::crawler::coordinator::Session;
use crate::crawler::parser::{Link, LinkKind};
use crate::extract::{find_endpoints, strip_quotes};
use crate::output::Tag;
use crate::url::{normalize, Site};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use url::Url;

/// URLs handed to the script pipeline instead of being fetched as pages
static SCRIPT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:js|json)(?:\?.*)?$").expect("hardcoded script pattern is valid")
});

/// Static assets that are never fetched
static STATIC_ASSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\.(?:jpg|jpeg|png|gif|webp|tiff|tif|psd|raw|bmp|heif|ico|svg",
        r"|css|ttf|woff|woff2|eot|pdf|doc|txt|mp3|mp4)(?:\?.*)?$",
    ))
    .expect("hardcoded static asset pattern is valid")
});

/// The two fetch workflows of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Page,
    Script,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Script => write!(f, "script"),
        }
    }
}

/// A fetch submitted to a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL to fetch
    pub url: String,

    /// Link distance from the seed (the seed is 1)
    pub depth: u32,

    /// The page that referenced this URL
    pub referer: Option<String>,
}

impl Request {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            referer: None,
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

/// What a pre-fetch hook decided about a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Proceed,
    Abort,
}

/// A successful (2xx) response handed to the hooks
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    /// URL the body was served from, after redirects
    pub url: &'a Url,

    /// Response body
    pub body: &'a str,
}

/// Per-pipeline behaviour
///
/// `on_link` is only invoked for HTML responses, once per extracted link,
/// after `on_response`.
pub trait PipelineHooks: Send + Sync {
    /// Called before a request is fetched
    fn on_request(&self, _session: &Arc<Session>, _request: &Request) -> RequestDecision {
        RequestDecision::Proceed
    }

    /// Called with every successful response
    fn on_response(&self, session: &Arc<Session>, request: &Request, response: &Response<'_>);

    /// Called for each link found in an HTML response
    fn on_link(&self, _session: &Arc<Session>, _request: &Request, _link: &Link) {}
}

/// Hooks of the page pipeline
#[derive(Debug, Default)]
pub struct PageHooks;

impl PipelineHooks for PageHooks {
    fn on_request(&self, session: &Arc<Session>, request: &Request) -> RequestDecision {
        if is_script_url(&request.url) {
            if let Some(sibling) = unminified_sibling(&request.url) {
                if session.urls().check_and_mark(&sibling) {
                    session.submit(PipelineKind::Script, script_request(request, sibling));
                }
            }

            session.submit(
                PipelineKind::Script,
                script_request(request, request.url.clone()),
            );
            return RequestDecision::Abort;
        }

        if is_static_asset_url(&request.url) {
            tracing::trace!("Skipping static asset {}", request.url);
            return RequestDecision::Abort;
        }

        RequestDecision::Proceed
    }

    fn on_response(&self, session: &Arc<Session>, _request: &Request, response: &Response<'_>) {
        session.record_buckets(response.body);
    }

    fn on_link(&self, session: &Arc<Session>, request: &Request, link: &Link) {
        match link.kind {
            LinkKind::Href => {
                let trimmed = link.url.trim().trim_end_matches('/');
                let Some(url) = normalize(trimmed, session.site()) else {
                    return;
                };

                if !session.urls().check_and_mark(&url) {
                    return;
                }

                session.submit(
                    PipelineKind::Page,
                    Request::new(url.clone(), request.depth + 1).with_referer(&request.url),
                );

                if session.emit_if_in_scope(Tag::Url, &url) {
                    session.results().push_url(url);
                }
            }
            LinkKind::Src => {
                let Some(url) = normalize(&link.url, session.site()) else {
                    return;
                };

                session.submit(
                    PipelineKind::Page,
                    Request::new(url.clone(), request.depth).with_referer(&request.url),
                );

                if session.urls().check_and_mark(&url) {
                    session.emit_if_in_scope(Tag::Javascript, &url);
                }
            }
        }
    }
}

/// Hooks of the script pipeline
#[derive(Debug, Default)]
pub struct ScriptHooks;

impl PipelineHooks for ScriptHooks {
    fn on_response(&self, session: &Arc<Session>, request: &Request, response: &Response<'_>) {
        match Site::from_url(response.url) {
            Ok(script_site) => {
                for candidate in find_endpoints(response.body) {
                    let Some(url) = normalize(strip_quotes(&candidate), &script_site) else {
                        continue;
                    };

                    if !session.urls().check_and_mark(&url) {
                        continue;
                    }

                    session.submit(
                        PipelineKind::Page,
                        Request::new(url.clone(), request.depth + 1).with_referer(&request.url),
                    );

                    if session.emit_if_in_scope(Tag::Linkfinder, &url) {
                        session.results().push_url(url);
                    }
                }
            }
            Err(e) => {
                tracing::debug!("Cannot resolve endpoints against {}: {}", response.url, e);
            }
        }

        session.record_buckets(response.body);
    }
}

/// Returns true if the URL names a JavaScript or JSON resource
pub fn is_script_url(url: &str) -> bool {
    SCRIPT_URL.is_match(without_fragment(url))
}

/// Returns true if the URL names an image, font, style sheet, document or
/// media file
pub fn is_static_asset_url(url: &str) -> bool {
    STATIC_ASSET_URL.is_match(without_fragment(url))
}

/// Maps `app.min.js` to `app.js`
pub fn unminified_sibling(url: &str) -> Option<String> {
    url.contains(".min.js").then(|| url.replace(".min.js", ".js"))
}

fn without_fragment(url: &str) -> &str {
    url.split_once('#').map(|(head, _)| head).unwrap_or(url)
}

/// A script fetch inherits the depth of the page that referenced it
fn script_request(origin: &Request, url: String) -> Request {
    Request {
        url,
        depth: origin.depth,
        referer: origin.referer.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_urls() {
        assert!(is_script_url("https://example.com/static/app.js"));
        assert!(is_script_url("https://example.com/static/app.min.js?v=3"));
        assert!(is_script_url("https://example.com/data/config.json"));
        assert!(is_script_url("https://example.com/APP.JS#main"));

        assert!(!is_script_url("https://example.com/"));
        assert!(!is_script_url("https://example.com/nodejs"));
        assert!(!is_script_url("https://example.com/app.jsx"));
    }

    #[test]
    fn test_static_assets() {
        for url in [
            "https://example.com/logo.png",
            "https://example.com/photo.JPEG",
            "https://example.com/style.css?v=2",
            "https://example.com/fonts/a.woff2",
            "https://example.com/doc/report.pdf",
            "https://example.com/robots.txt",
            "https://example.com/media/intro.mp4",
        ] {
            assert!(is_static_asset_url(url), "{}", url);
        }

        for url in [
            "https://example.com/about",
            "https://example.com/index.html",
            "https://example.com/api/v1/users",
            "https://example.com/app.js",
        ] {
            assert!(!is_static_asset_url(url), "{}", url);
        }
    }

    #[test]
    fn test_unminified_sibling() {
        assert_eq!(
            unminified_sibling("https://example.com/app.min.js"),
            Some("https://example.com/app.js".to_string())
        );
        assert_eq!(
            unminified_sibling("https://example.com/app.min.js?v=1"),
            Some("https://example.com/app.js?v=1".to_string())
        );
        assert_eq!(unminified_sibling("https://example.com/app.js"), None);
    }

    #[test]
    fn test_script_request_keeps_depth() {
        let page = Request::new("https://example.com/app.min.js", 2)
            .with_referer("https://example.com/");
        let script = script_request(&page, "https://example.com/app.js".to_string());

        assert_eq!(script.depth, 2);
        assert_eq!(script.referer.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_pipeline_kind_display() {
        assert_eq!(PipelineKind::Page.to_string(), "page");
        assert_eq!(PipelineKind::Script.to_string(), "script");
    }
}
