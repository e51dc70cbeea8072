//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from the crawl options (timeout, TLS, proxies)
//! - Picking the User-Agent for each request
//! - GET requests with a `Referer` header
//! - Error classification

use crate::config::Options;
use crate::SigrawlerError;
use rand::seq::SliceRandom;
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{redirect::Policy, Client, Proxy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Mobile browser identities rotated when no User-Agent is configured
const MOBILE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/122.0.6261.89 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 17_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.6312.80 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.6261.105 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 12; moto g(60)) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.6167.178 Mobile Safari/537.36",
    "Mozilla/5.0 (Android 14; Mobile; rv:124.0) Gecko/124.0 Firefox/124.0",
];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Response body
        body: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, TLS, body decode)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the response is an HTML document
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Success { content_type, .. } if content_type.to_lowercase().contains("html"))
    }
}

/// Issues the GET requests of a crawl
///
/// One fetcher (and its connection pool) is shared by every session of a
/// run.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: Option<String>,
    debug: bool,
}

impl Fetcher {
    /// Builds a fetcher from the crawl options
    ///
    /// # Example
    ///
    /// ```
    /// use sigrawler::config::Options;
    /// use sigrawler::crawler::Fetcher;
    ///
    /// let fetcher = Fetcher::new(&Options::default()).unwrap();
    /// ```
    pub fn new(options: &Options) -> Result<Self, SigrawlerError> {
        Ok(Self {
            client: build_http_client(options)?,
            user_agent: options.user_agent.clone(),
            debug: options.debug,
        })
    }

    /// Fetches a URL
    ///
    /// Only 2xx responses count as success. Redirects are followed by the
    /// client (at most 10 hops).
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `referer` - The page that referenced this URL, if any
    pub async fn fetch(&self, url: &str, referer: Option<&str>) -> FetchResult {
        let user_agent = self.pick_user_agent();

        let mut request = self.client.get(url).header(USER_AGENT, user_agent);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        if self.debug {
            tracing::debug!(url, ?referer, user_agent, "request");
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_error(url, e),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if self.debug {
            tracing::debug!(url, final_url = %final_url, status = status.as_u16(), "response");
        }

        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }

    fn pick_user_agent(&self) -> &str {
        match &self.user_agent {
            Some(agent) => agent,
            None => MOBILE_USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(MOBILE_USER_AGENTS[0]),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `options` - The crawl options
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(SigrawlerError)` - Invalid proxy or client construction failure
pub fn build_http_client(options: &Options) -> Result<Client, SigrawlerError> {
    let mut builder = Client::builder()
        .timeout(options.timeout())
        .connect_timeout(options.timeout())
        .redirect(Policy::limited(10))
        .danger_accept_invalid_certs(options.insecure)
        .gzip(true)
        .brotli(true);

    match options.proxies.as_slice() {
        [] => {}
        [single] => {
            builder = builder.proxy(Proxy::all(single.as_str())?);
        }
        many => {
            let proxies = many
                .iter()
                .map(|p| Url::parse(p))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| crate::ConfigError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(round_robin_proxy(proxies));
        }
    }

    Ok(builder.build()?)
}

/// Rotates through the given proxies, one per new connection
fn round_robin_proxy(proxies: Vec<Url>) -> Proxy {
    let next = Arc::new(AtomicUsize::new(0));

    Proxy::custom(move |_| {
        let index = next.fetch_add(1, Ordering::Relaxed) % proxies.len();
        Some(proxies[index].clone())
    })
}

/// Maps a transport error onto a `FetchResult`
fn classify_error(url: &str, e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };

    tracing::debug!("Request to {} failed: {}", url, error);

    FetchResult::NetworkError { error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&Options::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_with_proxies() {
        let options = Options {
            proxies: vec!["http://127.0.0.1:8080".to_string()],
            insecure: true,
            ..Options::default()
        };
        assert!(build_http_client(&options).is_ok());

        let options = Options {
            proxies: vec![
                "http://127.0.0.1:8080".to_string(),
                "http://127.0.0.1:8081".to_string(),
            ],
            ..Options::default()
        };
        assert!(build_http_client(&options).is_ok());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let options = Options {
            proxies: vec!["a".to_string(), "b".to_string()],
            ..Options::default()
        };
        assert!(build_http_client(&options).is_err());
    }

    #[test]
    fn test_user_agent_override() {
        let options = Options {
            user_agent: Some("sigrawler-test/1.0".to_string()),
            ..Options::default()
        };
        let fetcher = Fetcher::new(&options).unwrap();
        assert_eq!(fetcher.pick_user_agent(), "sigrawler-test/1.0");
    }

    #[test]
    fn test_random_mobile_user_agent() {
        let fetcher = Fetcher::new(&Options::default()).unwrap();
        for _ in 0..10 {
            assert!(MOBILE_USER_AGENTS.contains(&fetcher.pick_user_agent()));
        }
    }

    #[test]
    fn test_is_html() {
        let html = FetchResult::Success {
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            content_type: "text/HTML; charset=utf-8".to_string(),
            body: String::new(),
        };
        assert!(html.is_html());

        let js = FetchResult::Success {
            final_url: "https://example.com/app.js".to_string(),
            status_code: 200,
            content_type: "application/javascript".to_string(),
            body: String::new(),
        };
        assert!(!js.is_html());

        assert!(!FetchResult::HttpError { status_code: 404 }.is_html());
    }
}
