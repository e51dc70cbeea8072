use crate::{UrlError, UrlResult};
use url::{Host, Url};

/// A parsed seed: the site a crawl session is anchored to
///
/// Holds everything the normalizer and the scope filter need: the scheme,
/// the authority (`host[:port]`) used to build absolute URLs, the bare
/// hostname, and its registrable domain (eTLD+1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    url: Url,
    authority: String,
    hostname: String,
    domain: String,
}

impl Site {
    /// Parses a seed URL into a site
    ///
    /// A seed without a scheme is assumed to be `http://`. Only HTTP and
    /// HTTPS seeds are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigrawler::url::Site;
    ///
    /// let site = Site::parse("https://www.example.co.uk/login").unwrap();
    /// assert_eq!(site.scheme(), "https");
    /// assert_eq!(site.hostname(), "www.example.co.uk");
    /// assert_eq!(site.domain(), "example.co.uk");
    ///
    /// let site = Site::parse("example.com").unwrap();
    /// assert_eq!(site.scheme(), "http");
    /// ```
    pub fn parse(seed: &str) -> UrlResult<Self> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(UrlError::Parse("empty URL".to_string()));
        }

        let candidate = if seed.contains("://") {
            seed.to_string()
        } else {
            format!("http://{}", seed)
        };

        let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;
        Self::from_url(&url)
    }

    /// Builds a site from an already parsed URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        let hostname = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingHost)?
            .to_lowercase();

        let authority = match url.port() {
            Some(port) => format!("{}:{}", hostname, port),
            None => hostname.clone(),
        };

        let domain = registrable_domain(url, &hostname);

        Ok(Self {
            url: url.clone(),
            authority,
            hostname,
            domain,
        })
    }

    /// The seed URL as parsed
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host plus explicit port, if any
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Lowercase host without port
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Registrable domain (eTLD+1) of the host
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `scheme://authority`, the prefix for root-relative references
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme(), self.authority)
    }
}

/// Computes the registrable domain of a host
///
/// IP addresses and hosts the public suffix list cannot split (such as
/// `localhost`) are their own registrable domain.
fn registrable_domain(url: &Url, hostname: &str) -> String {
    match url.host() {
        Some(Host::Domain(_)) => psl::domain_str(hostname)
            .unwrap_or(hostname)
            .to_string(),
        _ => hostname.to_string(),
    }
}
