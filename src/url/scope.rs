use crate::url::Site;
use url::Url;

/// Which hosts count as part of the crawled site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// The registrable domain and its `www.` host only
    Exact,
    /// The seed host and every subdomain of it
    Subdomains,
}

/// Scope predicates for one crawl session
///
/// `in_scope` decides whether a discovered URL is recorded in the results.
/// `permits_fetch` is the coarser gate every request passes before it is
/// issued; it is keyed on the registrable domain rather than the seed host.
#[derive(Debug, Clone)]
pub struct Scope {
    mode: ScopeMode,
    hostname: String,
    domain: String,
    www_domain: String,
}

impl Scope {
    pub fn new(site: &Site, include_subdomains: bool) -> Self {
        let mode = if include_subdomains {
            ScopeMode::Subdomains
        } else {
            ScopeMode::Exact
        };

        Self {
            mode,
            hostname: site.hostname().to_string(),
            domain: site.domain().to_string(),
            www_domain: format!("www.{}", site.domain()),
        }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Returns true if the URL belongs to the crawled site
    ///
    /// # Examples
    ///
    /// ```
    /// use sigrawler::url::{Scope, Site};
    ///
    /// let site = Site::parse("https://example.com").unwrap();
    ///
    /// let exact = Scope::new(&site, false);
    /// assert!(exact.in_scope("https://www.example.com/a"));
    /// assert!(!exact.in_scope("https://sub.example.com/a"));
    ///
    /// let subs = Scope::new(&site, true);
    /// assert!(subs.in_scope("https://sub.example.com/a"));
    /// assert!(!subs.in_scope("https://notexample.com/a"));
    /// ```
    pub fn in_scope(&self, url: &str) -> bool {
        let Some(host) = parse_host(url) else {
            return false;
        };

        match self.mode {
            ScopeMode::Exact => host == self.domain || host == self.www_domain,
            ScopeMode::Subdomains => matches_label_suffix(&self.hostname, &host),
        }
    }

    /// Returns true if a request to the URL may be issued at all
    ///
    /// Only HTTP(S) URLs under the registrable domain pass: the domain and
    /// its `www.` host in exact mode, any subdomain in subdomain mode.
    pub fn permits_fetch(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        let Some(host) = parsed.host_str().map(str::to_lowercase) else {
            return false;
        };

        match self.mode {
            ScopeMode::Exact => host == self.domain || host == self.www_domain,
            ScopeMode::Subdomains => matches_label_suffix(&self.domain, &host),
        }
    }

    /// Returns true if the URL's host falls under the registrable domain
    ///
    /// Used to decide whether request pacing applies to a host.
    pub fn under_domain(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| matches_label_suffix(&self.domain, &h.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Checks if `candidate` is `base` or a subdomain of it
///
/// The match only happens at a label boundary, so `notexample.com` and
/// `example.com.attacker.com` do not match `example.com`.
pub fn matches_label_suffix(base: &str, candidate: &str) -> bool {
    if base.is_empty() {
        return false;
    }

    candidate == base
        || candidate
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn parse_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(seed: &str, include_subdomains: bool) -> Scope {
        Scope::new(&Site::parse(seed).unwrap(), include_subdomains)
    }

    #[test]
    fn test_exact_mode_accepts_domain_and_www() {
        let scope = scope("https://example.com", false);
        assert_eq!(scope.mode(), ScopeMode::Exact);
        assert!(scope.in_scope("https://example.com/"));
        assert!(scope.in_scope("http://www.example.com/login"));
        assert!(scope.in_scope("https://example.com:8443/x"));
    }

    #[test]
    fn test_exact_mode_rejects_others() {
        let scope = scope("https://example.com", false);
        assert!(!scope.in_scope("https://evil.com/"));
        assert!(!scope.in_scope("https://sub.example.com/"));
        assert!(!scope.in_scope("https://example.com.evil.com/"));
        assert!(!scope.in_scope("/relative/path"));
        assert!(!scope.in_scope(""));
    }

    #[test]
    fn test_exact_mode_from_www_seed() {
        let scope = scope("https://www.example.com", false);
        assert!(scope.in_scope("https://example.com/"));
        assert!(scope.in_scope("https://www.example.com/"));
    }

    #[test]
    fn test_subdomain_mode_label_boundary() {
        let scope = scope("https://example.com", true);
        assert_eq!(scope.mode(), ScopeMode::Subdomains);
        assert!(scope.in_scope("https://example.com/"));
        assert!(scope.in_scope("https://api.example.com/v1"));
        assert!(scope.in_scope("https://a.b.example.com/?q=1"));

        assert!(!scope.in_scope("https://notexample.com/"));
        assert!(!scope.in_scope("https://notexample.com.attacker.com/"));
        assert!(!scope.in_scope("https://attacker.com/?u=//example.com"));
    }

    #[test]
    fn test_subdomain_mode_anchored_on_seed_host() {
        let scope = scope("https://app.example.com", true);
        assert!(scope.in_scope("https://eu.app.example.com/"));
        assert!(!scope.in_scope("https://www.example.com/"));
    }

    #[test]
    fn test_permits_fetch_exact() {
        let scope = scope("https://app.example.com", false);
        assert!(scope.permits_fetch("https://example.com/a"));
        assert!(scope.permits_fetch("https://www.example.com/a"));
        assert!(!scope.permits_fetch("https://cdn.example.com/a.js"));
        assert!(!scope.permits_fetch("https://other.com/"));
        assert!(!scope.permits_fetch("mailto:admin@example.com"));
        assert!(!scope.permits_fetch("ftp://example.com/file"));
    }

    #[test]
    fn test_permits_fetch_subdomains() {
        let scope = scope("https://app.example.com", true);
        assert!(scope.permits_fetch("https://cdn.example.com/a.js"));
        assert!(scope.permits_fetch("https://example.com/"));
        assert!(!scope.permits_fetch("https://example.org/"));
    }

    #[test]
    fn test_under_domain() {
        let scope = scope("https://example.com", false);
        assert!(scope.under_domain(&Url::parse("https://cdn.example.com/").unwrap()));
        assert!(!scope.under_domain(&Url::parse("https://other.com/").unwrap()));
    }

    #[test]
    fn test_matches_label_suffix() {
        assert!(matches_label_suffix("example.com", "example.com"));
        assert!(matches_label_suffix("example.com", "www.example.com"));
        assert!(matches_label_suffix("example.com", "deep.nested.example.com"));

        assert!(!matches_label_suffix("example.com", "myexample.com"));
        assert!(!matches_label_suffix("example.com", "example.com.org"));
        assert!(!matches_label_suffix("example.com", ""));
        assert!(!matches_label_suffix("", "example.com"));
    }
}
