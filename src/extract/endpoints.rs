use regex::Regex;
use std::sync::LazyLock;

/// Quoted strings that look like URLs or paths: full and protocol-relative
/// URLs, `/`, `./` and `../` paths, relative paths with a file extension,
/// REST-style relative paths, and bare file names with a known extension
static ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?:"|')("#,
        r#"((?:[a-zA-Z]{1,10}://|//)[^"'/]+\.[a-zA-Z]{2,}[^"']*)"#,
        r#"|((?:/|\.\./|\./)[^"'><,;| *()(%$^/\\\[\]][^"'><,;|()]+)"#,
        r#"|([a-zA-Z0-9_\-/]+/[a-zA-Z0-9_\-/.]+\.(?:[a-zA-Z]{1,4}|action)(?:[\?|#][^"|']*)?)"#,
        r#"|([a-zA-Z0-9_\-/]+/[a-zA-Z0-9_\-/]{3,}(?:[\?|#][^"|']*)?)"#,
        r#"|([a-zA-Z0-9_\-]+\.(?:php|asp|aspx|jsp|json|action|html|js|txt|xml)(?:[\?|#][^"|']*)?)"#,
        r#")(?:"|')"#,
    ))
    .expect("hardcoded endpoint pattern is valid")
});

/// Finds endpoint candidates in JavaScript source
///
/// Each candidate is the raw match, surrounding quotes included; callers
/// strip them before resolving. This is pattern matching over text, so both
/// false positives (MIME types, for example) and misses are expected.
///
/// # Examples
///
/// ```
/// use sigrawler::extract::find_endpoints;
///
/// let found = find_endpoints(r#"fetch("/api/v1/users").then(r => r.json())"#);
/// assert_eq!(found, vec![r#""/api/v1/users""#]);
/// ```
pub fn find_endpoints(source: &str) -> Vec<String> {
    ENDPOINT
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes the quote delimiters from a raw endpoint match
///
/// # Examples
///
/// ```
/// use sigrawler::extract::strip_quotes;
///
/// assert_eq!(strip_quotes(r#""/api/v1""#), "/api/v1");
/// assert_eq!(strip_quotes("'./login'"), "./login");
/// ```
pub fn strip_quotes(candidate: &str) -> &str {
    candidate.trim_matches('"').trim_matches('\'')
}
