use crate::url::Site;

/// Resolves a raw reference against a site into an absolute URL string
///
/// This is a fast heuristic, not RFC 3986 reference resolution. Rules are
/// applied in order:
///
/// 1. Already absolute (starts with `scheme:`) → unchanged
/// 2. Protocol-relative (`//host/path`) → site scheme prepended
/// 3. Root-relative (`/path`) → site origin prepended
/// 4. Dot-relative (`./x` or `../x`) → one or two leading characters
///    stripped, then site origin prepended
/// 5. Anything else is path-relative → `origin/` prepended
///
/// Surrounding whitespace is ignored.
///
/// # Returns
///
/// * `Some(String)` - The absolute URL
/// * `None` - The reference is empty or contains whitespace or control
///   characters; callers skip it
///
/// # Examples
///
/// ```
/// use sigrawler::url::{normalize, Site};
///
/// let site = Site::parse("https://example.com/").unwrap();
/// assert_eq!(normalize("/login", &site).unwrap(), "https://example.com/login");
/// assert_eq!(normalize("//cdn.example.com/a.js", &site).unwrap(), "https://cdn.example.com/a.js");
/// assert_eq!(normalize("../api/v1", &site).unwrap(), "https://example.com/api/v1");
/// assert_eq!(normalize("console/test.php", &site).unwrap(), "https://example.com/console/test.php");
/// assert!(normalize("  ", &site).is_none());
/// ```
pub fn normalize(reference: &str, site: &Site) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty()
        || reference
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
    {
        return None;
    }

    if has_scheme(reference) {
        return Some(reference.to_string());
    }

    if reference.starts_with("//") {
        return Some(format!("{}:{}", site.scheme(), reference));
    }

    if reference.starts_with('/') {
        return Some(format!("{}{}", site.origin(), reference));
    }

    if reference.starts_with("../") {
        return Some(format!("{}{}", site.origin(), &reference[2..]));
    }

    if reference.starts_with("./") {
        return Some(format!("{}{}", site.origin(), &reference[1..]));
    }

    Some(format!("{}/{}", site.origin(), reference))
}

/// Returns true if the reference starts with a URI scheme followed by `:`
///
/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`. A
/// `host:port` prefix is not mistaken for a scheme when the part after the
/// colon is numeric.
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, rest)) = reference.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_scheme =
        starts_with_letter && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    let looks_like_port = rest
        .split(['/', '?', '#'])
        .next()
        .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()));

    valid_scheme && !looks_like_port
}
