use regex::Regex;
use std::sync::LazyLock;

/// S3 bucket references: virtual-hosted, legacy regional, website
/// endpoints, path-style, and `s3://` URIs
static S3_BUCKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[a-z0-9.-]+\.s3\.amazonaws\.com",
        r"|[a-z0-9.-]+\.s3-[a-z0-9-]+\.amazonaws\.com",
        r"|[a-z0-9.-]+\.s3\.[a-z0-9-]+\.amazonaws\.com",
        r"|[a-z0-9.-]+\.s3-website[.-](?:eu|ap|us|ca|sa|cn)[a-z0-9-]*",
        r"|//s3\.amazonaws\.com/[a-z0-9._-]+",
        r"|//s3-[a-z0-9-]+\.amazonaws\.com/[a-z0-9._-]+",
        r"|//s3\.[a-z0-9-]+\.amazonaws\.com/[a-z0-9._-]+",
        r"|s3://[a-z0-9._-]+",
    ))
    .expect("hardcoded S3 pattern is valid")
});

/// Finds S3 bucket references in a response body
///
/// The body is decoded first (percent-encoding, JSON `/` and `&`
/// escapes, lowercase) so that encoded references inside query strings and
/// JSON blobs are found too. Matches are returned in order of appearance;
/// duplicates are kept.
///
/// # Examples
///
/// ```
/// use sigrawler::extract::find_buckets;
///
/// let found = find_buckets(r#"<img src="https://mybucket.s3.amazonaws.com/key.png">"#);
/// assert_eq!(found, vec!["mybucket.s3.amazonaws.com"]);
///
/// assert!(find_buckets("<p>nothing here</p>").is_empty());
/// ```
pub fn find_buckets(text: &str) -> Vec<String> {
    let decoded = decode_chars(text);

    S3_BUCKET
        .find_iter(&decoded)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Undoes the common encodings bucket URLs hide behind
fn decode_chars(text: &str) -> String {
    let unescaped = urlencoding::decode(text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string());

    unescaped
        .to_lowercase()
        .replace(r"\u002f", "/")
        .replace(r"\u0026", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_hosted() {
        let found = find_buckets("https://mybucket.s3.amazonaws.com/key");
        assert_eq!(found, vec!["mybucket.s3.amazonaws.com"]);
    }

    #[test]
    fn test_regional_virtual_hosted() {
        let found = find_buckets("https://assets.s3.eu-north-1.amazonaws.com/logo.png");
        assert_eq!(found, vec!["assets.s3.eu-north-1.amazonaws.com"]);

        let found = find_buckets("https://legacy.s3-us-west-2.amazonaws.com/");
        assert_eq!(found, vec!["legacy.s3-us-west-2.amazonaws.com"]);
    }

    #[test]
    fn test_website_endpoint() {
        let found = find_buckets("http://site.s3-website-us-east-1.amazonaws.com");
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("site.s3-website-us-east-1"));
    }

    #[test]
    fn test_path_style() {
        let found = find_buckets("https://s3.amazonaws.com/backups/db.sql");
        assert_eq!(found, vec!["//s3.amazonaws.com/backups"]);

        let found = find_buckets("https://s3-eu-west-1.amazonaws.com/media/x");
        assert_eq!(found, vec!["//s3-eu-west-1.amazonaws.com/media"]);

        let found = find_buckets("https://s3.us-west-2.amazonaws.com/another-bucket/");
        assert_eq!(found, vec!["//s3.us-west-2.amazonaws.com/another-bucket"]);
    }

    #[test]
    fn test_s3_uri() {
        let found = find_buckets(r#"const src = "s3://data-lake/raw/";"#);
        assert_eq!(found, vec!["s3://data-lake"]);
    }

    #[test]
    fn test_uppercase_and_escaped_input() {
        let found = find_buckets(r#"{"url":"https://MyBucket.S3.AmazonAWS.com/a"}"#);
        assert_eq!(found, vec!["mybucket.s3.amazonaws.com"]);

        let found = find_buckets("redirect=https%3A%2F%2Fs3.amazonaws.com%2Fleaky%2Ffile");
        assert_eq!(found, vec!["//s3.amazonaws.com/leaky"]);
    }

    #[test]
    fn test_multiple_in_order_with_duplicates() {
        let body = r#"
            <img src="https://one.s3.amazonaws.com/a.png">
            <img src="https://two.s3.amazonaws.com/b.png">
            <img src="https://one.s3.amazonaws.com/c.png">
        "#;
        let found = find_buckets(body);
        assert_eq!(
            found,
            vec![
                "one.s3.amazonaws.com",
                "two.s3.amazonaws.com",
                "one.s3.amazonaws.com"
            ]
        );
    }

    #[test]
    fn test_no_buckets() {
        assert!(find_buckets("").is_empty());
        assert!(find_buckets("<html><body>https://example.com/s3/</body></html>").is_empty());
        assert!(find_buckets("amazonaws.com without a bucket").is_empty());
    }
}
