//! Validation of URLs submitted for shortening.
//!
//! The mapping core assumes a syntactically valid, non-empty URL; these
//! checks run in the HTTP layer before it is reached.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Shortest accepted URL, in characters.
pub const MIN_URL_LENGTH: usize = 5;

/// Longest accepted URL, in characters.
pub const MAX_URL_LENGTH: usize = 2000;

/// Hosts that may not be shortened.
const BLOCKED_DOMAINS: &[&str] = &["malicious-site.com", "phishing.com"];

/// Validates a URL submitted for shortening.
///
/// # Rules
///
/// 1. Must be present and non-empty (`400`)
/// 2. Must parse as an absolute URL (`422`)
/// 3. Scheme must be `http` or `https` (`422`)
/// 4. Length must be within 5..=2000 characters (`422`)
/// 5. Host must not be blocked (`403`)
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/page").is_ok());
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), AppError> {
    if input.is_empty() {
        return Err(AppError::bad_request("URL is required", json!({})));
    }

    let parsed = Url::parse(input).map_err(|e| {
        AppError::unprocessable("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::unprocessable(
            "Only HTTP and HTTPS URLs are allowed",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    let length = input.chars().count();
    if !(MIN_URL_LENGTH..=MAX_URL_LENGTH).contains(&length) {
        return Err(AppError::unprocessable(
            format!("URL length must be between {MIN_URL_LENGTH} and {MAX_URL_LENGTH} characters"),
            json!({ "length": length }),
        ));
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_ascii_lowercase();
        if BLOCKED_DOMAINS.contains(&host.as_str()) {
            return Err(AppError::forbidden(
                "Domain is blocked",
                json!({ "domain": host }),
            ));
        }
    }

    Ok(())
}

/// Returns a redirect target for a stored URL, defaulting to `https://` when
/// no scheme is present.
pub fn with_default_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?q=1#frag").is_ok());
        assert!(validate_url("https://sub.example.co.uk:8443/a/b").is_ok());
    }

    #[test]
    fn test_empty_url_is_bad_request() {
        let err = validate_url("").unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_unparseable_url_is_unprocessable() {
        let err = validate_url("not-a-url").unwrap_err();
        assert!(matches!(err, AppError::Unprocessable { .. }));
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[test]
    fn test_non_http_scheme_is_unprocessable() {
        for url in ["ftp://example.com", "javascript:alert(1)", "file:///etc/passwd"] {
            let err = validate_url(url).unwrap_err();
            assert!(matches!(err, AppError::Unprocessable { .. }), "{url}");
        }
    }

    #[test]
    fn test_overlong_url_is_unprocessable() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        let err = validate_url(&url).unwrap_err();
        assert!(err.to_string().contains("between 5 and 2000"));
    }

    #[test]
    fn test_url_at_max_length_is_accepted() {
        let prefix = "https://example.com/";
        let url = format!("{prefix}{}", "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert_eq!(url.len(), MAX_URL_LENGTH);
        assert!(validate_url(&url).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let prefix = "https://example.com/";
        let url = format!("{prefix}{}", "é".repeat(MAX_URL_LENGTH - prefix.len()));
        assert!(url.len() > MAX_URL_LENGTH);
        assert!(validate_url(&url).is_ok());

        let url = format!("{url}é");
        let err = validate_url(&url).unwrap_err();
        assert!(matches!(err, AppError::Unprocessable { .. }));
    }

    #[test]
    fn test_blocked_domain_is_forbidden() {
        let err = validate_url("https://phishing.com/login").unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let err = validate_url("http://MALICIOUS-SITE.com").unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_subdomain_of_blocked_domain_is_allowed() {
        assert!(validate_url("https://safe.phishing.com.example.org").is_ok());
    }

    #[test]
    fn test_with_default_scheme() {
        assert_eq!(with_default_scheme("https://a.com"), "https://a.com");
        assert_eq!(with_default_scheme("http://a.com"), "http://a.com");
        assert_eq!(with_default_scheme("a.com/x"), "https://a.com/x");
    }
}
