// src/core/target.rs

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("no target URL was given")]
    Empty,
    #[error("'{0}' is not a valid target URL: {1}")]
    Invalid(String, String),
}

/// The normalized root URL of a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: String,
    origin: String,
    host: String,
}

impl Target {
    /// Normalizes user input: `http://` is assumed when no scheme is given,
    /// scheme and host are lower-cased and trailing slashes are stripped.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let parsed = Url::parse(&with_scheme)
            .map_err(|e| TargetError::Invalid(trimmed.to_string(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TargetError::Invalid(
                trimmed.to_string(),
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TargetError::Invalid(trimmed.to_string(), "missing host".to_string()))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();

        // The parsed form lower-cases scheme and host, so the root URL and
        // links resolved against `origin` spell the same page identically.
        Ok(Self {
            origin: parsed.origin().ascii_serialization(),
            url: parsed.as_str().trim_end_matches('/').to_string(),
            host,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `scheme://host[:port]`, used for root-relative links and same-origin checks.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_scheme_and_strips_trailing_slash() {
        let target = Target::parse("example.test/").unwrap();
        assert_eq!(target.url(), "http://example.test");
        assert_eq!(target.origin(), "http://example.test");
        assert_eq!(target.host(), "example.test");
    }

    #[test]
    fn keeps_explicit_scheme_port_and_path() {
        let target = Target::parse("https://example.test:8443/app//").unwrap();
        assert_eq!(target.url(), "https://example.test:8443/app");
        assert_eq!(target.origin(), "https://example.test:8443");
    }

    #[test]
    fn rejects_empty_and_unparseable_input() {
        assert_eq!(Target::parse("   "), Err(TargetError::Empty));
        assert!(matches!(Target::parse("http://exa mple.test"), Err(TargetError::Invalid(..))));
    }

    #[test]
    fn url_and_origin_share_one_spelling() {
        let target = Target::parse("HTTP://Example.TEST/").unwrap();
        assert_eq!(target.url(), "http://example.test");
        assert_eq!(target.origin(), "http://example.test");
        assert_eq!(target.host(), "example.test");

        let target = Target::parse("Https://Example.test/Shop").unwrap();
        assert_eq!(target.url(), "https://example.test/Shop");
        assert!(target.url().starts_with(target.origin()));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(Target::parse("ftp://example.test"), Err(TargetError::Invalid(..))));
    }
}
