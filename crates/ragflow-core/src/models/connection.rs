use std::fmt;
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection parameters for one RAGFlow server
///
/// Immutable once built. The base URL is normalized on construction so
/// endpoint paths can be appended directly.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ConnectionConfig {
    /// Create a connection config with the default timeout
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join an absolute API path (`/api/v1/...`) onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Value of the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_secret(&self.api_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Strip every trailing `/` from a base URL
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Keep the last four characters of a secret for display
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ConnectionConfig::new("http://host:9380/", "key");
        assert_eq!(config.base_url(), "http://host:9380");
        assert_eq!(config.endpoint("/api/v1/datasets"), "http://host:9380/api/v1/datasets");
    }

    #[test]
    fn test_repeated_trailing_slashes_are_stripped() {
        let config = ConnectionConfig::new("http://host:9380///", "key");
        assert_eq!(config.base_url(), "http://host:9380");
    }

    #[test]
    fn test_default_timeout() {
        let config = ConnectionConfig::new("http://localhost:9380", "key");
        assert_eq!(config.timeout(), Duration::from_secs(30));

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bearer_header_value() {
        let config = ConnectionConfig::new("http://localhost:9380", "ragflow-abc");
        assert_eq!(config.bearer(), "Bearer ragflow-abc");
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = ConnectionConfig::new("http://localhost:9380", "ragflow-secret-1234");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ragflow-secret"));
        assert!(debug.contains("1234"));
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
