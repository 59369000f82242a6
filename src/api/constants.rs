//! Endpoints and defaults for the AetherOne HTTP API

use std::time::Duration;

/// Server address used when neither config nor environment provide one
pub const DEFAULT_BASE_URL: &str = "http://localhost:7000/";

/// Liveness endpoint, plain-text body
pub const PING_ENDPOINT: &str = "ping";

/// Case collection endpoint (GET lists, POST saves)
pub const CASE_ENDPOINT: &str = "case";

/// Plugin discovery endpoint, returns `{"plugins": [...]}`
pub const PLUGINS_ENDPOINT: &str = "plugins";

/// Default request timeout for every call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("aether-cli/", env!("CARGO_PKG_VERSION"));

/// Standard headers
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Accept header for the liveness endpoint
    pub const ACCEPT_TEXT: &str = "text/plain";
}

/// Ensure the base URL ends with a single path separator so that
/// endpoint joins keep any path prefix the server is mounted under.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_trailing_slash() {
        assert_eq!(normalize_base_url("http://localhost:7000"), "http://localhost:7000/");
        assert_eq!(normalize_base_url(" http://host/api "), "http://host/api/");
    }

    #[test]
    fn test_normalize_keeps_existing_slash() {
        assert_eq!(normalize_base_url(DEFAULT_BASE_URL), DEFAULT_BASE_URL);
    }
}
