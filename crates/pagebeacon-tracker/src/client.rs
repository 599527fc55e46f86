//! Shared HTTP client utilities and the request-tagging wrapper

use crate::{Result, TrackerError};
use pagebeacon_core::{ClientContext, SessionId};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use std::time::Duration;

/// Header carrying the session identifier on in-origin requests
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Header carrying the `{width}x{height}` screen resolution
pub const RESOLUTION_HEADER: &str = "X-Screen-Resolution";

/// Header carrying the IANA timezone name
pub const TIMEZONE_HEADER: &str = "X-Timezone";

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HttpClientConfig {
    /// Request timeout in seconds. None means requests wait indefinitely;
    /// an unresolved collector call simply never completes.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of idle connections per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pool_max_idle_per_host() -> usize {
    8
}

fn default_user_agent() -> String {
    format!("PageBeacon/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            user_agent: default_user_agent(),
        }
    }
}

/// Create a configured HTTP client with connection pooling
pub fn create_client(config: &HttpClientConfig) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        // Expire idle connections before upstream servers close them
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    if let Some(timeout_secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    builder
        .build()
        .map_err(|e| TrackerError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// HTTP client wrapper that tags in-origin requests with session context.
///
/// Every request whose URL is prefixed by the configured API base carries
/// the [`SESSION_HEADER`], [`RESOLUTION_HEADER`] and [`TIMEZONE_HEADER`]
/// headers; any other URL passes through untouched. All outbound analytics
/// traffic goes through one instance of this wrapper, so no call site has
/// to thread the headers by hand.
#[derive(Debug, Clone)]
pub struct TaggedClient {
    client: Client,
    api_base: String,
    session_id: SessionId,
    context: ClientContext,
}

impl TaggedClient {
    /// Create a new tagging wrapper around a pooled client
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        session_id: SessionId,
        context: ClientContext,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            session_id,
            context,
        }
    }

    /// The session identifier stamped on in-origin requests
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The configured API base URL
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL for a collector endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Whether a URL targets the configured API origin
    pub fn is_in_origin(&self, url: &str) -> bool {
        url.starts_with(&self.api_base)
    }

    /// Build a request, tagging it when the URL is in-origin
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        if self.is_in_origin(url) {
            builder
                .header(SESSION_HEADER, &self.session_id)
                .header(RESOLUTION_HEADER, self.context.screen_resolution())
                .header(TIMEZONE_HEADER, &self.context.timezone)
        } else {
            builder
        }
    }

    /// Build a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Build a POST request
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebeacon_core::generate_session_id;

    fn tagged_client(api_base: &str) -> TaggedClient {
        let client = create_client(&HttpClientConfig::default()).unwrap();
        TaggedClient::new(
            client,
            api_base,
            generate_session_id(),
            ClientContext::new(1920, 1080, "Asia/Tokyo"),
        )
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.user_agent.starts_with("PageBeacon/"));
    }

    #[test]
    fn test_create_client() {
        let config = HttpClientConfig::default();
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_client_with_timeout() {
        let config = HttpClientConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_in_origin_request_carries_headers() {
        let tagged = tagged_client("http://localhost:3001/api");
        let request = tagged
            .get("http://localhost:3001/api/analytics/track")
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(
            headers.get(SESSION_HEADER).unwrap().to_str().unwrap(),
            tagged.session_id()
        );
        assert_eq!(headers.get(RESOLUTION_HEADER).unwrap(), "1920x1080");
        assert_eq!(headers.get(TIMEZONE_HEADER).unwrap(), "Asia/Tokyo");
    }

    #[test]
    fn test_foreign_request_passes_through() {
        let tagged = tagged_client("http://localhost:3001/api");
        let request = tagged.get("https://other.example.com/page").build().unwrap();

        let headers = request.headers();
        assert!(headers.get(SESSION_HEADER).is_none());
        assert!(headers.get(RESOLUTION_HEADER).is_none());
        assert!(headers.get(TIMEZONE_HEADER).is_none());
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let tagged = tagged_client("http://localhost:3001/api");
        assert_eq!(
            tagged.endpoint("/auth/check-token"),
            "http://localhost:3001/api/auth/check-token"
        );
    }

    #[test]
    fn test_is_in_origin_prefix_match() {
        let tagged = tagged_client("http://localhost:3001/api");
        assert!(tagged.is_in_origin("http://localhost:3001/api/analytics/track"));
        assert!(!tagged.is_in_origin("http://localhost:3001/other"));
        assert!(!tagged.is_in_origin("https://cdn.example.com/asset.png"));
    }
}
