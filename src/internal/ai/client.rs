use std::time::Duration;

use reqwest::Client as HttpClient;

/// Per-request timeout; covers image edits and clip downloads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A generic client for generative media providers.
///
/// It holds the shared HTTP client, base URL, and provider-specific extension.
/// This client handles common HTTP logic like timeouts and proxy configuration.
#[derive(Clone, Debug)]
pub struct Client<P> {
    /// The base URL of the provider's API, without a trailing slash.
    pub base_url: String,
    /// The shared HTTP client (reqwest).
    pub http_client: HttpClient,
    /// Provider-specific logic (e.g., authentication).
    pub provider: P,
}

impl<P> Client<P> {
    /// Creates a new generic Client with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: &str, provider: P) -> Self {
        Self::with_timeout(base_url, provider, DEFAULT_TIMEOUT)
    }

    /// Creates a new generic Client.
    ///
    /// # Arguments
    /// * `base_url` - The base API URL.
    /// * `provider` - The provider-specific implementation.
    /// * `timeout` - Per-request timeout applied to every call.
    ///
    /// System proxy settings are picked up from the environment by reqwest.
    pub fn with_timeout(base_url: &str, provider: P, timeout: Duration) -> Self {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to build HTTP client with timeout: {}. Using default client.",
                    e
                );
                HttpClient::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            provider,
        }
    }

    /// Joins an API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Trait defining provider-specific behavior.
pub trait Provider: Send + Sync {
    /// Allows the provider to customize the HTTP request (e.g., adding headers).
    ///
    /// # Arguments
    /// * `request` - The pending HTTP request builder.
    ///
    /// # Returns
    /// The modified request builder.
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }
}
