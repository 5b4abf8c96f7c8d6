//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a run, including:
//! - Building the HTTP client with user agent, timeout and redirect policy
//! - Classifying each response into a [`FetchOutcome`]
//! - Downloading the body only for successful HTML responses
//! - Mapping transport errors to data instead of propagating them

use crate::config::FetcherConfig;
use crate::crawler::scheduler::RequestPacer;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Result of a single fetch
///
/// Exactly one variant is produced per request. `body` is only ever present
/// for a 2xx response whose Content-Type is HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered, whatever the status code
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Whether the transport followed at least one redirect
        redirected: bool,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Page body, only for successful HTML responses
        body: Option<String>,
    },

    /// No usable response (DNS failure, connection refused, timeout, ...)
    Failure {
        /// Error classification
        kind: FetchErrorKind,
        /// Error description
        message: String,
    },
}

impl FetchOutcome {
    /// Returns the HTML body if this outcome carries one
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => body.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    /// Returns true if the request failed at the transport level
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Classification of transport-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The per-request deadline was exceeded
    Timeout,
    /// DNS resolution or TCP/TLS connection failed
    Connect,
    /// Redirect limit exceeded or an invalid redirect
    Redirect,
    /// Response body could not be read or decoded
    Body,
    /// Any other request error (invalid URL, protocol error, ...)
    Request,
}

impl FetchErrorKind {
    /// Returns the label written to the output `error` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::Connect => "ConnectionError",
            Self::Redirect => "RedirectError",
            Self::Body => "BodyError",
            Self::Request => "RequestError",
        }
    }

    /// Classifies a reqwest error
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_redirect() {
            Self::Redirect
        } else if error.is_body() || error.is_decode() {
            Self::Body
        } else {
            Self::Request
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can turn a URL into a [`FetchOutcome`]
///
/// Implementations must never fail: every error is reported as
/// [`FetchOutcome::Failure`].
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches one URL
    async fn fetch(&mut self, url: &str) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed by the transport up to `max_redirects` hops; the
/// final URL is reported on the outcome.
///
/// # Example
///
/// ```no_run
/// use paged_extract::config::FetcherConfig;
/// use paged_extract::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header value denotes an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Fetches a URL and classifies the response
///
/// # Request Flow
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx + HTML Content-Type | `Success` with body |
/// | 2xx + other Content-Type | `Success`, no body downloaded |
/// | non-2xx | `Success`, no body downloaded |
/// | Timeout | `Failure { kind: Timeout }` |
/// | DNS / connect / protocol error | `Failure` with matching kind |
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Failure {
                kind: FetchErrorKind::from_reqwest(&e),
                message: e.to_string(),
            }
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();
    let redirected = Url::parse(url)
        .map(|requested| &requested != response.url())
        .unwrap_or(true);

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Dropping the response without reading it leaves the payload undownloaded
    if !status.is_success() || !is_html_content_type(&content_type) {
        return FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            redirected,
            content_type,
            body: None,
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            redirected,
            content_type,
            body: Some(body),
        },
        Err(e) => FetchOutcome::Failure {
            kind: FetchErrorKind::from_reqwest(&e),
            message: e.to_string(),
        },
    }
}

/// Sequential fetcher that spaces requests with a [`RequestPacer`]
pub struct RateLimitedFetcher {
    client: Client,
    pacer: RequestPacer,
}

impl RateLimitedFetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(
            client,
            Duration::from_millis(config.request_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, min_gap: Duration) -> Self {
        Self {
            client,
            pacer: RequestPacer::new(min_gap),
        }
    }
}

impl PageFetcher for RateLimitedFetcher {
    async fn fetch(&mut self, url: &str) -> FetchOutcome {
        self.pacer.wait_turn().await;
        let outcome = fetch_url(&self.client, url).await;
        self.pacer.record_finished();
        outcome
    }
}
