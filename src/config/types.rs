use serde::Deserialize;

/// Window size used when neither the command line nor the config names one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Main configuration structure for Paged-Extract
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub fetcher: FetcherConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Where the URL list lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Newline-delimited URL list
    #[serde(rename = "urls-path")]
    pub urls_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            urls_path: "urls.txt".to_string(),
        }
    }
}

/// HTTP fetching behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Minimum gap between the end of one request and the start of the next (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request deadline (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum redirect hops followed by the transport
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            timeout_secs: 30,
            max_redirects: 10,
            user_agent: format!("paged-extract/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Selectors and markers used to pull content out of HTML pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Selector for the primary content subtree
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Subtrees removed from the primary content before taking its text
    #[serde(rename = "noise-selectors")]
    pub noise_selectors: Vec<String>,

    /// Raw-HTML substring that sets the classification flag
    pub fingerprint: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_selector: "#main-content".to_string(),
            noise_selectors: vec![
                "nav".to_string(),
                "footer".to_string(),
                ".breadcrumb".to_string(),
                ".page-options".to_string(),
            ],
            fingerprint: "swe-styles.css".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only CSV results file
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Append-only audit log
    #[serde(rename = "log-path")]
    pub log_path: String,

    /// Default window size
    #[serde(rename = "page-size")]
    pub page_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "results.csv".to_string(),
            log_path: "extraction.log".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
