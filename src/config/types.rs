use crate::output::ExportFormat;
use crate::record::DetailLevel;
use serde::{Deserialize, Serialize};

/// Main configuration structure for Job-Harvest
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Returns a copy safe to print: the stored password is masked
    pub fn masked(&self) -> Config {
        let mut copy = self.clone();
        if copy.auth.password.is_some() {
            copy.auth.password = Some("********".to_string());
        }
        copy
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Default detail level (1 = listing summary, 2 = detail page, 3 = detail + description)
    #[serde(rename = "detail-level")]
    pub detail_level: DetailLevel,

    /// Maximum attempts per detail page
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Time to wait for a page landmark to appear (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Lower bound of the delay before each listing page (milliseconds)
    #[serde(rename = "page-delay-min-ms")]
    pub page_delay_min_ms: u64,

    /// Upper bound of the delay before each listing page (milliseconds)
    #[serde(rename = "page-delay-max-ms")]
    pub page_delay_max_ms: u64,

    /// Lower bound of the delay before each detail attempt (milliseconds)
    #[serde(rename = "detail-delay-min-ms")]
    pub detail_delay_min_ms: u64,

    /// Upper bound of the delay before each detail attempt (milliseconds)
    #[serde(rename = "detail-delay-max-ms")]
    pub detail_delay_max_ms: u64,

    /// Number of leading requirement tags that are site boilerplate
    #[serde(rename = "skipped-requirement-tags")]
    pub skipped_requirement_tags: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            detail_level: DetailLevel::Structured,
            max_retries: 3,
            page_timeout_secs: 15,
            page_delay_min_ms: 2_000,
            page_delay_max_ms: 5_000,
            detail_delay_min_ms: 1_000,
            detail_delay_max_ms: 3_000,
            skipped_requirement_tags: 3,
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Path to a Chrome/Chromium binary (autodetected when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Disable the Chrome sandbox (needed in some containers)
    #[serde(rename = "no-sandbox")]
    pub no_sandbox: bool,

    /// Upper bound for a single navigation (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"
                .to_string(),
            executable: None,
            no_sandbox: false,
            navigation_timeout_secs: 30,
        }
    }
}

/// Target site layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Origin that detail references are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the search-results listing
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Path of the login page
    #[serde(rename = "login-path")]
    pub login_path: String,

    /// Country filter sent with every listing query
    pub country: String,

    /// Location filter sent with every listing query
    #[serde(rename = "location-name")]
    pub location_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://glints.com".to_string(),
            listing_path: "/id/opportunities/jobs/explore".to_string(),
            login_path: "/id/login".to_string(),
            country: "ID".to_string(),
            location_name: "All Cities/Provinces".to_string(),
        }
    }
}

/// Login configuration
///
/// Credentials are stored in plain text; keep the config file private.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Log in with the stored credentials without prompting
    #[serde(rename = "auto-login")]
    pub auto_login: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Abort the run when login does not succeed
    pub required: bool,

    /// Maximum login attempts before giving up
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Time to wait for each login form element (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auto_login: false,
            username: None,
            password: None,
            required: false,
            max_attempts: 3,
            timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default export format
    pub format: ExportFormat,

    /// Root directory for per-term result folders
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// Directory used when a result folder cannot be created
    #[serde(rename = "fallback-dir")]
    pub fallback_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            results_dir: "results".to_string(),
            fallback_dir: ".".to_string(),
        }
    }
}
