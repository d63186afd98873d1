use crate::config::types::{
    AuthConfig, BrowserConfig, Config, CrawlerConfig, OutputConfig, SiteConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_site_config(&config.site)?;
    validate_auth_config(&config.auth)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page_timeout_secs must be >= 1".to_string(),
        ));
    }

    validate_interval(
        "page delay",
        config.page_delay_min_ms,
        config.page_delay_max_ms,
    )?;
    validate_interval(
        "detail delay",
        config.detail_delay_min_ms,
        config.detail_delay_max_ms,
    )?;

    Ok(())
}

/// Checks that a delay interval is not inverted
fn validate_interval(name: &str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::Validation(format!(
            "{} minimum ({}ms) must not exceed maximum ({}ms)",
            name, min, max
        )));
    }
    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "navigation_timeout_secs must be >= 1".to_string(),
        ));
    }

    if matches!(&config.executable, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "executable cannot be an empty path".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target site layout
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    for (name, path) in [
        ("listing_path", &config.listing_path),
        ("login_path", &config.login_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    if config.country.trim().is_empty() {
        return Err(ConfigError::Validation(
            "country cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates login configuration
fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "auth timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.auto_login {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !filled(&config.username) || !filled(&config.password) {
            return Err(ConfigError::Validation(
                "auto_login requires both username and password".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    if config.fallback_dir.is_empty() {
        return Err(ConfigError::Validation(
            "fallback_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
