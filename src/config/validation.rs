use crate::config::types::{Config, ExtractionConfig, FetcherConfig, InputConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_input_config(&config.input)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extraction_config(&config.extraction)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.urls_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "urls_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction configuration
///
/// Selectors are parsed here so a typo fails the run up front instead of
/// degrading every row to an extraction error.
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    validate_selector(&config.content_selector)?;

    for selector in &config.noise_selectors {
        validate_selector(selector)?;
    }

    if config.fingerprint.is_empty() {
        return Err(ConfigError::Validation(
            "fingerprint cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    if config.log_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "log_path cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(
            "selector cannot be empty".to_string(),
        ));
    }

    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
