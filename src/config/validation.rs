use crate::config::types::{BatchConfig, Config, ExtractConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on the bounded-pool size
pub const MAX_POOL_SIZE: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_batch_config(&config.batch)?;
    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates batch configuration
pub(crate) fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.pool_size < 1 || config.pool_size > MAX_POOL_SIZE {
        return Err(ConfigError::Validation(format!(
            "pool_size must be between 1 and {}, got {}",
            MAX_POOL_SIZE, config.pool_size
        )));
    }

    if config.repeat < 1 {
        return Err(ConfigError::Validation(
            "repeat must be >= 1, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates that both selectors are non-empty, parseable CSS
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    validate_selector("block_selector", &config.block_selector)?;
    validate_selector("link_selector", &config.link_selector)?;
    Ok(())
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, selector, e))
    })?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation("root cannot be empty".to_string()));
    }

    if config.extension.is_empty() {
        return Err(ConfigError::Validation(
            "extension cannot be empty".to_string(),
        ));
    }

    if !config.extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "extension must be alphanumeric, got '{}'",
            config.extension
        )));
    }

    Ok(())
}
