//! Utility functions and helpers

use crate::error::{CopsError, Result};
use std::path::PathBuf;
use url::Url;

/// URL validation utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate a base URL and return it without a trailing slash, so that
    /// API paths starting with `/` can be appended directly.
    pub fn normalize_base_url(input: &str) -> Result<String> {
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| CopsError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;

        Ok(url_str.trim_end_matches('/').to_string())
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .ok_or_else(|| CopsError::Config("Cannot determine home directory".to_string())),
            None => Ok(PathBuf::from(path)),
        }
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse a `key=value` form field. The value may itself contain `=`.
    pub fn parse_field(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(CopsError::Config(format!(
                "Invalid field format: '{}'. Expected 'key=value'",
                input
            ))),
        }
    }

    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, multiplier) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(CopsError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part
            .parse()
            .map_err(|_| CopsError::Config(format!("Invalid timeout number: '{}'", number_part)))?;

        Ok(std::time::Duration::from_secs(number * multiplier))
    }
}
