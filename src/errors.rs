//! Error types for sanitizing and linkifying
//!
//! Every error is a configuration or input-limit error raised before the
//! input is parsed. Once parsing starts the pipeline cannot fail: the HTML5
//! parser repairs any input into a tree, and filtering and serialization
//! are total over trees.

use thiserror::Error;

/// Result type alias for sanitizer operations
pub type SanitizeResult<T> = Result<T, SanitizeError>;

/// Error types for sanitizer operations
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Allowed tag name is empty or contains markup characters
    #[error("Invalid tag name in allow-list: '{0}'")]
    InvalidTagName(String),

    /// Allowed attribute name is empty or contains markup characters
    #[error("Invalid attribute name '{name}' in allow-list for tag '{tag}'")]
    InvalidAttributeName { tag: String, name: String },

    /// Allowed style property is not a plain CSS identifier
    #[error("Invalid CSS property in style allow-list: '{0}'")]
    InvalidStyleProperty(String),

    /// Custom linkify URL pattern failed to compile
    #[error("Invalid linkify URL pattern: {0}")]
    InvalidUrlPattern(#[from] regex::Error),

    /// Options document does not have a recognised shape
    #[error("Invalid sanitizer options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// Input exceeds the configured size limit
    #[error("HTML input too large: {size} bytes. Maximum allowed: {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

impl SanitizeError {
    /// Check if the error comes from the caller's configuration rather than the input
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, SanitizeError::InputTooLarge { .. })
    }
}

/// Reject `html` when it exceeds `limit`
pub(crate) fn check_input_size(html: &str, limit: Option<usize>) -> SanitizeResult<()> {
    match limit {
        Some(limit) if html.len() > limit => Err(SanitizeError::InputTooLarge {
            size: html.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
