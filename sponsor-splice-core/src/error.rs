//! Error types for the fetch and patch stages.
//!
//! Every message that leaves this crate passes through
//! [`suppress_sensitive_information`] first, so the bearer token cannot end up
//! in logs or CI output.

use thiserror::Error;

use crate::config::ActionConfig;

/// Failure while talking to the GraphQL API or decoding its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There was an error with the GitHub API request: {message} ❌")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    /// Wraps `message` after scrubbing the configured token from it.
    pub fn new(message: impl std::fmt::Display, config: &ActionConfig) -> Self {
        Self {
            message: suppress_sensitive_information(&message.to_string(), config),
        }
    }
}

/// Failure while reading or writing the target file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There was an error generating the updated file: {message} ❌")]
pub struct FileError {
    pub message: String,
}

impl FileError {
    pub fn new(message: impl std::fmt::Display, config: &ActionConfig) -> Self {
        Self {
            message: suppress_sensitive_information(&message.to_string(), config),
        }
    }
}

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    File(#[from] FileError),
}

/// Replaces every occurrence of the configured token with `***`.
pub fn suppress_sensitive_information(text: &str, config: &ActionConfig) -> String {
    if config.token.is_empty() {
        return text.to_string();
    }
    text.replace(config.token.as_str(), "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: &str) -> ActionConfig {
        ActionConfig {
            token: token.into(),
            ..ActionConfig::default()
        }
    }

    #[test]
    fn token_is_replaced_everywhere() {
        let config = config_with_token("ghp_abc");
        let scrubbed =
            suppress_sensitive_information("Bearer ghp_abc rejected (ghp_abc)", &config);
        assert_eq!(scrubbed, "Bearer *** rejected (***)");
    }

    #[test]
    fn empty_token_leaves_text_alone() {
        let config = config_with_token("");
        assert_eq!(suppress_sensitive_information("abc", &config), "abc");
    }

    #[test]
    fn api_error_has_prefix_and_glyph() {
        let config = config_with_token("123");
        let err = ApiError::new("Mocked throw", &config);
        assert_eq!(
            err.to_string(),
            "There was an error with the GitHub API request: Mocked throw ❌"
        );
    }

    #[test]
    fn file_error_scrubs_token() {
        let config = config_with_token("s3cr3t");
        let err = FileError::new("cannot write s3cr3t.md", &config);
        assert_eq!(
            err.to_string(),
            "There was an error generating the updated file: cannot write ***.md ❌"
        );
    }
}
