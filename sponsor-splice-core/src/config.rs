use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ActionError;

/// Base URL of the public GitHub API. `/graphql` is appended per request.
pub const GITHUB_API: &str = "https://api.github.com";

pub const DEFAULT_FILE: &str = "README.md";
pub const DEFAULT_MARKER: &str = "sponsors";
pub const DEFAULT_TEMPLATE: &str = r#"<a href="https://github.com/{{{ login }}}"><img src="https://github.com/{{{ login }}}.png" width="60px" alt="{{{ name }}}" /></a>"#;

/// Everything a single run needs. Built once by the caller and never mutated.
#[derive(Clone)]
pub struct ActionConfig {
    /// Bearer token for the GraphQL API. Redacted from logs and error text.
    pub token: String,
    /// File containing the marker pair.
    pub file: PathBuf,
    /// Template rendered once per sponsor.
    pub template: String,
    /// Inclusive lower bound on `tier.monthlyPriceInCents`.
    pub minimum: u64,
    /// Inclusive upper bound on `tier.monthlyPriceInCents`; 0 means unbounded.
    pub maximum: u64,
    /// Text inside the `<!-- ... -->` comments delimiting the owned region.
    pub marker: String,
    /// Query `organization(login: owner)` instead of `viewer`.
    pub organization: bool,
    /// Written between the markers when every sponsor is filtered out.
    pub fallback: String,
    /// Organization login, required when `organization` is set.
    pub owner: Option<String>,
    /// API base URL (GitHub Enterprise or a test server).
    pub api_url: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            file: PathBuf::from(DEFAULT_FILE),
            template: DEFAULT_TEMPLATE.to_string(),
            minimum: 0,
            maximum: 0,
            marker: DEFAULT_MARKER.to_string(),
            organization: false,
            fallback: String::new(),
            owner: None,
            api_url: GITHUB_API.to_string(),
        }
    }
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("token", &"***")
            .field("file", &self.file)
            .field("template", &self.template)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("marker", &self.marker)
            .field("organization", &self.organization)
            .field("fallback", &self.fallback)
            .field("owner", &self.owner)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ActionConfig {
    /// Rejects configurations that cannot possibly complete a run.
    pub fn validate(&self) -> Result<(), ActionError> {
        if self.token.trim().is_empty() {
            return Err(ActionError::Config(
                "No deployment token was provided. You must provide the action with a Personal Access Token scoped to user:read and org:read.".to_string(),
            ));
        }
        if self.file.as_os_str().is_empty() {
            return Err(ActionError::Config("No file was provided.".to_string()));
        }
        if self.marker.is_empty() {
            return Err(ActionError::Config("No marker was provided.".to_string()));
        }
        if self.organization && self.owner.as_deref().map_or(true, str::is_empty) {
            return Err(ActionError::Config(
                "Organization mode requires GITHUB_REPOSITORY_OWNER to be set.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            file = %self.file.display(),
            marker = %self.marker,
            organization = self.organization,
            minimum = self.minimum,
            maximum = self.maximum,
            "Loaded ActionConfig"
        );
        debug!(?self, "ActionConfig loaded (full debug)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ActionConfig {
        ActionConfig {
            token: "123".into(),
            ..ActionConfig::default()
        }
    }

    #[test]
    fn default_config_with_token_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = ActionConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("No deployment token was provided"));
    }

    #[test]
    fn organization_mode_requires_owner() {
        let mut config = valid();
        config.organization = true;
        assert!(config.validate().is_err());

        config.owner = Some("octo-org".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = ActionConfig {
            token: "ghp_secret".into(),
            ..ActionConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("***"));
    }
}
