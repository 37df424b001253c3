use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use sponsor_splice_core::config::ActionConfig;
use tracing::{error, info, warn};

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const OWNER_VAR: &str = "GITHUB_REPOSITORY_OWNER";

/// Non-secret settings. Every key is optional and falls back to the
/// [`ActionConfig`] default.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    file: Option<PathBuf>,
    template: Option<String>,
    minimum: Option<u64>,
    maximum: Option<u64>,
    marker: Option<String>,
    #[serde(default)]
    organization: bool,
    fallback: Option<String>,
    api_url: Option<String>,
}

/// Loads a static YAML config file (no secrets) and injects the token and
/// repository owner from the environment.
/// Returns a validated ActionConfig or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ActionConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    // An empty file is a valid "all defaults" config.
    let static_conf: StaticConfig = if config_content.trim().is_empty() {
        StaticConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    let token = match std::env::var(TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => {
            info!("{TOKEN_VAR} found in env");
            token
        }
        _ => {
            error!("{TOKEN_VAR} environment variable not set");
            anyhow::bail!(
                "No deployment token was provided. Set {TOKEN_VAR} to a Personal Access Token scoped to user:read and org:read."
            );
        }
    };

    let owner = std::env::var(OWNER_VAR).ok().filter(|o| !o.is_empty());
    if static_conf.organization && owner.is_none() {
        error!("{OWNER_VAR} must be set when organization is true");
        anyhow::bail!("{OWNER_VAR} environment variable not set, but organization mode is enabled");
    }

    let defaults = ActionConfig::default();
    let config = ActionConfig {
        token,
        file: static_conf.file.unwrap_or(defaults.file),
        template: static_conf.template.unwrap_or(defaults.template),
        minimum: static_conf.minimum.unwrap_or(defaults.minimum),
        maximum: static_conf.maximum.unwrap_or(defaults.maximum),
        marker: static_conf.marker.unwrap_or(defaults.marker),
        organization: static_conf.organization,
        fallback: static_conf.fallback.unwrap_or(defaults.fallback),
        owner,
        api_url: static_conf.api_url.unwrap_or(defaults.api_url),
    };

    if config.maximum > 0 && config.maximum < config.minimum {
        warn!(
            minimum = config.minimum,
            maximum = config.maximum,
            "maximum is below minimum; every sponsor will be filtered out"
        );
    }

    config.validate()?;
    config.trace_loaded();
    Ok(config)
}
