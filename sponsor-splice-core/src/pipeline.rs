//! High-level pipeline: orchestrates fetch → render → patch for one target file.
//!
//! This module provides the top-level orchestration for a single run of the
//! action. It:
//!   - Validates the [`ActionConfig`] before any network traffic
//!   - Fetches every sponsorship through a [`Fetcher`]
//!   - Renders and splices them into the marker region via [`patch_file`]
//!
//! # Error Handling
//! Each failed step returns immediately. API and file errors already carry
//! their scrubbed, user-facing message; callers only need to log and exit.
//!
//! # Callable From
//! - The CLI crate and integration tests. Tests usually pass a `MockFetcher`.

use tracing::{error, info};

use crate::config::ActionConfig;
use crate::contract::{Fetcher, Status};
use crate::error::ActionError;
use crate::patch::patch_file;

pub async fn run_action<F>(fetcher: &F, config: &ActionConfig) -> Result<Status, ActionError>
where
    F: Fetcher + ?Sized,
{
    config.validate().map_err(|e| {
        error!(error = %e, "[RUN][ERROR] Invalid configuration");
        e
    })?;
    info!(file = %config.file.display(), "[RUN] Starting sponsorship update");

    let sponsors = match fetcher.fetch_all(config).await {
        Ok(sponsors) => {
            info!(count = sponsors.len(), "[RUN] Fetch succeeded");
            sponsors
        }
        Err(e) => {
            error!(error = %e, "[RUN][ERROR] Fetch failed");
            return Err(e.into());
        }
    };

    match patch_file(&sponsors, config) {
        Ok(status) => {
            info!(%status, "[RUN] Completed");
            Ok(status)
        }
        Err(e) => {
            error!(error = %e, "[RUN][ERROR] Patch failed");
            Err(e.into())
        }
    }
}
