use std::fs;

use regex::{Captures, Regex};
use tracing::{debug, error, info};

use crate::config::ActionConfig;
use crate::contract::{Sponsor, Status};
use crate::error::FileError;
use crate::template::render;

/// Matches the shortest span from one `<!-- marker -->` comment to the next.
pub fn marker_regex(marker: &str) -> Result<Regex, regex::Error> {
    let comment = format!("<!-- {} -->", regex::escape(marker));
    Regex::new(&format!(r"(?s)({comment}).*?({comment})"))
}

/// Rewrites the region between the marker comments of `config.file`.
///
/// The markers themselves and everything outside them are preserved. A file
/// without a marker pair is left untouched and reported as [`Status::Skipped`].
pub fn patch_file(sponsors: &[Sponsor], config: &ActionConfig) -> Result<Status, FileError> {
    info!(file = %config.file.display(), "[PATCH] Generating updated file… 📁");

    let regex = marker_regex(&config.marker).map_err(|e| {
        error!(error = ?e, marker = %config.marker, "[PATCH][ERROR] Invalid marker");
        FileError::new(e, config)
    })?;

    let data = fs::read_to_string(&config.file).map_err(|e| {
        error!(error = ?e, file = %config.file.display(), "[PATCH][ERROR] Failed to read file");
        FileError::new(format!("{}: {e}", config.file.display()), config)
    })?;

    if !regex.is_match(&data) {
        info!(marker = %config.marker, "[PATCH] Marker pair not found, skipping");
        return Ok(Status::Skipped);
    }

    let rendered = render(sponsors, config);
    let updated = regex.replace_all(&data, |caps: &Captures| {
        format!("{}{}{}", &caps[1], rendered, &caps[2])
    });
    debug!(bytes = updated.len(), "[PATCH] Replaced marker region");

    fs::write(&config.file, updated.as_bytes()).map_err(|e| {
        error!(error = ?e, file = %config.file.display(), "[PATCH][ERROR] Failed to write file");
        FileError::new(format!("{}: {e}", config.file.display()), config)
    })?;

    info!(file = %config.file.display(), "[PATCH] File updated");
    Ok(Status::Success)
}
