#![allow(unused)]

//! # contract: Sponsorship records and the fetch interface
//!
//! This module defines the plain data exchanged between the pipeline stages
//! and the single trait ([`Fetcher`]) behind which sponsorship retrieval sits.
//!
//! ## Interface & Extensibility
//! - Implement [`Fetcher`] to pull sponsorships from somewhere other than the
//!   GitHub GraphQL API (a fixture file, a cache, a different forge).
//! - The method is async and returns [`ApiError`] on any retrieval failure.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks (`MockFetcher`) for unit/integration tests.
//!
//! ## Type Sources
//! - Field names follow the GitHub GraphQL schema (`sponsorEntity`,
//!   `privacyLevel`, `tier.monthlyPriceInCents`) through serde renames.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::automock;

use crate::config::ActionConfig;
use crate::error::ApiError;

/// Visibility chosen by the sponsor. Private sponsorships are never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    Public,
    Private,
}

/// The sponsorship tier; only the monthly price takes part in filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub monthly_price_in_cents: u64,
}

/// The user or organization behind a sponsorship: the renderable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorEntity {
    /// Display name. GitHub returns null for accounts without one.
    pub name: Option<String>,
    pub login: String,
    pub url: String,
    pub website_url: Option<String>,
}

impl SponsorEntity {
    /// Returns a copy where a missing `website_url` is replaced by `url`.
    pub fn with_website_fallback(&self) -> SponsorEntity {
        let mut entity = self.clone();
        if entity.website_url.as_deref().map_or(true, str::is_empty) {
            entity.website_url = Some(entity.url.clone());
        }
        entity
    }

    /// Looks up a template variable by its GraphQL field name.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => self.name.as_deref(),
            "login" => Some(&self.login),
            "url" => Some(&self.url),
            "websiteUrl" => self.website_url.as_deref(),
            _ => None,
        }
    }
}

/// A single sponsorship node as returned by `sponsorshipsAsMaintainer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    /// Opaque creation timestamp; never parsed.
    pub created_at: String,
    pub privacy_level: PrivacyLevel,
    pub tier: Tier,
    #[serde(rename = "sponsorEntity")]
    pub entity: SponsorEntity,
}

/// Outcome of patching the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The marker region was found and rewritten.
    Success,
    /// No marker pair was present; the file was left untouched.
    Skipped,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for retrieving every sponsorship of the configured maintainer.
/// Implemented by the GraphQL client and by test mocks.
///
/// Pages are requested strictly one after another; implementors must return
/// records in retrieval order.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch all sponsorships, following pagination until exhausted.
    async fn fetch_all(&self, config: &ActionConfig) -> Result<Vec<Sponsor>, ApiError>;
}
