//! Cursor-paginated retrieval of `sponsorshipsAsMaintainer` over GraphQL.
//!
//! Pages of 100 are requested one after another, each using the end cursor of
//! the previous page, until `totalCount` records are collected. A response
//! without the expected connection object ends pagination quietly with
//! whatever was collected so far.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::ActionConfig;
use crate::contract::{Fetcher, Sponsor};
use crate::error::ApiError;

/// Sponsorships requested per page; the API maximum.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    viewer: Option<Maintainer>,
    organization: Option<Maintainer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Maintainer {
    sponsorships_as_maintainer: Option<SponsorshipConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipConnection {
    total_count: u64,
    page_info: PageInfo,
    nodes: Option<Vec<Sponsor>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
}

/// Builds the sponsorship query for one page.
///
/// `after` is only emitted when a cursor from a previous page is supplied.
pub fn build_query(config: &ActionConfig, cursor: Option<&str>) -> String {
    let after = cursor
        .map(|c| format!("after: {}, ", quote(c)))
        .unwrap_or_default();
    let subject = if config.organization {
        format!(
            "organization (login: {})",
            quote(config.owner.as_deref().unwrap_or_default())
        )
    } else {
        "viewer".to_string()
    };

    format!(
        r#"query {{
  {subject} {{
    login
    sponsorshipsAsMaintainer(first: {PAGE_SIZE}, {after}orderBy: {{field: CREATED_AT, direction: ASC}}) {{
      totalCount
      pageInfo {{
        endCursor
      }}
      nodes {{
        sponsorEntity {{
          ... on Organization {{
            name
            login
            url
            websiteUrl
          }}
          ... on User {{
            name
            login
            url
            websiteUrl
          }}
        }}
        createdAt
        privacyLevel
        tier {{
          monthlyPriceInCents
        }}
      }}
    }}
  }}
}}"#
    )
}

/// GraphQL string literals share JSON's escaping rules.
fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// [`Fetcher`] backed by the GitHub GraphQL API at `config.api_url`.
pub struct GraphqlFetcher {
    client: Client,
}

impl GraphqlFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issues one page request and returns the connection, if the response has one.
    async fn fetch_page(
        &self,
        endpoint: &str,
        query: &str,
        config: &ActionConfig,
    ) -> Result<Option<SponsorshipConnection>, ApiError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&config.token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| {
                let err = ApiError::new(e, config);
                error!(error = %err.message, "[FETCH][ERROR] Request failed");
                err
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::new(e, config))?;

        if !status.is_success() {
            error!(status = %status, "[FETCH][ERROR] GraphQL endpoint returned an error status");
            return Err(ApiError::new(format!("HTTP {status}: {body}"), config));
        }

        let parsed: GraphqlResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, "[FETCH][ERROR] Failed to decode GraphQL response");
            ApiError::new(e, config)
        })?;

        let Some(data) = parsed.data else {
            let message = if parsed.errors.is_empty() {
                "response contained no data".to_string()
            } else {
                parsed
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(ApiError::new(message, config));
        };

        let maintainer = if config.organization {
            data.organization
        } else {
            data.viewer
        };
        Ok(maintainer.and_then(|m| m.sponsorships_as_maintainer))
    }
}

#[async_trait::async_trait]
impl Fetcher for GraphqlFetcher {
    async fn fetch_all(&self, config: &ActionConfig) -> Result<Vec<Sponsor>, ApiError> {
        info!(
            "[FETCH] Fetching data from the GitHub API as {}… ⚽",
            if config.organization { "Organization" } else { "User" }
        );

        if config.organization && config.owner.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::new(
                "organization mode requires the repository owner login",
                config,
            ));
        }

        let endpoint = format!("{}/graphql", config.api_url.trim_end_matches('/'));
        let mut cursor: Option<String> = None;
        let mut collected: Vec<Sponsor> = Vec::new();

        loop {
            let query = build_query(config, cursor.as_deref());
            let Some(connection) = self.fetch_page(&endpoint, &query, config).await? else {
                debug!(
                    collected = collected.len(),
                    "[FETCH] Response had no sponsorship connection, stopping"
                );
                break;
            };

            let nodes = connection.nodes.unwrap_or_default();
            let received = nodes.len();
            collected.extend(nodes);
            cursor = connection.page_info.end_cursor;
            debug!(
                received,
                collected = collected.len(),
                total = connection.total_count,
                "[FETCH] Page received"
            );

            if connection.total_count <= collected.len() as u64 {
                break;
            }
            if received == 0 || cursor.is_none() {
                warn!(
                    collected = collected.len(),
                    total = connection.total_count,
                    "[FETCH] API reported more sponsorships but returned no way to reach them"
                );
                break;
            }
        }

        info!(count = collected.len(), "[FETCH] Retrieved sponsorships");
        Ok(collected)
    }
}
