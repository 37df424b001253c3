#![doc = "sponsor-splice-core: core pipeline library for sponsor-splice."]

//! This crate contains the fetch, render and patch stages used by the
//! `sponsor-splice` binary, along with the data models they exchange.
//! CLI parsing, environment lookup and logging setup live in the binary crate.
//!
//! # Usage
//! Build an [`config::ActionConfig`], pick a [`contract::Fetcher`]
//! (normally [`fetch::GraphqlFetcher`]) and hand both to
//! [`pipeline::run_action`].

pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod patch;
pub mod pipeline;
pub mod template;
