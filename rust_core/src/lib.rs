//! VSV Core - Draw No Bet value index for football teams.
//!
//! This module provides:
//! - Schema-validating decode of match results and Draw No Bet quotes
//! - Flat-stake bet resolution (favorite / outsider stake tiers)
//! - League-scoped per-team aggregation and value (VSV) computation
//! - A sequential, all-or-nothing ranking pipeline over several leagues
//! - Acquisition providers (research service client, offline fixtures)

pub mod aggregator;
pub mod circuit_breaker;
pub mod clients;
pub mod config;
pub mod error;
pub mod league_config;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod resolver;
pub mod validation;

pub use config::EngineConfig;
pub use error::{AcquisitionError, ConfigError, Rejection, RunFailure};
pub use league_config::LeagueConfig;
pub use models::*;
pub use pipeline::{RankingPipeline, RunOutcome};
pub use providers::MatchDataProvider;
