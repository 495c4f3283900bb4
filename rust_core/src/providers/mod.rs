//! Match data provider abstractions
//!
//! Defines the MatchDataProvider trait behind which the acquisition
//! collaborator lives (research service, offline fixtures, ...). Providers
//! return raw text; decoding is done by [`crate::validation`].

use crate::error::AcquisitionError;
use crate::league_config::LeagueConfig;
use crate::models::RawPayload;
use async_trait::async_trait;

// Concrete provider implementations
pub mod fixture;
pub mod research;

pub use fixture::{FixtureData, FixtureProvider};
pub use research::{ResearchProvider, ResearchProviderConfig};

/// Source of completed matches and Draw No Bet quotes.
///
/// An `Err` is fatal to the whole run. A payload that is merely empty or
/// malformed must be returned as `Ok` so the pipeline can skip it.
#[async_trait]
pub trait MatchDataProvider: Send + Sync {
    /// Recently completed matches of one league, most recent first
    async fn fetch_matches(&self, league: &LeagueConfig) -> Result<RawPayload, AcquisitionError>;

    /// Draw No Bet quote for one match (`null` when unavailable)
    async fn fetch_odds(&self, match_ref: &str) -> Result<RawPayload, AcquisitionError>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}
