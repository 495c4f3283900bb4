//! Research Provider
//!
//! Implements MatchDataProvider on top of the research service: one prompt
//! per league for its recent results, one prompt per match for its Draw No
//! Bet quote. The service's reply text is handed back untouched.

use super::MatchDataProvider;
use crate::clients::AnthropicClient;
use crate::error::AcquisitionError;
use crate::league_config::LeagueConfig;
use crate::models::RawPayload;
use async_trait::async_trait;
use tracing::debug;

pub const DEFAULT_ODDS_PAGE_BASE_URL: &str = "https://www.livesport.cz";
const ODDS_PAGE_SUFFIX: &str = "/kurzy/draw-no-bet/zakladni-doba/";

#[derive(Debug, Clone)]
pub struct ResearchProviderConfig {
    /// Host prefix for the odds page of a `match_ref`
    pub odds_page_base_url: String,
    /// Number of completed rounds requested per league
    pub rounds: u32,
    pub matches_max_tokens: u32,
    pub odds_max_tokens: u32,
}

impl Default for ResearchProviderConfig {
    fn default() -> Self {
        Self {
            odds_page_base_url: DEFAULT_ODDS_PAGE_BASE_URL.to_string(),
            rounds: 5,
            matches_max_tokens: 4000,
            odds_max_tokens: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResearchProvider {
    client: AnthropicClient,
    config: ResearchProviderConfig,
}

impl ResearchProvider {
    pub fn new(client: AnthropicClient, config: ResearchProviderConfig) -> Self {
        Self { client, config }
    }

    /// Odds page URL for a match; absolute refs are used as-is.
    pub fn odds_page_url(&self, match_ref: &str) -> String {
        let base = if match_ref.starts_with("http://") || match_ref.starts_with("https://") {
            match_ref.trim_end_matches('/').to_string()
        } else {
            format!(
                "{}/{}",
                self.config.odds_page_base_url.trim_end_matches('/'),
                match_ref.trim_matches('/')
            )
        };
        format!("{}{}", base, ODDS_PAGE_SUFFIX)
    }

    fn matches_prompt(&self, league: &LeagueConfig) -> String {
        format!(
            "I need data from {url} ({name}).\n\
             \n\
             1. Find all matches of the last {rounds} completed rounds of this competition.\n\
             2. For each match return, in JSON:\n\
             \x20  - home_team: name of the home team\n\
             \x20  - away_team: name of the away team\n\
             \x20  - home_score: goals scored by the home team\n\
             \x20  - away_score: goals scored by the away team\n\
             \x20  - match_url: URL path of the match detail (in the form /zapas/...)\n\
             \n\
             Return ONLY a plain JSON array, most recent match first, with no other text, \
             preamble or markdown backticks.",
            url = league.source_ref,
            name = league.name,
            rounds = self.config.rounds,
        )
    }

    fn odds_prompt(&self, match_ref: &str) -> String {
        format!(
            "From the page {url} I need the \"Draw No Bet\" odds.\n\
             \n\
             Return ONLY a JSON object in this format, with no other text:\n\
             {{\n\
             \x20 \"home_odds\": number (decimal odds on the home team),\n\
             \x20 \"away_odds\": number (decimal odds on the away team)\n\
             }}\n\
             \n\
             If the odds are not available, return null.",
            url = self.odds_page_url(match_ref),
        )
    }
}

#[async_trait]
impl MatchDataProvider for ResearchProvider {
    async fn fetch_matches(&self, league: &LeagueConfig) -> Result<RawPayload, AcquisitionError> {
        debug!("Researching results for {} ({})", league.name, league.source_ref);
        let text = self
            .client
            .research(&self.matches_prompt(league), self.config.matches_max_tokens)
            .await?;
        Ok(RawPayload::new(text))
    }

    async fn fetch_odds(&self, match_ref: &str) -> Result<RawPayload, AcquisitionError> {
        let text = self
            .client
            .research(&self.odds_prompt(match_ref), self.config.odds_max_tokens)
            .await?;
        Ok(RawPayload::new(text))
    }

    fn provider_name(&self) -> &str {
        "research"
    }
}
