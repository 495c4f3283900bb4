//! Ranking pipeline: leagues -> matches -> bets -> team totals -> ranked VSV.
//!
//! A run has two phases:
//! 1. `accumulate`: strictly sequential acquisition and folding, league by
//!    league, match by match. Malformed data is skipped; an acquisition
//!    error aborts the run and everything collected so far is dropped.
//! 2. `finalize`: only reached on success; computes values and ranks.
//!
//! Output is all-or-nothing: there is no partial or streamed result.

use crate::aggregator::{compute_value, expected_stake, rank_by_value, TeamAggregator};
use crate::config::EngineConfig;
use crate::error::{AcquisitionError, ConfigError, Rejection, RunFailure};
use crate::league_config::LeagueConfig;
use crate::models::{LeagueStats, RankingReport, TeamAccumulator, TeamValueRecord};
use crate::providers::MatchDataProvider;
use crate::resolver::{resolve_match, ResolvedMatch};
use crate::validation::{decode_match_list, validate_match, validate_odds};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Terminal status of one run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Complete ranked list
    Succeeded(RankingReport),
    /// Run completed but no league produced a single settled match
    NoData { leagues: Vec<LeagueStats> },
    /// Acquisition failed; nothing is reported
    Failed(RunFailure),
}

impl RunOutcome {
    pub fn records(&self) -> &[TeamValueRecord] {
        match self {
            RunOutcome::Succeeded(report) => &report.records,
            _ => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded(_))
    }
}

/// Everything the accumulation phase collected, across all leagues.
#[derive(Debug, Default)]
pub struct CollectedData {
    /// League order, then first-reference order within each league
    pub accumulators: Vec<TeamAccumulator>,
    pub leagues: Vec<LeagueStats>,
}

/// One league's folded totals
#[derive(Debug)]
pub struct LeagueResult {
    pub aggregator: TeamAggregator,
    pub stats: LeagueStats,
}

/// What happened to one raw match entry
enum MatchDisposition {
    Settled(ResolvedMatch),
    Draw,
    RejectedMatch(Rejection),
    RejectedOdds(Rejection),
}

pub struct RankingPipeline<P> {
    provider: P,
    leagues: Vec<LeagueConfig>,
    config: EngineConfig,
}

impl<P: MatchDataProvider> RankingPipeline<P> {
    pub fn new(
        provider: P,
        leagues: Vec<LeagueConfig>,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if leagues.is_empty() {
            return Err(ConfigError::NoLeagues);
        }
        Ok(Self {
            provider,
            leagues,
            config,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn leagues(&self) -> &[LeagueConfig] {
        &self.leagues
    }

    /// Execute a full run.
    pub async fn run(&self) -> RunOutcome {
        let run_id = Uuid::new_v4().to_string();
        info!(
            "Starting VSV run {} over {} league(s) via {}",
            run_id,
            self.leagues.len(),
            self.provider.provider_name()
        );

        let collected = match self.accumulate().await {
            Ok(collected) => collected,
            Err(failure) => {
                error!("Run {} failed, discarding all results: {}", run_id, failure);
                return RunOutcome::Failed(failure);
            }
        };

        if collected.accumulators.is_empty() {
            warn!("Run {} finished without a single settled match", run_id);
            return RunOutcome::NoData {
                leagues: collected.leagues,
            };
        }

        let report = finalize(collected, run_id);
        info!(
            "Run {} finished: {} team(s) from {} settled match(es)",
            report.run_id,
            report.team_count(),
            report.settled_matches()
        );
        RunOutcome::Succeeded(report)
    }

    /// Phase 1. Any acquisition error discards everything collected so far.
    pub async fn accumulate(&self) -> Result<CollectedData, RunFailure> {
        let mut collected = CollectedData::default();

        for league in &self.leagues {
            let result = self
                .process_league(league)
                .await
                .map_err(|source| RunFailure {
                    league: league.name.clone(),
                    source,
                })?;

            collected
                .accumulators
                .extend(result.aggregator.into_accumulators());
            collected.leagues.push(result.stats);
        }

        Ok(collected)
    }

    /// Fetch, cap, validate, resolve and fold one league.
    pub async fn process_league(
        &self,
        league: &LeagueConfig,
    ) -> Result<LeagueResult, AcquisitionError> {
        info!("Loading {}...", league.name);
        let mut aggregator = TeamAggregator::new();
        let mut stats = LeagueStats {
            league: league.name.clone(),
            ..Default::default()
        };

        let payload = self.provider.fetch_matches(league).await?;
        let matches = match decode_match_list(&payload) {
            Ok(matches) => matches,
            Err(rejection) => {
                warn!("{}: match list rejected, league skipped: {}", league.name, rejection);
                stats.payload_rejected = true;
                return Ok(LeagueResult { aggregator, stats });
            }
        };

        stats.fetched = matches.len();
        stats.considered = matches.len().min(self.config.match_limit);
        if stats.fetched > stats.considered {
            debug!(
                "{}: {} match(es) beyond the cap of {} ignored",
                league.name,
                stats.fetched - stats.considered,
                self.config.match_limit
            );
        }

        for (i, raw) in matches.iter().take(self.config.match_limit).enumerate() {
            debug!("{}: match {}/{}", league.name, i + 1, stats.considered);

            match self.settle_match(raw, league).await? {
                MatchDisposition::Settled(resolved) => {
                    stats.settled += 1;
                    aggregator.fold_all(&resolved.into_outcomes());
                }
                MatchDisposition::Draw => stats.draws += 1,
                MatchDisposition::RejectedMatch(rejection) => {
                    warn!("{}: match #{} skipped: {}", league.name, i + 1, rejection);
                    stats.rejected_matches += 1;
                }
                MatchDisposition::RejectedOdds(rejection) => {
                    warn!("{}: match #{} has no usable odds: {}", league.name, i + 1, rejection);
                    stats.rejected_odds += 1;
                }
            }
        }

        debug_assert!(aggregator
            .iter()
            .all(|acc| (acc.total_stake - expected_stake(acc, &self.config)).abs() < 1e-6));

        stats.teams = aggregator.len();
        info!(
            "{}: processed {} match(es), {} team(s) ({} draw(s), {} rejected, {} without odds)",
            league.name,
            stats.settled,
            stats.teams,
            stats.draws,
            stats.rejected_matches,
            stats.rejected_odds
        );

        Ok(LeagueResult { aggregator, stats })
    }

    /// Validate one raw entry and, unless it is skipped, fetch its odds and
    /// resolve both bets. Only the odds request can fail the run.
    async fn settle_match(
        &self,
        raw: &Value,
        league: &LeagueConfig,
    ) -> Result<MatchDisposition, AcquisitionError> {
        let record = match validate_match(raw) {
            Ok(record) => record,
            Err(rejection) => return Ok(MatchDisposition::RejectedMatch(rejection)),
        };

        if record.is_draw() {
            debug!("Skipping draw: {}", record.label());
            return Ok(MatchDisposition::Draw);
        }

        let payload = self.provider.fetch_odds(&record.match_ref).await?;
        let quote = match validate_odds(&payload) {
            Ok(quote) => quote,
            Err(rejection) => return Ok(MatchDisposition::RejectedOdds(rejection)),
        };

        debug!(
            "Processing match: {} ({} vs {})",
            record.label(),
            quote.home_odds,
            quote.away_odds
        );

        Ok(resolve_match(&record, &quote, &league.name, &self.config)
            .map(MatchDisposition::Settled)
            .unwrap_or(MatchDisposition::Draw))
    }
}

/// Phase 2: value every accumulator and rank the whole list at once.
pub fn finalize(collected: CollectedData, run_id: String) -> RankingReport {
    let records = collected.accumulators.iter().map(compute_value).collect();

    RankingReport {
        run_id,
        records: rank_by_value(records),
        leagues: collected.leagues,
        generated_at: Utc::now(),
    }
}
