//! Per-team running totals and final value metrics.
//!
//! This module provides:
//! - `TeamAggregator`: keyed store of `TeamAccumulator`s, first-reference order
//! - `compute_value`: accumulator -> `TeamValueRecord` (profit, VSV)
//! - `rank_by_value`: stable descending sort by VSV

use crate::config::EngineConfig;
use crate::models::{BetOutcome, TeamAccumulator, TeamKey, TeamValueRecord};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Running totals keyed by `(team, league)`.
///
/// Teams keep the order in which they were first referenced; that order is
/// what the final stable sort falls back to on equal VSV.
#[derive(Debug, Clone, Default)]
pub struct TeamAggregator {
    index: FxHashMap<TeamKey, usize>,
    teams: Vec<TeamAccumulator>,
}

impl TeamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one bet into its team, creating a zeroed accumulator on first use.
    pub fn fold(&mut self, outcome: &BetOutcome) {
        let key = outcome.key();
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.teams.push(TeamAccumulator::new(&key));
                self.index.insert(key, self.teams.len() - 1);
                self.teams.len() - 1
            }
        };

        let acc = &mut self.teams[slot];
        if outcome.is_favorite {
            acc.favorite_count += 1;
        } else {
            acc.outsider_count += 1;
        }
        acc.total_stake += outcome.stake;
        acc.total_return += outcome.payout;
    }

    pub fn fold_all<'a, I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = &'a BetOutcome>,
    {
        for outcome in outcomes {
            self.fold(outcome);
        }
    }

    pub fn get(&self, key: &TeamKey) -> Option<&TeamAccumulator> {
        self.index.get(key).map(|&i| &self.teams[i])
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamAccumulator> {
        self.teams.iter()
    }

    /// Accumulators in first-reference order
    pub fn into_accumulators(self) -> Vec<TeamAccumulator> {
        self.teams
    }
}

/// Stake total implied by the counters under the configured tiers.
pub fn expected_stake(acc: &TeamAccumulator, config: &EngineConfig) -> f64 {
    acc.favorite_count as f64 * config.favorite_stake
        + acc.outsider_count as f64 * config.outsider_stake
}

/// Derive profit and VSV from a finalized accumulator.
pub fn compute_value(acc: &TeamAccumulator) -> TeamValueRecord {
    let profit = acc.total_return - acc.total_stake;
    let value_percent = if acc.total_stake > 0.0 {
        profit / acc.total_stake * 100.0
    } else {
        0.0
    };

    TeamValueRecord {
        team_id: acc.team_id.clone(),
        league_id: acc.league_id.clone(),
        favorite_count: acc.favorite_count,
        outsider_count: acc.outsider_count,
        total_stake: acc.total_stake,
        total_return: acc.total_return,
        profit,
        value_percent,
    }
}

/// Sort by VSV descending. `sort_by` is stable, so equal values keep their
/// input order.
pub fn rank_by_value(mut records: Vec<TeamValueRecord>) -> Vec<TeamValueRecord> {
    records.sort_by(|a, b| {
        b.value_percent
            .partial_cmp(&a.value_percent)
            .unwrap_or(Ordering::Equal)
    });
    records
}
