// Shared models for the VSV ranking engine
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Raw Acquisition Payload
// ============================================================================

/// Raw text returned by the acquisition collaborator.
///
/// Decoding (fence stripping, JSON parse, schema checks) belongs to
/// [`crate::validation`], so a garbled reply is a skipped record rather than a
/// failed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload {
    pub text: String,
}

impl RawPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Match & Odds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// One completed fixture after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    /// Opaque reference used to fetch the odds quote
    pub match_ref: String,
}

impl MatchRecord {
    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }

    /// Side with the strictly higher score, `None` on a draw
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering;
        match self.home_score.cmp(&self.away_score) {
            Ordering::Greater => Some(Side::Home),
            Ordering::Less => Some(Side::Away),
            Ordering::Equal => None,
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} {}-{} {}",
            self.home_team, self.home_score, self.away_score, self.away_team
        )
    }
}

/// Decimal Draw No Bet odds for one match, both strictly above 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub home_odds: f64,
    pub away_odds: f64,
}

impl OddsQuote {
    pub fn odds(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_odds,
            Side::Away => self.away_odds,
        }
    }

    /// Strictly lower odds wins the favorite tag; equal odds yield `None`.
    pub fn favorite(&self) -> Option<Side> {
        if self.home_odds < self.away_odds {
            Some(Side::Home)
        } else if self.away_odds < self.home_odds {
            Some(Side::Away)
        } else {
            None
        }
    }
}

// ============================================================================
// Bet Outcomes & Team State
// ============================================================================

/// One simulated flat-stake bet on one team in one settled match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetOutcome {
    pub team_id: String,
    pub league_id: String,
    pub side: Side,
    pub is_favorite: bool,
    pub stake: f64,
    /// `stake * odds` when the team won, otherwise 0
    pub payout: f64,
}

impl BetOutcome {
    pub fn won(&self) -> bool {
        self.payout > 0.0
    }

    pub fn key(&self) -> TeamKey {
        TeamKey::new(&self.team_id, &self.league_id)
    }
}

/// Teams are league-scoped: the same name under two leagues is two teams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamKey {
    pub team_id: String,
    pub league_id: String,
}

impl TeamKey {
    pub fn new(team_id: &str, league_id: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            league_id: league_id.to_string(),
        }
    }
}

/// Running totals for one team, folded once per settled match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAccumulator {
    pub team_id: String,
    pub league_id: String,
    pub favorite_count: u32,
    pub outsider_count: u32,
    pub total_stake: f64,
    pub total_return: f64,
}

impl TeamAccumulator {
    pub fn new(key: &TeamKey) -> Self {
        Self {
            team_id: key.team_id.clone(),
            league_id: key.league_id.clone(),
            favorite_count: 0,
            outsider_count: 0,
            total_stake: 0.0,
            total_return: 0.0,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Final per-team value metrics. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamValueRecord {
    pub team_id: String,
    pub league_id: String,
    pub favorite_count: u32,
    pub outsider_count: u32,
    pub total_stake: f64,
    pub total_return: f64,
    /// `total_return - total_stake`
    pub profit: f64,
    /// VSV: `profit / total_stake * 100`, 0 when nothing was staked
    pub value_percent: f64,
}

/// Per-league processing counters, logged and attached to the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStats {
    pub league: String,
    /// Records returned by the collaborator
    pub fetched: usize,
    /// Records inside the match cap
    pub considered: usize,
    pub draws: usize,
    pub rejected_matches: usize,
    pub rejected_odds: usize,
    pub settled: usize,
    pub teams: usize,
    /// Whole league dropped because its payload was malformed
    pub payload_rejected: bool,
}

/// Successful run output: the complete ranked list plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub run_id: String,
    pub records: Vec<TeamValueRecord>,
    pub leagues: Vec<LeagueStats>,
    pub generated_at: DateTime<Utc>,
}

impl RankingReport {
    pub fn team_count(&self) -> usize {
        self.records.len()
    }

    pub fn settled_matches(&self) -> usize {
        self.leagues.iter().map(|l| l.settled).sum()
    }
}
