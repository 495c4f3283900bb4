//! Bet outcome resolution for one settled match.
//!
//! Flat-stake Draw No Bet policy:
//! - the side with strictly lower decimal odds is the favorite and gets the
//!   favorite stake; the other side (and both sides on equal odds) gets the
//!   outsider stake
//! - the side with the strictly higher score is paid `stake * odds`, the
//!   loser is paid nothing

use crate::config::EngineConfig;
use crate::models::{BetOutcome, MatchRecord, OddsQuote, Side};

/// Home and away bets for one match
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub home: BetOutcome,
    pub away: BetOutcome,
}

impl ResolvedMatch {
    pub fn into_outcomes(self) -> [BetOutcome; 2] {
        [self.home, self.away]
    }
}

/// Resolve both bets of a validated, non-draw match.
///
/// Returns `None` for a draw: Draw No Bet has nothing to settle there.
pub fn resolve_match(
    record: &MatchRecord,
    quote: &OddsQuote,
    league_id: &str,
    config: &EngineConfig,
) -> Option<ResolvedMatch> {
    let winner = record.winner()?;
    let favorite = quote.favorite();

    let outcome = |side: Side| {
        let is_favorite = favorite == Some(side);
        let stake = config.stake_for(is_favorite);
        let payout = if winner == side {
            stake * quote.odds(side)
        } else {
            0.0
        };
        BetOutcome {
            team_id: record.team(side).to_string(),
            league_id: league_id.to_string(),
            side,
            is_favorite,
            stake,
            payout,
        }
    };

    Some(ResolvedMatch {
        home: outcome(Side::Home),
        away: outcome(Side::Away),
    })
}
