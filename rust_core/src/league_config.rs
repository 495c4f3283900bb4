//! League configuration for the value index run.
//!
//! This module provides:
//! - Static, ordered configuration of the processed leagues
//! - Lookup and subset selection by league code

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration for a single league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// League code (e.g., "epl", "laliga")
    pub code: String,
    /// Display name, also used as the league id of team records
    pub name: String,
    /// Results page handed to the acquisition collaborator
    pub source_ref: String,
}

impl LeagueConfig {
    pub fn new(code: &str, name: &str, source_ref: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            source_ref: source_ref.to_string(),
        }
    }
}

struct StaticLeague {
    code: &'static str,
    name: &'static str,
    source_ref: &'static str,
}

/// Processing order of the run.
static LEAGUES: &[StaticLeague] = &[
    StaticLeague {
        code: "epl",
        name: "Premier League",
        source_ref: "https://www.livesport.cz/fotbal/anglie/premier-league/vysledky/",
    },
    StaticLeague {
        code: "laliga",
        name: "La Liga",
        source_ref: "https://www.livesport.cz/fotbal/spanelsko/laliga/vysledky/",
    },
    StaticLeague {
        code: "seriea",
        name: "Serie A",
        source_ref: "https://www.livesport.cz/fotbal/italie/serie-a/vysledky/",
    },
    StaticLeague {
        code: "bundesliga",
        name: "Bundesliga",
        source_ref: "https://www.livesport.cz/fotbal/nemecko/bundesliga/vysledky/",
    },
    StaticLeague {
        code: "ligue1",
        name: "Ligue 1",
        source_ref: "https://www.livesport.cz/fotbal/francie/ligue-1/vysledky/",
    },
];

impl From<&StaticLeague> for LeagueConfig {
    fn from(l: &StaticLeague) -> Self {
        LeagueConfig::new(l.code, l.name, l.source_ref)
    }
}

/// Get league configuration by code.
pub fn get_league_config(code: &str) -> Option<LeagueConfig> {
    LEAGUES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code))
        .map(LeagueConfig::from)
}

/// All configured leagues in processing order.
pub fn default_leagues() -> Vec<LeagueConfig> {
    LEAGUES.iter().map(LeagueConfig::from).collect()
}

/// Get list of all league codes.
pub fn get_all_league_codes() -> Vec<&'static str> {
    LEAGUES.iter().map(|l| l.code).collect()
}

/// Select a subset of the configured leagues.
///
/// The processing order of the static list is kept regardless of the order
/// of `codes`; duplicates are ignored.
pub fn select_leagues<S: AsRef<str>>(codes: &[S]) -> Result<Vec<LeagueConfig>, ConfigError> {
    for code in codes {
        if get_league_config(code.as_ref()).is_none() {
            return Err(ConfigError::UnknownLeague(code.as_ref().to_string()));
        }
    }

    let selected: Vec<LeagueConfig> = LEAGUES
        .iter()
        .filter(|l| codes.iter().any(|c| l.code.eq_ignore_ascii_case(c.as_ref())))
        .map(LeagueConfig::from)
        .collect();

    if selected.is_empty() {
        return Err(ConfigError::NoLeagues);
    }
    Ok(selected)
}
