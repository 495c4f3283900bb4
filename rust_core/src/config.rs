//! Engine parameters: per-league match cap and the two flat stake tiers.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of most-recent matches considered per league
pub const DEFAULT_MATCH_LIMIT: usize = 50;

/// Default stake placed on the favorite of a match
pub const DEFAULT_FAVORITE_STAKE: f64 = 100.0;

/// Default stake placed on the outsider of a match (also used on equal odds)
pub const DEFAULT_OUTSIDER_STAKE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub match_limit: usize,
    pub favorite_stake: f64,
    pub outsider_stake: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_limit: DEFAULT_MATCH_LIMIT,
            favorite_stake: DEFAULT_FAVORITE_STAKE,
            outsider_stake: DEFAULT_OUTSIDER_STAKE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_limit == 0 {
            return Err(ConfigError::ZeroMatchLimit);
        }
        check_stake("favorite", self.favorite_stake)?;
        check_stake("outsider", self.outsider_stake)?;
        Ok(())
    }

    /// Stake tier for a team given its favorite classification
    #[inline]
    pub fn stake_for(&self, is_favorite: bool) -> f64 {
        if is_favorite {
            self.favorite_stake
        } else {
            self.outsider_stake
        }
    }
}

fn check_stake(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStake { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_flat_stake_policy() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.match_limit, 50);
        assert_eq!(cfg.stake_for(true), 100.0);
        assert_eq!(cfg.stake_for(false), 50.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_match_limit_rejected() {
        let cfg = EngineConfig {
            match_limit: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMatchLimit));
    }

    #[test]
    fn test_bad_stakes_rejected() {
        let cfg = EngineConfig {
            favorite_stake: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidStake { name: "favorite", .. })
        ));

        let cfg = EngineConfig {
            outsider_stake: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidStake { name: "outsider", .. })
        ));
    }
}
