//! Fixture Provider
//!
//! Serves canned payloads keyed by league code / `source_ref` and by
//! `match_ref`. Used for offline runs and tests; records every request so
//! callers can assert on what was (not) fetched.

use super::MatchDataProvider;
use crate::error::AcquisitionError;
use crate::league_config::LeagueConfig;
use crate::models::RawPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// On-disk fixture format.
///
/// A JSON string value is served verbatim as raw text, anything else is
/// served as its JSON serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    /// League code or `source_ref` -> match list payload
    #[serde(default)]
    pub leagues: HashMap<String, Value>,
    /// `match_ref` -> odds payload
    #[serde(default)]
    pub odds: HashMap<String, Value>,
    /// League codes / refs whose fetch fails at the transport level
    #[serde(default)]
    pub failing_leagues: HashSet<String>,
    /// Match refs whose odds fetch fails at the transport level
    #[serde(default)]
    pub failing_odds: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct FixtureProvider {
    data: FixtureData,
    requests: Mutex<Vec<String>>,
}

impl FixtureProvider {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Load from JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let data: FixtureData = serde_json::from_str(&content)
            .with_context(|| format!("Invalid fixture JSON in {}", path.display()))?;
        Ok(Self::new(data))
    }

    pub fn with_matches(mut self, league: &str, payload: Value) -> Self {
        self.data.leagues.insert(league.to_string(), payload);
        self
    }

    /// Serve `text` verbatim as the league's match payload
    pub fn with_raw_matches(self, league: &str, text: &str) -> Self {
        self.with_matches(league, Value::String(text.to_string()))
    }

    pub fn with_odds(mut self, match_ref: &str, payload: Value) -> Self {
        self.data.odds.insert(match_ref.to_string(), payload);
        self
    }

    pub fn failing_league(mut self, league: &str) -> Self {
        self.data.failing_leagues.insert(league.to_string());
        self
    }

    pub fn failing_odds(mut self, match_ref: &str) -> Self {
        self.data.failing_odds.insert(match_ref.to_string());
        self
    }

    /// Requests served so far, as `matches:<code>` / `odds:<ref>`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn odds_requests(&self) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.starts_with("odds:"))
            .count()
    }

    fn to_payload(value: &Value) -> RawPayload {
        match value {
            Value::String(text) => RawPayload::new(text.clone()),
            other => RawPayload::from_json(other),
        }
    }
}

#[async_trait]
impl MatchDataProvider for FixtureProvider {
    async fn fetch_matches(&self, league: &LeagueConfig) -> Result<RawPayload, AcquisitionError> {
        self.requests.lock().push(format!("matches:{}", league.code));

        let keys = [league.code.as_str(), league.source_ref.as_str()];
        if keys.iter().any(|k| self.data.failing_leagues.contains(*k)) {
            return Err(AcquisitionError::transport(
                self.provider_name(),
                format!("simulated failure fetching {}", league.name),
            ));
        }

        Ok(keys
            .iter()
            .find_map(|k| self.data.leagues.get(*k))
            .map(Self::to_payload)
            .unwrap_or_else(RawPayload::empty))
    }

    async fn fetch_odds(&self, match_ref: &str) -> Result<RawPayload, AcquisitionError> {
        self.requests.lock().push(format!("odds:{}", match_ref));

        if self.data.failing_odds.contains(match_ref) {
            return Err(AcquisitionError::transport(
                self.provider_name(),
                format!("simulated failure fetching odds for {}", match_ref),
            ));
        }

        Ok(self
            .data
            .odds
            .get(match_ref)
            .map(Self::to_payload)
            .unwrap_or_else(|| RawPayload::new("null")))
    }

    fn provider_name(&self) -> &str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn epl() -> LeagueConfig {
        LeagueConfig::new("epl", "Premier League", "https://example.test/epl")
    }

    #[tokio::test]
    async fn test_serves_by_code_or_source_ref() {
        let provider = FixtureProvider::default().with_matches("https://example.test/epl", json!([]));
        let payload = provider.fetch_matches(&epl()).await.unwrap();
        assert_eq!(payload.text, "[]");
    }

    #[tokio::test]
    async fn test_raw_text_served_verbatim() {
        let provider = FixtureProvider::default().with_raw_matches("epl", "```json\n[]\n```");
        let payload = provider.fetch_matches(&epl()).await.unwrap();
        assert_eq!(payload.text, "```json\n[]\n```");
    }

    #[tokio::test]
    async fn test_missing_entries() {
        let provider = FixtureProvider::default();
        assert!(provider.fetch_matches(&epl()).await.unwrap().is_blank());
        assert_eq!(provider.fetch_odds("/zapas/1").await.unwrap().text, "null");
        assert_eq!(provider.requests(), vec!["matches:epl", "odds:/zapas/1"]);
        assert_eq!(provider.odds_requests(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let provider = FixtureProvider::default()
            .failing_league("epl")
            .failing_odds("/zapas/9");
        assert!(matches!(
            provider.fetch_matches(&epl()).await,
            Err(AcquisitionError::Transport { .. })
        ));
        assert!(provider.fetch_odds("/zapas/9").await.is_err());
    }

    #[test]
    fn test_fixture_file_format() {
        let data: FixtureData = serde_json::from_value(json!({
            "leagues": { "epl": [{"home_team": "A"}] },
            "odds": { "/zapas/1": null }
        }))
        .unwrap();
        assert_eq!(data.leagues.len(), 1);
        assert!(data.failing_leagues.is_empty());
    }
}
