//! Environment configuration for the ranker
//!
//! This module manages all runtime configuration:
//! - Research service credentials and request limits
//! - Engine parameters (match cap, stake tiers)
//! - League selection
//! - Offline fixture mode and output format

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use vsv_rust_core::clients::anthropic::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use vsv_rust_core::clients::AnthropicConfig;
use vsv_rust_core::config::{
    DEFAULT_FAVORITE_STAKE, DEFAULT_MATCH_LIMIT, DEFAULT_OUTSIDER_STAKE,
};
use vsv_rust_core::league_config::{default_leagues, select_leagues};
use vsv_rust_core::providers::research::DEFAULT_ODDS_PAGE_BASE_URL;
use vsv_rust_core::providers::ResearchProviderConfig;
use vsv_rust_core::{EngineConfig, LeagueConfig};

/// Default research request timeout in seconds (web search replies are slow)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub request_timeout: Duration,

    pub research: ResearchProviderConfig,
    pub engine: EngineConfig,
    pub leagues: Vec<LeagueConfig>,

    pub fixture_path: Option<PathBuf>,
    pub output_format: OutputFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let fixture_path = var("VSV_FIXTURE_PATH").map(PathBuf::from);
        let api_key = var("ANTHROPIC_API_KEY");
        if api_key.is_none() && fixture_path.is_none() {
            return Err(anyhow!(
                "ANTHROPIC_API_KEY must be set (or VSV_FIXTURE_PATH for an offline run)"
            ));
        }

        let anthropic_base_url =
            var("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let anthropic_model = var("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let request_timeout = Duration::from_secs(parse_num(
            var("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let research_defaults = ResearchProviderConfig::default();
        let research = ResearchProviderConfig {
            odds_page_base_url: var("ODDS_PAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ODDS_PAGE_BASE_URL.to_string()),
            rounds: parse_num(var("RESULT_ROUNDS"), "RESULT_ROUNDS", research_defaults.rounds)?,
            matches_max_tokens: parse_num(
                var("MATCHES_MAX_TOKENS"),
                "MATCHES_MAX_TOKENS",
                research_defaults.matches_max_tokens,
            )?,
            odds_max_tokens: parse_num(
                var("ODDS_MAX_TOKENS"),
                "ODDS_MAX_TOKENS",
                research_defaults.odds_max_tokens,
            )?,
        };

        let engine = EngineConfig {
            match_limit: parse_num(var("MATCH_LIMIT"), "MATCH_LIMIT", DEFAULT_MATCH_LIMIT)?,
            favorite_stake: parse_num(var("FAVORITE_STAKE"), "FAVORITE_STAKE", DEFAULT_FAVORITE_STAKE)?,
            outsider_stake: parse_num(var("OUTSIDER_STAKE"), "OUTSIDER_STAKE", DEFAULT_OUTSIDER_STAKE)?,
        };
        engine.validate().context("Invalid engine configuration")?;

        let leagues = match var("VSV_LEAGUES") {
            Some(raw) => {
                let codes = parse_csv(&raw);
                select_leagues(&codes).context("Invalid VSV_LEAGUES")?
            }
            None => default_leagues(),
        };

        let output_format = parse_output_format(var("OUTPUT_FORMAT"))?;

        Ok(Self {
            api_key,
            anthropic_base_url,
            anthropic_model,
            request_timeout,
            research,
            engine,
            leagues,
            fixture_path,
            output_format,
        })
    }

    /// Client config; `None` when no API key was provided
    pub fn anthropic(&self) -> Option<AnthropicConfig> {
        self.api_key.as_ref().map(|key| AnthropicConfig {
            api_key: key.clone(),
            base_url: self.anthropic_base_url.clone(),
            model: self.anthropic_model.clone(),
            request_timeout: self.request_timeout,
        })
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_num<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match raw {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow!("Invalid {key}: {raw} (expected a number)")),
        None => Ok(default),
    }
}

fn parse_output_format(raw: Option<String>) -> Result<OutputFormat> {
    match raw.as_deref().map(|s| s.to_lowercase()) {
        None => Ok(OutputFormat::Table),
        Some(s) if s == "table" => Ok(OutputFormat::Table),
        Some(s) if s == "json" => Ok(OutputFormat::Json),
        Some(other) => Err(anyhow!("Invalid OUTPUT_FORMAT: {other} (expected table|json)")),
    }
}
