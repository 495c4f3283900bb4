//! Error taxonomy for the ranking engine.
//!
//! - [`Rejection`]: a malformed match/odds record or league payload. Recovered
//!   locally by skipping one match or one league.
//! - [`AcquisitionError`]: the data collaborator itself failed. Fatal to a run.
//! - [`RunFailure`]: the single run-level failure reported to the caller.
//! - [`ConfigError`]: invalid engine parameters.

use thiserror::Error;

/// Why one record (or one league payload) was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload is not valid JSON: {0}")]
    Unparseable(String),

    #[error("expected a JSON array of matches, got {0}")]
    NotAnArray(&'static str),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("home and away team are both `{0}`")]
    SameTeam(String),

    #[error("no odds quote available")]
    MissingQuote,
}

impl Rejection {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Rejection::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure of the acquisition collaborator: the service could not be
/// reached, or answered with something that is not a reply at all.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("{provider} transport failure: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} sent an undecodable response: {message}")]
    InvalidResponse { provider: String, message: String },
}

impl AcquisitionError {
    pub fn transport(provider: &str, message: impl Into<String>) -> Self {
        AcquisitionError::Transport {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// The one error a failed run surfaces. All accumulated data is discarded.
#[derive(Debug, Error)]
#[error("acquisition failed while processing league `{league}`: {source}")]
pub struct RunFailure {
    pub league: String,
    #[source]
    pub source: AcquisitionError,
}

/// Invalid [`crate::config::EngineConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("match limit must be at least 1")]
    ZeroMatchLimit,

    #[error("{name} stake must be a positive finite number, got {value}")]
    InvalidStake { name: &'static str, value: f64 },

    #[error("unknown league code `{0}`")]
    UnknownLeague(String),

    #[error("league list is empty")]
    NoLeagues,
}
