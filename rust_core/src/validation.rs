//! Schema-validating decode of acquisition payloads.
//!
//! Every entry point returns a tagged `Result<_, Rejection>`; nothing here
//! panics or aborts a run. The caller decides what a rejection skips (one
//! match, or one league for the match list).

use crate::error::Rejection;
use crate::models::{MatchRecord, OddsQuote, RawPayload};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json|JSON)?").expect("static fence pattern"))
}

/// Remove markdown code fences the extraction service likes to wrap JSON in.
pub fn strip_code_fences(text: &str) -> String {
    code_fence().replace_all(text, "").trim().to_string()
}

/// Short name of a JSON value's type, for rejection messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse raw collaborator text into JSON.
pub fn parse_payload(payload: &RawPayload) -> Result<Value, Rejection> {
    if payload.is_blank() {
        return Err(Rejection::EmptyPayload);
    }
    let cleaned = strip_code_fences(&payload.text);
    if cleaned.is_empty() {
        return Err(Rejection::EmptyPayload);
    }
    serde_json::from_str(&cleaned).map_err(|e| Rejection::Unparseable(e.to_string()))
}

/// Decode a league's match list. An empty or non-array payload rejects the
/// whole league; individual entries are validated later one by one.
pub fn decode_match_list(payload: &RawPayload) -> Result<Vec<Value>, Rejection> {
    match parse_payload(payload)? {
        Value::Array(items) if items.is_empty() => Err(Rejection::EmptyPayload),
        Value::Array(items) => Ok(items),
        other => Err(Rejection::NotAnArray(json_kind(&other))),
    }
}

/// Validate one raw match entry.
pub fn validate_match(raw: &Value) -> Result<MatchRecord, Rejection> {
    let obj = as_object(raw)?;

    let home_team = team_name(obj, "home_team")?;
    let away_team = team_name(obj, "away_team")?;
    if home_team == away_team {
        return Err(Rejection::SameTeam(home_team));
    }

    let home_score = score(obj, "home_score")?;
    let away_score = score(obj, "away_score")?;

    let match_ref = match present(obj, "match_url")? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::String(_) => return Err(Rejection::invalid("match_url", "blank")),
        other => {
            return Err(Rejection::invalid(
                "match_url",
                format!("expected string, got {}", json_kind(other)),
            ))
        }
    };

    Ok(MatchRecord {
        home_team,
        away_team,
        home_score,
        away_score,
        match_ref,
    })
}

/// Validate one odds payload. `null` means the collaborator found no quote.
pub fn validate_odds(payload: &RawPayload) -> Result<OddsQuote, Rejection> {
    let value = match parse_payload(payload) {
        Ok(Value::Null) | Err(Rejection::EmptyPayload) => return Err(Rejection::MissingQuote),
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    let obj = as_object(&value)?;

    Ok(OddsQuote {
        home_odds: decimal_odds(obj, "home_odds")?,
        away_odds: decimal_odds(obj, "away_odds")?,
    })
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, Rejection> {
    value
        .as_object()
        .ok_or_else(|| Rejection::NotAnObject(json_kind(value)))
}

/// Field lookup treating JSON `null` as absent
fn present<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, Rejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(Rejection::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn team_name(obj: &Map<String, Value>, field: &'static str) -> Result<String, Rejection> {
    match present(obj, field)? {
        Value::String(s) => {
            let name = s.trim();
            if name.is_empty() {
                Err(Rejection::invalid(field, "blank team name"))
            } else {
                Ok(name.to_string())
            }
        }
        other => Err(Rejection::invalid(
            field,
            format!("expected string, got {}", json_kind(other)),
        )),
    }
}

fn score(obj: &Map<String, Value>, field: &'static str) -> Result<u32, Rejection> {
    let parsed = match present(obj, field)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        other => {
            return Err(Rejection::invalid(
                field,
                format!("expected integer, got {}", json_kind(other)),
            ))
        }
    };
    parsed.ok_or_else(|| Rejection::invalid(field, "not a non-negative integer"))
}

fn decimal_odds(obj: &Map<String, Value>, field: &'static str) -> Result<f64, Rejection> {
    let parsed = match present(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        other => {
            return Err(Rejection::invalid(
                field,
                format!("expected number, got {}", json_kind(other)),
            ))
        }
    };

    match parsed {
        Some(odds) if odds.is_finite() && odds > 1.0 => Ok(odds),
        Some(odds) => Err(Rejection::invalid(
            field,
            format!("decimal odds must exceed 1, got {}", odds),
        )),
        None => Err(Rejection::invalid(field, "not a number")),
    }
}
