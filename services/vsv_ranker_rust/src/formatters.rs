//! Rendering of run outcomes for the terminal.

use anyhow::Result;
use vsv_rust_core::{LeagueStats, RankingReport, RunFailure, TeamValueRecord};

/// Coarse value bucket of a VSV figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTier {
    Strong,
    Positive,
    SlightLoss,
    Loss,
}

impl ValueTier {
    pub fn from_vsv(vsv: f64) -> Self {
        if vsv > 20.0 {
            ValueTier::Strong
        } else if vsv > 0.0 {
            ValueTier::Positive
        } else if vsv > -20.0 {
            ValueTier::SlightLoss
        } else {
            ValueTier::Loss
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueTier::Strong => "strong",
            ValueTier::Positive => "positive",
            ValueTier::SlightLoss => "slight loss",
            ValueTier::Loss => "loss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_vsv(vsv: f64) -> Self {
        if vsv > 5.0 {
            Trend::Up
        } else if vsv < -5.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "─",
        }
    }
}

/// `+12.5` / `-3.0`; zero is shown with a plus sign
pub fn format_signed(value: f64, decimals: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.*}", sign, decimals, value)
}

fn width_of<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn format_row(rank: usize, r: &TeamValueRecord, team_w: usize, league_w: usize) -> String {
    format!(
        "{:>3}  {}  {}  {:>7}  {:>8}  {:>7}  {:>7}  {:>8} {} {}",
        rank,
        pad(&r.team_id, team_w),
        pad(&r.league_id, league_w),
        r.favorite_count,
        r.outsider_count,
        format!("{:.0}", r.total_stake),
        format_signed(r.profit, 0),
        format!("{}%", format_signed(r.value_percent, 1)),
        Trend::from_vsv(r.value_percent).symbol(),
        ValueTier::from_vsv(r.value_percent).label(),
    )
}

/// Ranked table with a footer.
pub fn render_table(report: &RankingReport) -> String {
    let team_w = width_of("Team", report.records.iter().map(|r| r.team_id.as_str()));
    let league_w = width_of("League", report.records.iter().map(|r| r.league_id.as_str()));

    let header = format!(
        "{:>3}  {}  {}  {:>7}  {:>8}  {:>7}  {:>7}  {:>8}",
        "#",
        pad("Team", team_w),
        pad("League", league_w),
        "Favorite",
        "Outsider",
        "Stakes",
        "Profit",
        "VSV"
    );

    let mut lines = Vec::with_capacity(report.records.len() + 6);
    lines.push("VSV Index - Draw No Bet value by team".to_string());
    lines.push(header.clone());
    lines.push("-".repeat(header.chars().count() + 14));
    for (i, record) in report.records.iter().enumerate() {
        lines.push(format_row(i + 1, record, team_w, league_w));
    }
    lines.push(String::new());
    lines.push(format!(
        "Analyzed {} teams from {} leagues ({} settled matches)",
        report.team_count(),
        report.leagues.len(),
        report.settled_matches()
    ));
    lines.push(format!(
        "Bet type: Draw No Bet | generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.join("\n")
}

pub fn render_json(report: &RankingReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_no_data(leagues: &[LeagueStats]) -> String {
    let rejected = leagues.iter().filter(|l| l.payload_rejected).count();
    format!(
        "No data could be loaded ({} of {} leagues returned no usable matches). Please try again.",
        rejected,
        leagues.len()
    )
}

pub fn render_failure(failure: &RunFailure) -> String {
    format!("Error: {}", failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vsv_rust_core::AcquisitionError;

    fn record(team: &str, stake: f64, ret: f64) -> TeamValueRecord {
        let profit = ret - stake;
        TeamValueRecord {
            team_id: team.to_string(),
            league_id: "Premier League".to_string(),
            favorite_count: 1,
            outsider_count: 1,
            total_stake: stake,
            total_return: ret,
            profit,
            value_percent: profit / stake * 100.0,
        }
    }

    fn report() -> RankingReport {
        RankingReport {
            run_id: "run-1".to_string(),
            records: vec![record("Arsenal", 150.0, 240.0), record("Brighton & Hove", 150.0, 0.0)],
            leagues: vec![LeagueStats {
                league: "Premier League".to_string(),
                settled: 2,
                teams: 2,
                ..Default::default()
            }],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tiers_and_trends() {
        assert_eq!(ValueTier::from_vsv(25.0), ValueTier::Strong);
        assert_eq!(ValueTier::from_vsv(20.0), ValueTier::Positive);
        assert_eq!(ValueTier::from_vsv(0.0), ValueTier::SlightLoss);
        assert_eq!(ValueTier::from_vsv(-20.0), ValueTier::Loss);

        assert_eq!(Trend::from_vsv(5.1), Trend::Up);
        assert_eq!(Trend::from_vsv(5.0), Trend::Flat);
        assert_eq!(Trend::from_vsv(-5.0), Trend::Flat);
        assert_eq!(Trend::from_vsv(-7.0), Trend::Down);
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(50.0, 0), "+50");
        assert_eq!(format_signed(-100.0, 1), "-100.0");
        assert_eq!(format_signed(0.0, 1), "+0.0");
    }

    #[test]
    fn test_render_table() {
        let out = render_table(&report());
        assert!(out.contains("Brighton & Hove"));
        assert!(out.contains("+60.0%"));
        assert!(out.contains("-100.0%"));
        assert!(out.contains("Analyzed 2 teams from 1 leagues"));

        let lines: Vec<&str> = out.lines().collect();
        let arsenal = lines.iter().position(|l| l.contains("Arsenal")).unwrap();
        let brighton = lines.iter().position(|l| l.contains("Brighton")).unwrap();
        assert!(arsenal < brighton);
        assert!(lines[arsenal].trim_start().starts_with('1'));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&report()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["records"][0]["team_id"], "Arsenal");
        assert_eq!(v["records"][0]["value_percent"], 60.0);
    }

    #[test]
    fn test_render_failure_and_no_data() {
        let failure = RunFailure {
            league: "Ligue 1".to_string(),
            source: AcquisitionError::transport("anthropic", "connection reset"),
        };
        assert!(render_failure(&failure).starts_with("Error: "));
        assert!(render_no_data(&[]).contains("0 of 0 leagues"));
    }
}
