//! Integration tests for the ranking pipeline
//!
//! These tests drive full runs through the fixture provider, without any
//! network access.

use serde_json::{json, Value};
use vsv_rust_core::aggregator::expected_stake;
use vsv_rust_core::providers::FixtureProvider;
use vsv_rust_core::{
    AcquisitionError, EngineConfig, LeagueConfig, RankingPipeline, RunOutcome, TeamValueRecord,
};

fn league(code: &str, name: &str) -> LeagueConfig {
    LeagueConfig::new(code, name, &format!("https://example.test/{}/results", code))
}

fn five_leagues() -> Vec<LeagueConfig> {
    vec![
        league("l1", "League 1"),
        league("l2", "League 2"),
        league("l3", "League 3"),
        league("l4", "League 4"),
        league("l5", "League 5"),
    ]
}

fn game(home: &str, away: &str, hs: i64, aws: i64, url: &str) -> Value {
    json!({
        "home_team": home,
        "away_team": away,
        "home_score": hs,
        "away_score": aws,
        "match_url": url
    })
}

fn odds(home: f64, away: f64) -> Value {
    json!({ "home_odds": home, "away_odds": away })
}

fn find<'a>(records: &'a [TeamValueRecord], team: &str, league: &str) -> &'a TeamValueRecord {
    records
        .iter()
        .find(|r| r.team_id == team && r.league_id == league)
        .unwrap_or_else(|| panic!("no record for {} / {}", team, league))
}

async fn run(provider: FixtureProvider, leagues: Vec<LeagueConfig>) -> RunOutcome {
    RankingPipeline::new(provider, leagues, EngineConfig::default())
        .expect("valid pipeline")
        .run()
        .await
}

#[tokio::test]
async fn test_favorite_win_and_outsider_loss() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("X", "Y", 2, 0, "/zapas/a")]))
        .with_odds("/zapas/a", odds(1.5, 3.0));

    let outcome = run(provider, vec![league("l1", "League 1")]).await;
    let records = outcome.records();
    assert_eq!(records.len(), 2);

    let x = find(records, "X", "League 1");
    assert_eq!(x.favorite_count, 1);
    assert_eq!(x.outsider_count, 0);
    assert_eq!(x.total_stake, 100.0);
    assert_eq!(x.total_return, 150.0);
    assert_eq!(x.profit, 50.0);
    assert_eq!(x.value_percent, 50.0);

    let y = find(records, "Y", "League 1");
    assert_eq!(y.outsider_count, 1);
    assert_eq!(y.total_stake, 50.0);
    assert_eq!(y.total_return, 0.0);
    assert_eq!(y.profit, -50.0);
    assert_eq!(y.value_percent, -100.0);

    assert_eq!(records[0].team_id, "X");
}

#[tokio::test]
async fn test_draw_touches_nothing() {
    let provider = FixtureProvider::default()
        .with_matches(
            "l1",
            json!([
                game("X", "Y", 1, 1, "/zapas/draw"),
                game("Z", "W", 1, 0, "/zapas/win")
            ]),
        )
        .with_odds("/zapas/draw", odds(1.8, 2.2))
        .with_odds("/zapas/win", odds(2.5, 1.6));

    let outcome = run(provider, vec![league("l1", "League 1")]).await;
    let records = outcome.records();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.team_id != "X" && r.team_id != "Y"));
}

#[tokio::test]
async fn test_draw_only_league_yields_no_data() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("X", "Y", 0, 0, "/zapas/d")]))
        .with_odds("/zapas/d", odds(1.9, 1.9));

    let pipeline =
        RankingPipeline::new(provider, vec![league("l1", "League 1")], EngineConfig::default())
            .unwrap();
    match pipeline.run().await {
        RunOutcome::NoData { leagues } => {
            assert_eq!(leagues.len(), 1);
            assert_eq!(leagues[0].draws, 1);
        }
        other => panic!("expected NoData, got {:?}", other),
    }
    // draws are skipped before any odds lookup
    assert_eq!(pipeline.provider().odds_requests(), 0);
}

#[tokio::test]
async fn test_missing_odds_skips_match_and_continues() {
    let provider = FixtureProvider::default()
        .with_matches(
            "l1",
            json!([
                game("X", "Y", 3, 1, "/zapas/1"),
                game("A", "B", 0, 2, "/zapas/2")
            ]),
        )
        .with_odds("/zapas/1", Value::Null)
        .with_odds("/zapas/2", odds(1.7, 2.3));

    let outcome = run(provider, vec![league("l1", "League 1")]).await;
    let records = outcome.records();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.team_id == "A" || r.team_id == "B"));
    let b = find(records, "B", "League 1");
    assert_eq!(b.outsider_count, 1);
    assert!((b.total_return - 115.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_acquisition_error_discards_everything() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("X", "Y", 2, 0, "/zapas/a")]))
        .with_odds("/zapas/a", odds(1.5, 3.0))
        .failing_league("l2")
        .with_matches("l3", json!([game("P", "Q", 1, 0, "/zapas/b")]))
        .with_odds("/zapas/b", odds(1.5, 3.0));

    let pipeline = RankingPipeline::new(provider, five_leagues(), EngineConfig::default()).unwrap();
    let outcome = pipeline.run().await;

    match &outcome {
        RunOutcome::Failed(failure) => {
            assert_eq!(failure.league, "League 2");
            assert!(matches!(failure.source, AcquisitionError::Transport { .. }));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(outcome.records().is_empty());

    // later leagues are never requested
    let requests = pipeline.provider().requests();
    assert!(!requests.iter().any(|r| r == "matches:l3"));
}

#[tokio::test]
async fn test_odds_acquisition_error_is_fatal() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("X", "Y", 2, 0, "/zapas/a")]))
        .with_odds("/zapas/a", odds(1.5, 3.0))
        .with_matches("l2", json!([game("P", "Q", 1, 0, "/zapas/b")]))
        .failing_odds("/zapas/b");

    let outcome = run(
        provider,
        vec![league("l1", "League 1"), league("l2", "League 2")],
    )
    .await;
    assert!(matches!(outcome, RunOutcome::Failed(_)));
    assert!(outcome.records().is_empty());
}

#[tokio::test]
async fn test_equal_odds_both_outsiders() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("X", "Y", 0, 1, "/zapas/e")]))
        .with_odds("/zapas/e", odds(2.0, 2.0));

    let outcome = run(provider, vec![league("l1", "League 1")]).await;
    let records = outcome.records();

    for team in ["X", "Y"] {
        let r = find(records, team, "League 1");
        assert_eq!(r.favorite_count, 0);
        assert_eq!(r.outsider_count, 1);
        assert_eq!(r.total_stake, 50.0);
    }
    assert_eq!(find(records, "Y", "League 1").total_return, 100.0);
}

#[tokio::test]
async fn test_malformed_league_does_not_stop_others() {
    let provider = FixtureProvider::default()
        .with_raw_matches("l1", "I could not access that page.")
        .with_matches("l2", json!([]))
        .with_matches("l3", json!({"matches": []}))
        .with_raw_matches(
            "l4",
            "```json\n[{\"home_team\":\"A\",\"away_team\":\"B\",\"home_score\":1,\"away_score\":0,\"match_url\":\"/zapas/z\"}]\n```",
        )
        .with_odds("/zapas/z", odds(1.4, 2.9));

    let outcome = run(provider, five_leagues()).await;
    match &outcome {
        RunOutcome::Succeeded(report) => {
            assert_eq!(report.records.len(), 2);
            assert!(report.records.iter().all(|r| r.league_id == "League 4"));
            let rejected = report.leagues.iter().filter(|l| l.payload_rejected).count();
            // l1 unparseable, l2 empty, l3 not an array, l5 missing
            assert_eq!(rejected, 4);
        }
        other => panic!("expected Succeeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_match_cap_applies() {
    let games: Vec<Value> = (0..60)
        .map(|i| game(&format!("H{}", i), &format!("A{}", i), 1, 0, &format!("/zapas/{}", i)))
        .collect();
    let mut provider = FixtureProvider::default().with_matches("l1", Value::Array(games));
    for i in 0..60 {
        provider = provider.with_odds(&format!("/zapas/{}", i), odds(1.5, 2.5));
    }

    let cfg = EngineConfig {
        match_limit: 50,
        ..Default::default()
    };
    let pipeline = RankingPipeline::new(provider, vec![league("l1", "League 1")], cfg).unwrap();
    let outcome = pipeline.run().await;

    match &outcome {
        RunOutcome::Succeeded(report) => {
            assert_eq!(report.records.len(), 100);
            assert_eq!(report.leagues[0].fetched, 60);
            assert_eq!(report.leagues[0].considered, 50);
        }
        other => panic!("expected Succeeded, got {:?}", other),
    }
    assert_eq!(pipeline.provider().odds_requests(), 50);
    assert!(!pipeline.provider().requests().iter().any(|r| r == "odds:/zapas/50"));
}

#[tokio::test]
async fn test_same_team_name_in_two_leagues_is_two_rows() {
    let provider = FixtureProvider::default()
        .with_matches("l1", json!([game("United", "City", 1, 0, "/zapas/1")]))
        .with_odds("/zapas/1", odds(1.5, 2.5))
        .with_matches("l2", json!([game("United", "Rovers", 0, 2, "/zapas/2")]))
        .with_odds("/zapas/2", odds(1.5, 2.5));

    let outcome = run(
        provider,
        vec![league("l1", "League 1"), league("l2", "League 2")],
    )
    .await;
    let united: Vec<&TeamValueRecord> = outcome
        .records()
        .iter()
        .filter(|r| r.team_id == "United")
        .collect();
    assert_eq!(united.len(), 2);
    assert_eq!(find(outcome.records(), "United", "League 1").profit, 50.0);
    assert_eq!(find(outcome.records(), "United", "League 2").profit, -100.0);
}

#[tokio::test]
async fn test_ranking_properties_over_a_season() {
    let teams = ["A", "B", "C", "D", "E", "F"];
    let mut seed: u64 = 0x5eed;
    let mut next = move |m: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) % m
    };

    let mut games = Vec::new();
    let mut provider = FixtureProvider::default();
    for i in 0..40 {
        let h = next(teams.len() as u64) as usize;
        let a = (h + 1 + next(teams.len() as u64 - 1) as usize) % teams.len();
        let url = format!("/zapas/s{}", i);
        games.push(game(teams[h], teams[a], next(4) as i64, next(4) as i64, &url));
        let ho = 1.2 + next(30) as f64 / 10.0;
        let ao = 1.2 + next(30) as f64 / 10.0;
        provider = provider.with_odds(&url, odds(ho, ao));
    }
    provider = provider.with_matches("l1", Value::Array(games));

    let cfg = EngineConfig::default();
    let outcome = run(provider, vec![league("l1", "League 1")]).await;
    let records = outcome.records();
    assert!(!records.is_empty());

    for r in records {
        let acc = vsv_rust_core::TeamAccumulator {
            team_id: r.team_id.clone(),
            league_id: r.league_id.clone(),
            favorite_count: r.favorite_count,
            outsider_count: r.outsider_count,
            total_stake: r.total_stake,
            total_return: r.total_return,
        };
        assert_eq!(r.total_stake, expected_stake(&acc, &cfg));
        assert_eq!(r.profit, r.total_return - r.total_stake);
        assert!(r.total_stake > 0.0);
    }

    for pair in records.windows(2) {
        assert!(pair[0].value_percent >= pair[1].value_percent);
    }
}
