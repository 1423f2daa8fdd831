use chrono::{TimeZone, Utc};

use matchday_advisor::analysis::{FixtureRequest, MatchAnalyzer};
use matchday_advisor::config::{AdvisorConfig, TendencyConfig, ValueConfig};
use matchday_advisor::model::{MatchRecord, Outcome, Prob3};
use matchday_advisor::odds::OddsTriple;
use matchday_advisor::over_under::{GoalsPick, OverUnderPredictor};
use matchday_advisor::tendency::{Tendency, analyze_tendency};
use matchday_advisor::value_bet::{ValueQuality, find_value_bets};

fn derby() -> FixtureRequest {
    FixtureRequest {
        home_id: 1,
        away_id: 2,
        home_name: "City".to_string(),
        away_name: "Town".to_string(),
        kickoff: None,
        home_matches: vec![
            MatchRecord::new(1, 3, 3, 1),
            MatchRecord::new(4, 1, 0, 2),
            MatchRecord::new(1, 5, 2, 2),
            MatchRecord::new(1, 6, 4, 0),
        ],
        away_matches: vec![
            MatchRecord::new(2, 3, 0, 1),
            MatchRecord::new(5, 2, 2, 0),
            MatchRecord::new(2, 6, 1, 1),
        ],
        head_to_head: vec![MatchRecord::new(1, 2, 1, 0), MatchRecord::new(2, 1, 1, 1)],
        odds: Some(OddsTriple::new(1.9, 3.6, 4.5).unwrap()),
    }
}

#[test]
fn each_analysis_adds_exactly_one_record() {
    let mut analyzer = MatchAnalyzer::default();
    assert_eq!(analyzer.history_len(), 0);
    let first = analyzer.analyze(&derby()).clone();
    assert_eq!(analyzer.history_len(), 1);
    let second = analyzer.analyze(&derby()).clone();
    assert_eq!(analyzer.history_len(), 2);

    assert_eq!(second.id, first.id + 1);
    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.goals, second.goals);
    assert_eq!(first.value_bets, second.value_bets);
    assert_eq!(first.tips, second.tips);
    assert_eq!(analyzer.latest().map(|r| r.id), Some(second.id));
}

#[test]
fn evaluate_is_pure() {
    let analyzer = MatchAnalyzer::default();
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 15, 0, 0).unwrap();
    let a = analyzer.evaluate(&derby(), 9, at);
    let b = analyzer.evaluate(&derby(), 9, at);
    assert_eq!(a, b);
    assert_eq!(analyzer.history_len(), 0);
}

#[test]
fn record_carries_every_section() {
    let mut analyzer = MatchAnalyzer::default();
    let record = analyzer.analyze(&derby()).clone();
    assert_eq!(record.home_form.matches_played, 4);
    assert_eq!(record.away_form.matches_played, 3);
    assert_eq!(record.head_to_head.matches, 2);
    assert_eq!(record.h2h_tendency.clean_sheet_pct, None);
    assert_eq!(record.home_tendency.matches, 4);
    assert!(record.home_tendency.clean_sheet_pct.is_some());
    assert!(record.odds.is_some());
    assert!(record.prediction.expected_value.is_some());

    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"home_name\":\"City\""));
}

#[test]
fn fixture_without_histories_uses_neutral_form() {
    let req: FixtureRequest =
        serde_json::from_str(r#"{"home_id":1,"away_id":2,"home_name":"A","away_name":"B"}"#).unwrap();
    let mut analyzer = MatchAnalyzer::default();
    let record = analyzer.analyze(&req);
    assert_eq!(record.home_form.score, 50.0);
    assert_eq!(record.away_form.score, 50.0);
    assert_eq!(record.prediction.outcome, Outcome::Home);
    assert!(record.value_bets.is_empty());
    assert_eq!(record.home_tendency.tendency, Tendency::Unknown);
}

#[test]
fn from_history_takes_the_latest_window() {
    let history: Vec<MatchRecord> = (0..12)
        .map(|i| {
            if i % 2 == 0 {
                MatchRecord::new(1, 2, i as u8 % 4, 1)
            } else {
                MatchRecord::new(3, 1, 0, 0)
            }
        })
        .collect();
    let req = FixtureRequest::from_history(&history, 1, 2, "One", "Two", 4);
    assert_eq!(req.home_matches.len(), 4);
    assert_eq!(req.home_matches, history[8..].to_vec());
    assert_eq!(req.away_matches.len(), 4);
    assert!(req.head_to_head.iter().all(|m| m.is_between(1, 2)));
    assert_eq!(req.head_to_head.last(), history.get(10));
}

#[test]
fn value_bet_ev_matches_definition() {
    let odds = OddsTriple::new(2.2, 3.3, 3.5).unwrap();
    let bets = find_value_bets(&ValueConfig::default(), Prob3::new(0.55, 0.25, 0.20), &odds);
    assert_eq!(bets.len(), 1);
    assert_eq!(bets[0].outcome, Outcome::Home);
    assert!((bets[0].expected_value - 0.21).abs() < 1e-9);
    assert_eq!(bets[0].quality, ValueQuality::Excellent);
}

#[test]
fn empty_tendency_is_unknown() {
    let report = analyze_tendency(&TendencyConfig::default(), &[], Some(1));
    assert_eq!(report.tendency, Tendency::Unknown);
    assert_eq!(report.matches, 0);
    assert_eq!(report.over_pct, None);
    assert_eq!(report.btts_pct, None);
    assert_eq!(report.clean_sheet_pct, None);
}

#[test]
fn high_scoring_teams_go_over() {
    let analyzer = MatchAnalyzer::default();
    let mut req = derby();
    req.home_matches = vec![MatchRecord::new(1, 3, 2, 1), MatchRecord::new(4, 1, 1, 2)];
    req.away_matches = vec![MatchRecord::new(2, 3, 1, 2), MatchRecord::new(5, 2, 2, 1)];
    let record = analyzer.evaluate(&req, 1, Utc::now());
    assert_eq!(record.goals.pick, GoalsPick::Over);
    assert!(record.goals.over_probability > 0.5);

    let ou = OverUnderPredictor::default();
    let home = record.home_form.clone();
    let away = record.away_form.clone();
    assert_eq!(ou.predict_snapshots(&home, &away), record.goals);
}

#[test]
fn config_round_trips_through_json() {
    let cfg = AdvisorConfig::from_json_str(r#"{"history_limit": 3, "value": {"min_edge": 0.08}}"#)
        .unwrap();
    assert_eq!(cfg.history_limit, 3);
    assert_eq!(cfg.value.min_edge, 0.08);
    assert_eq!(cfg.value.good, ValueConfig::default().good);

    assert!(AdvisorConfig::from_json_str(r#"{"history_limit": 0}"#).is_err());
    assert!(AdvisorConfig::from_json_str("not json").is_err());
}
