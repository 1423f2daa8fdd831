use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;
use crate::model::Outcome;
use crate::over_under::{GoalsPick, OverUnderPrediction};
use crate::value_bet::ValueBetFinding;
use crate::win_prob::{OutcomePrediction, PredictionInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    DrawStreak,
    Rebound,
    OverUnder,
    ValueOnDraw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub kind: TipKind,
    pub message: String,
    pub confidence: u8,
}

/// Supplementary tips, one per signal that fired, in a fixed kind order.
pub fn generate_tips(
    cfg: &AdvisorConfig,
    input: &PredictionInput<'_>,
    prediction: &OutcomePrediction,
    goals: &OverUnderPrediction,
    value_bets: &[ValueBetFinding],
) -> Vec<Tip> {
    let mut tips = Vec::new();
    let sides = [(input.home_name, input.home), (input.away_name, input.away)];

    let overdue: Vec<String> = sides
        .iter()
        .filter(|(_, s)| s.no_draw_streak > cfg.draw_regression.streak_threshold)
        .map(|(name, s)| format!("{name} ({})", s.no_draw_streak))
        .collect();
    if !overdue.is_empty() {
        tips.push(Tip {
            kind: TipKind::DrawStreak,
            message: format!(
                "No draw in a long while for {}; draw chance {:.1}%",
                overdue.join(" and "),
                prediction.p_draw
            ),
            confidence: to_pct(prediction.draw_bonus / cfg.draw_regression.cap.max(f64::EPSILON)),
        });
    }

    for (name, snap) in sides {
        if snap.streak.is_losing(cfg.tips.rebound_streak) {
            tips.push(Tip {
                kind: TipKind::Rebound,
                message: format!(
                    "{name} has lost {} straight; avoid backing the opponent at short prices",
                    snap.streak.count
                ),
                confidence: (30 + 5 * snap.streak.count.min(8)) as u8,
            });
        }
    }

    if goals.confidence >= cfg.tips.over_under_min_confidence {
        let side = match goals.pick {
            GoalsPick::Over => "Over",
            GoalsPick::Under => "Under",
        };
        tips.push(Tip {
            kind: TipKind::OverUnder,
            message: format!(
                "{side} {:.1} goals (expected {:.2})",
                goals.line, goals.expected_goals
            ),
            confidence: goals.confidence.round().clamp(0.0, 100.0) as u8,
        });
    }

    if let Some(draw) = value_bets.iter().find(|v| v.outcome == Outcome::Draw) {
        tips.push(Tip {
            kind: TipKind::ValueOnDraw,
            message: format!(
                "Draw priced at {:.2} against a model {:.1}% (EV {:+.2}, {})",
                draw.price,
                draw.probability * 100.0,
                draw.expected_value,
                draw.quality.label()
            ),
            confidence: to_pct(draw.expected_value.min(1.0)),
        });
    }
    tips
}

fn to_pct(v: f64) -> u8 {
    (v * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormCalculator;
    use crate::head_to_head::HeadToHeadSummary;
    use crate::model::MatchRecord;
    use crate::odds::OddsTriple;
    use crate::over_under::OverUnderPredictor;
    use crate::value_bet::find_value_bets;
    use crate::win_prob::MatchPredictor;

    #[test]
    fn quiet_fixture_gives_no_tips() {
        let cfg = AdvisorConfig::default();
        let calc = FormCalculator::default();
        let history = vec![MatchRecord::new(1, 9, 1, 1), MatchRecord::new(9, 1, 2, 1)];
        let home = calc.compute(1, &history);
        let away = calc.compute(9, &history);
        let h2h = HeadToHeadSummary::empty();
        let input = PredictionInput {
            home_name: "A",
            away_name: "B",
            home: &home,
            away: &away,
            h2h: &h2h,
            odds: None,
        };
        let pred = MatchPredictor::default().predict(&input);
        let goals = OverUnderPredictor::default().predict_snapshots(&home, &away);
        assert!(generate_tips(&cfg, &input, &pred, &goals, &[]).is_empty());
    }

    #[test]
    fn draw_streak_rebound_goals_and_draw_value() {
        let cfg = AdvisorConfig::default();
        let calc = FormCalculator::default();
        // Home: eight straight wins, all 3-1.
        let home_hist: Vec<MatchRecord> = (0..8).map(|i| MatchRecord::new(1, 20 + i, 3, 1)).collect();
        // Away: four straight 2-3 defeats.
        let away_hist: Vec<MatchRecord> = (0..4).map(|i| MatchRecord::new(2, 40 + i, 2, 3)).collect();
        let home = calc.compute(1, &home_hist);
        let away = calc.compute(2, &away_hist);
        let h2h = HeadToHeadSummary::empty();
        let odds = OddsTriple::new(1.30, 9.0, 11.0).unwrap();
        let input = PredictionInput {
            home_name: "A",
            away_name: "B",
            home: &home,
            away: &away,
            h2h: &h2h,
            odds: Some(&odds),
        };
        let pred = MatchPredictor::default().predict(&input);
        let goals = OverUnderPredictor::default().predict_snapshots(&home, &away);
        let bets = find_value_bets(&cfg.value, pred.probabilities, &odds);
        let tips = generate_tips(&cfg, &input, &pred, &goals, &bets);
        let kinds: Vec<TipKind> = tips.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TipKind::DrawStreak, TipKind::Rebound, TipKind::OverUnder, TipKind::ValueOnDraw]
        );
        assert!(tips[0].message.contains("A (8)"));
        assert!(tips[2].message.starts_with("Over 2.5"));
    }
}
