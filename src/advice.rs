use crate::config::AdvisorConfig;
use crate::head_to_head::Advantage;
use crate::model::{ConfidenceTier, Outcome, Prob3, TeamFormSnapshot};
use crate::odds::expected_value;
use crate::win_prob::PredictionInput;

pub fn pick_label(outcome: Outcome, home_name: &str, away_name: &str) -> String {
    match outcome {
        Outcome::Home => format!("{home_name} win"),
        Outcome::Draw => "Draw".to_string(),
        Outcome::Away => format!("{away_name} win"),
    }
}

/// Human-readable justification, in the order the signals are applied.
pub fn build_reasons(cfg: &AdvisorConfig, input: &PredictionInput<'_>, draw_bonus: f64) -> Vec<String> {
    let p = &cfg.predictor;
    let sides = [(input.home_name, input.home), (input.away_name, input.away)];
    let mut reasons = Vec::new();

    let gap = input.home.score - input.away.score;
    if gap.abs() >= p.form_gap_reason {
        let (better, worse) = if gap > 0.0 { (sides[0], sides[1]) } else { (sides[1], sides[0]) };
        reasons.push(format!(
            "{} in clearly better form ({:.0} vs {:.0}, {} vs {})",
            better.0, better.1.score, worse.1.score, better.1.form, worse.1.form
        ));
    }

    for (name, snap) in sides {
        if snap.streak.is_losing(p.losing_streak_threshold) {
            reasons.push(format!(
                "{name} has lost {} in a row, a rebound is due",
                snap.streak.count
            ));
        }
        if snap.streak.is_winning(p.winning_streak_threshold) {
            reasons.push(format!(
                "{name} has won {} straight, some regression expected",
                snap.streak.count
            ));
        }
    }

    let h2h = input.h2h;
    if h2h.matches >= p.h2h_min_matches {
        match h2h.advantage {
            Advantage::Home => reasons.push(format!(
                "{} leads the head-to-head ({}W {}D {}L in {} meetings)",
                input.home_name, h2h.home_wins, h2h.draws, h2h.away_wins, h2h.matches
            )),
            Advantage::Away => reasons.push(format!(
                "{} leads the head-to-head ({}W {}D {}L in {} meetings)",
                input.away_name, h2h.away_wins, h2h.draws, h2h.home_wins, h2h.matches
            )),
            Advantage::Even => {
                reasons.push(format!("Head-to-head is level over {} meetings", h2h.matches))
            }
            Advantage::None => {}
        }
    }

    reasons.push(format!(
        "Home advantage for {} (+{:.0} pts)",
        input.home_name,
        p.home_advantage * 100.0
    ));

    for (name, snap) in sides {
        if snap.no_draw_streak > cfg.draw_regression.streak_threshold {
            reasons.push(format!(
                "{name} without a draw in {} matches, a draw is overdue",
                snap.no_draw_streak
            ));
        }
    }
    if draw_bonus > 0.0 {
        reasons.push(format!("Draw probability raised by {:.1} pts", draw_bonus * 100.0));
    }

    if is_sparse(cfg, input.home) || is_sparse(cfg, input.away) {
        reasons.push("Limited recent data, confidence reduced".to_string());
    }
    if input.odds.is_some() {
        reasons.push(format!(
            "Blended with bookmaker prices ({:.0}% weight)",
            p.market_weight * 100.0
        ));
    }
    reasons
}

fn is_sparse(cfg: &AdvisorConfig, snap: &TeamFormSnapshot) -> bool {
    snap.matches_played < cfg.predictor.min_matches_for_full_confidence
}

/// Action for the confidence tier, then price callouts when odds exist.
pub fn build_advice(
    cfg: &AdvisorConfig,
    input: &PredictionInput<'_>,
    probs: Prob3,
    outcome: Outcome,
    tier: ConfidenceTier,
) -> String {
    let pick = pick_label(outcome, input.home_name, input.away_name);
    let mut parts = vec![match tier {
        ConfidenceTier::High => format!("Bet: {pick}, stake 3-5% of bankroll"),
        ConfidenceTier::Medium => format!("Cautious: small stake (1-2% of bankroll) on {pick}"),
        ConfidenceTier::Low => "Avoid: no clear edge in this fixture".to_string(),
    }];

    if let Some(odds) = input.odds {
        let a = &cfg.advice;
        let price = odds.price(outcome);
        let ev = expected_value(probs.get(outcome), price);
        if ev >= a.strong_value_ev {
            parts.push(format!("Strong value at {price:.2} (EV {ev:+.2})"));
        } else if ev >= a.value_ev {
            parts.push(format!("Value at {price:.2} (EV {ev:+.2})"));
        } else if ev <= a.overpriced_ev {
            parts.push(format!("Overpriced at {price:.2} (EV {ev:+.2}), skip this price"));
        }
        if probs.draw > a.draw_check_probability {
            parts.push(format!(
                "Draw at {:.1}%: check the draw odds ({:.2})",
                probs.draw * 100.0,
                odds.price(Outcome::Draw)
            ));
        }
    }
    parts.join(". ")
}
