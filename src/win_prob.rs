use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advice::{build_advice, build_reasons};
use crate::config::{AdvisorConfig, MAX_CONFIDENCE};
use crate::draw_regression::draw_regression_bonus;
use crate::head_to_head::{Advantage, HeadToHeadSummary};
use crate::model::{ConfidenceTier, Outcome, Prob3, TeamFormSnapshot};
use crate::odds::OddsTriple;

/// Everything the predictor looks at for one fixture.
#[derive(Debug, Clone, Copy)]
pub struct PredictionInput<'a> {
    pub home_name: &'a str,
    pub away_name: &'a str,
    pub home: &'a TeamFormSnapshot,
    pub away: &'a TeamFormSnapshot,
    pub h2h: &'a HeadToHeadSummary,
    pub odds: Option<&'a OddsTriple>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    // Percentages rounded to one decimal; they sum to 100.
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    /// Unrounded final probabilities.
    pub probabilities: Prob3,
    pub outcome: Outcome,
    pub confidence: u8,
    pub tier: ConfidenceTier,
    pub reasons: Vec<String>,
    pub advice: String,
    /// EV of the predicted outcome at the offered price, when odds exist.
    pub expected_value: Option<f64>,
    pub draw_bonus: f64,
}

type StepFn = fn(Prob3, &AdvisorConfig, &PredictionInput<'_>) -> Prob3;

/// One named adjustment of the running home/draw/away triple.
#[derive(Clone, Copy)]
pub struct PipelineStep {
    pub name: &'static str,
    pub apply: StepFn,
}

impl std::fmt::Debug for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub const FORM_SPLIT: PipelineStep = PipelineStep {
    name: "form",
    apply: form_split,
};
pub const HOME_ADVANTAGE: PipelineStep = PipelineStep {
    name: "home_advantage",
    apply: home_advantage,
};
pub const HEAD_TO_HEAD: PipelineStep = PipelineStep {
    name: "head_to_head",
    apply: head_to_head,
};
pub const STREAK_REVERSION: PipelineStep = PipelineStep {
    name: "streak_reversion",
    apply: streak_reversion,
};
pub const DRAW_REGRESSION: PipelineStep = PipelineStep {
    name: "draw_regression",
    apply: draw_regression,
};
pub const MARKET_BLEND: PipelineStep = PipelineStep {
    name: "market_blend",
    apply: market_blend,
};
pub const NORMALIZE: PipelineStep = PipelineStep {
    name: "normalize",
    apply: normalize,
};

pub fn default_pipeline() -> Vec<PipelineStep> {
    vec![
        FORM_SPLIT,
        HOME_ADVANTAGE,
        HEAD_TO_HEAD,
        STREAK_REVERSION,
        DRAW_REGRESSION,
        MARKET_BLEND,
        NORMALIZE,
    ]
}

/// Split proportional to form scores, with a flat draw reserve.
pub fn form_split(_p: Prob3, cfg: &AdvisorConfig, input: &PredictionInput<'_>) -> Prob3 {
    let reserve = cfg.predictor.draw_reserve;
    let pool = 1.0 - reserve;
    let hf = input.home.score.max(0.0);
    let af = input.away.score.max(0.0);
    let total = hf + af;
    if total <= f64::EPSILON {
        return Prob3::new(pool / 2.0, reserve, pool / 2.0);
    }
    Prob3::new(pool * hf / total, reserve, pool * af / total)
}

pub fn home_advantage(p: Prob3, cfg: &AdvisorConfig, _input: &PredictionInput<'_>) -> Prob3 {
    let c = &cfg.predictor;
    Prob3::new(
        p.home + c.home_advantage,
        p.draw - c.home_advantage_from_draw,
        p.away - c.home_advantage_from_away,
    )
}

/// Nudges toward the side that leads past meetings, paid for by the draw.
pub fn head_to_head(p: Prob3, cfg: &AdvisorConfig, input: &PredictionInput<'_>) -> Prob3 {
    let h2h = input.h2h;
    if h2h.matches < cfg.predictor.h2h_min_matches {
        return p;
    }
    let delta = cfg.predictor.h2h_weight * h2h.win_margin().abs();
    let mut out = p;
    match h2h.advantage {
        Advantage::Home => out.home += delta,
        Advantage::Away => out.away += delta,
        Advantage::Even | Advantage::None => return p,
    }
    out.draw -= delta;
    out
}

/// Losing runs earn a rebound increment; long winning runs are discounted.
pub fn streak_reversion(p: Prob3, cfg: &AdvisorConfig, input: &PredictionInput<'_>) -> Prob3 {
    let c = &cfg.predictor;
    let adjust = |value: f64, snap: &TeamFormSnapshot| {
        let mut v = value;
        if snap.streak.is_losing(c.losing_streak_threshold) {
            let past = (snap.streak.count - c.losing_streak_threshold + 1) as f64;
            v += (c.losing_streak_step * past).min(c.losing_streak_cap);
        }
        if snap.streak.is_winning(c.winning_streak_threshold) {
            v -= c.winning_streak_discount;
        }
        v
    };
    Prob3::new(adjust(p.home, input.home), p.draw, adjust(p.away, input.away))
}

/// Adds the overdue-draw bonus, taking half of it from each side.
pub fn draw_regression(p: Prob3, cfg: &AdvisorConfig, input: &PredictionInput<'_>) -> Prob3 {
    let bonus = draw_regression_bonus(
        &cfg.draw_regression,
        input.home.no_draw_streak,
        input.away.no_draw_streak,
    );
    Prob3::new(p.home - bonus / 2.0, p.draw + bonus, p.away - bonus / 2.0)
}

pub fn market_blend(p: Prob3, cfg: &AdvisorConfig, input: &PredictionInput<'_>) -> Prob3 {
    match input.odds {
        Some(odds) => p
            .normalized()
            .blend(odds.no_vig(), cfg.predictor.market_weight),
        None => p,
    }
}

pub fn normalize(p: Prob3, _cfg: &AdvisorConfig, _input: &PredictionInput<'_>) -> Prob3 {
    p.normalized()
}

/// Heuristic home/draw/away model built from an ordered list of steps.
#[derive(Debug, Clone)]
pub struct MatchPredictor {
    cfg: AdvisorConfig,
    steps: Vec<PipelineStep>,
}

impl Default for MatchPredictor {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}

impl MatchPredictor {
    pub fn new(cfg: AdvisorConfig) -> Self {
        Self {
            cfg,
            steps: default_pipeline(),
        }
    }

    pub fn with_steps(cfg: AdvisorConfig, steps: Vec<PipelineStep>) -> Self {
        Self { cfg, steps }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.cfg
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// The running triple after every step, each clamped to non-negative.
    pub fn trace(&self, input: &PredictionInput<'_>) -> Vec<(&'static str, Prob3)> {
        let mut p = Prob3::uniform();
        let mut out = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            p = (step.apply)(p, &self.cfg, input).clamped_non_negative();
            out.push((step.name, p));
        }
        out
    }

    pub fn probabilities(&self, input: &PredictionInput<'_>) -> Prob3 {
        let mut p = Prob3::uniform();
        for step in &self.steps {
            p = (step.apply)(p, &self.cfg, input).clamped_non_negative();
            debug!(
                step = step.name,
                home = p.home,
                draw = p.draw,
                away = p.away,
                "pipeline step"
            );
        }
        p.normalized()
    }

    pub fn predict(&self, input: &PredictionInput<'_>) -> OutcomePrediction {
        let probs = self.probabilities(input);
        let outcome = probs.argmax();
        let confidence = self.confidence(probs, input);
        let tier = self.tier(confidence);
        let draw_bonus = draw_regression_bonus(
            &self.cfg.draw_regression,
            input.home.no_draw_streak,
            input.away.no_draw_streak,
        );
        let expected_value = input
            .odds
            .map(|odds| crate::odds::expected_value(probs.get(outcome), odds.price(outcome)));

        let (p_home, p_draw, p_away) = rounded_percentages(probs);
        let prediction = OutcomePrediction {
            p_home,
            p_draw,
            p_away,
            probabilities: probs,
            outcome,
            confidence,
            tier,
            reasons: build_reasons(&self.cfg, input, draw_bonus),
            advice: build_advice(&self.cfg, input, probs, outcome, tier),
            expected_value,
            draw_bonus,
        };
        debug!(
            home = input.home_name,
            away = input.away_name,
            outcome = %prediction.outcome,
            confidence = prediction.confidence,
            "prediction ready"
        );
        prediction
    }

    fn confidence(&self, probs: Prob3, input: &PredictionInput<'_>) -> u8 {
        let c = &self.cfg.predictor;
        let cap = c.confidence_cap.max(0.0).min(MAX_CONFIDENCE);
        let mut score = (c.confidence_base + c.confidence_slope * probs.top_two_gap()).min(cap);
        if input.home.matches_played < c.min_matches_for_full_confidence
            || input.away.matches_played < c.min_matches_for_full_confidence
        {
            score *= c.sparse_confidence_factor;
        }
        score.clamp(0.0, cap).round() as u8
    }

    fn tier(&self, confidence: u8) -> ConfidenceTier {
        let c = &self.cfg.predictor;
        let v = confidence as f64;
        if v >= c.high_confidence {
            ConfidenceTier::High
        } else if v >= c.medium_confidence {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// One-decimal percentages; the draw absorbs the rounding residue so the
/// three add up to 100.
fn rounded_percentages(p: Prob3) -> (f64, f64, f64) {
    let round1 = |v: f64| (v * 10.0).round() / 10.0;
    let home = round1(p.home * 100.0);
    let away = round1(p.away * 100.0);
    let draw = round1((100.0 - home - away).max(0.0));
    (home, draw, away)
}
