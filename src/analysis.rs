use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advice::pick_label;
use crate::config::AdvisorConfig;
use crate::error::ConfigError;
use crate::form::FormCalculator;
use crate::head_to_head::{HeadToHeadSummary, analyze_head_to_head};
use crate::model::{MatchRecord, Prob3, TeamFormSnapshot, TeamId};
use crate::odds::OddsTriple;
use crate::over_under::{GoalsPick, OverUnderPrediction, OverUnderPredictor};
use crate::tendency::{TendencyReport, analyze_tendency};
use crate::tips::{Tip, generate_tips};
use crate::value_bet::{ValueBetFinding, find_value_bets};
use crate::win_prob::{MatchPredictor, OutcomePrediction, PredictionInput};

/// One fixture to analyse, with histories already filtered by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRequest {
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_name: String,
    pub away_name: String,
    #[serde(default)]
    pub kickoff: Option<NaiveDate>,
    /// Home side's recent matches, oldest first.
    #[serde(default)]
    pub home_matches: Vec<MatchRecord>,
    #[serde(default)]
    pub away_matches: Vec<MatchRecord>,
    #[serde(default)]
    pub head_to_head: Vec<MatchRecord>,
    #[serde(default)]
    pub odds: Option<OddsTriple>,
}

impl FixtureRequest {
    /// Request built from a chronological match list: each side's last
    /// `window` matches and the last `window` meetings between them.
    pub fn from_history(
        history: &[MatchRecord],
        home_id: TeamId,
        away_id: TeamId,
        home_name: impl Into<String>,
        away_name: impl Into<String>,
        window: usize,
    ) -> Self {
        Self {
            home_id,
            away_id,
            home_name: home_name.into(),
            away_name: away_name.into(),
            kickoff: None,
            home_matches: last_matching(history, window, |m| m.involves(home_id)),
            away_matches: last_matching(history, window, |m| m.involves(away_id)),
            head_to_head: last_matching(history, window, |m| m.is_between(home_id, away_id)),
            odds: None,
        }
    }
}

fn last_matching(
    history: &[MatchRecord],
    window: usize,
    keep: impl Fn(&MatchRecord) -> bool,
) -> Vec<MatchRecord> {
    let mut picked: Vec<MatchRecord> = history
        .iter()
        .rev()
        .filter(|m| keep(m))
        .take(window)
        .cloned()
        .collect();
    picked.reverse();
    picked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_name: String,
    pub away_name: String,
    pub kickoff: Option<NaiveDate>,
    pub home_form: TeamFormSnapshot,
    pub away_form: TeamFormSnapshot,
    pub head_to_head: HeadToHeadSummary,
    pub prediction: OutcomePrediction,
    pub goals: OverUnderPrediction,
    pub home_tendency: TendencyReport,
    pub away_tendency: TendencyReport,
    pub h2h_tendency: TendencyReport,
    pub odds: Option<OddsTriple>,
    pub value_bets: Vec<ValueBetFinding>,
    pub tips: Vec<Tip>,
}

/// Runs the full pipeline for a fixture and keeps a bounded history of the
/// results, oldest evicted first. Not internally synchronised.
#[derive(Debug)]
pub struct MatchAnalyzer {
    cfg: AdvisorConfig,
    form: FormCalculator,
    predictor: MatchPredictor,
    over_under: OverUnderPredictor,
    history: VecDeque<AnalysisRecord>,
    next_id: u64,
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::build(AdvisorConfig::default())
    }
}

impl MatchAnalyzer {
    pub fn new(cfg: AdvisorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    /// Uses a prepared predictor, for example one with a custom pipeline.
    pub fn with_predictor(predictor: MatchPredictor) -> Result<Self, ConfigError> {
        let mut analyzer = Self::new(predictor.config().clone())?;
        analyzer.predictor = predictor;
        Ok(analyzer)
    }

    fn build(cfg: AdvisorConfig) -> Self {
        Self {
            form: FormCalculator::new(cfg.form.clone()),
            predictor: MatchPredictor::new(cfg.clone()),
            over_under: OverUnderPredictor::new(cfg.over_under.clone()),
            history: VecDeque::with_capacity(cfg.history_limit.min(256)),
            next_id: 1,
            cfg,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.cfg
    }

    pub fn analyze(&mut self, req: &FixtureRequest) -> &AnalysisRecord {
        let record = self.evaluate(req, self.next_id, Utc::now());
        self.next_id += 1;
        info!(
            id = record.id,
            home = %record.home_name,
            away = %record.away_name,
            outcome = %record.prediction.outcome,
            confidence = record.prediction.confidence,
            value_bets = record.value_bets.len(),
            "fixture analysed"
        );

        self.history.push_back(record);
        while self.history.len() > self.cfg.history_limit {
            self.history.pop_front();
        }
        let last = self.history.len() - 1;
        &self.history[last]
    }

    /// The analysis without touching history.
    pub fn evaluate(&self, req: &FixtureRequest, id: u64, created_at: DateTime<Utc>) -> AnalysisRecord {
        if req.home_matches.is_empty() || req.away_matches.is_empty() {
            warn!(
                home = %req.home_name,
                away = %req.away_name,
                "empty form history, using neutral defaults"
            );
        }

        let (home_form, away_form, head_to_head) = self.inputs(req);
        let input = prediction_input(req, &home_form, &away_form, &head_to_head);
        let prediction = self.predictor.predict(&input);
        let goals = self.over_under.predict_snapshots(&home_form, &away_form);

        let tendency_cfg = &self.cfg.tendency;
        let home_tendency = analyze_tendency(tendency_cfg, &req.home_matches, Some(req.home_id));
        let away_tendency = analyze_tendency(tendency_cfg, &req.away_matches, Some(req.away_id));
        let h2h_tendency = analyze_tendency(tendency_cfg, &req.head_to_head, None);

        let value_bets = req
            .odds
            .as_ref()
            .map(|odds| find_value_bets(&self.cfg.value, prediction.probabilities, odds))
            .unwrap_or_default();
        let tips = generate_tips(&self.cfg, &input, &prediction, &goals, &value_bets);

        AnalysisRecord {
            id,
            created_at,
            home_id: req.home_id,
            away_id: req.away_id,
            home_name: req.home_name.clone(),
            away_name: req.away_name.clone(),
            kickoff: req.kickoff,
            home_form,
            away_form,
            head_to_head,
            prediction,
            goals,
            home_tendency,
            away_tendency,
            h2h_tendency,
            odds: req.odds,
            value_bets,
            tips,
        }
    }

    /// The predictor's running triple after each step, for the same inputs
    /// `evaluate` would use.
    pub fn trace(&self, req: &FixtureRequest) -> Vec<(&'static str, Prob3)> {
        let (home_form, away_form, head_to_head) = self.inputs(req);
        self.predictor
            .trace(&prediction_input(req, &home_form, &away_form, &head_to_head))
    }

    pub fn predictor(&self) -> &MatchPredictor {
        &self.predictor
    }

    fn inputs(
        &self,
        req: &FixtureRequest,
    ) -> (TeamFormSnapshot, TeamFormSnapshot, HeadToHeadSummary) {
        (
            self.form.compute(req.home_id, &req.home_matches),
            self.form.compute(req.away_id, &req.away_matches),
            analyze_head_to_head(req.home_id, req.away_id, &req.head_to_head),
        )
    }

    /// Retained analyses, most recent last.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &AnalysisRecord> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.history.back()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Short multi-line summary of one analysis.
    pub fn render_summary(&self, record: &AnalysisRecord) -> String {
        render_summary(record, self.cfg.draw_regression.streak_threshold)
    }
}

fn prediction_input<'a>(
    req: &'a FixtureRequest,
    home: &'a TeamFormSnapshot,
    away: &'a TeamFormSnapshot,
    h2h: &'a HeadToHeadSummary,
) -> PredictionInput<'a> {
    PredictionInput {
        home_name: &req.home_name,
        away_name: &req.away_name,
        home,
        away,
        h2h,
        odds: req.odds.as_ref(),
    }
}

fn render_summary(record: &AnalysisRecord, draw_streak_threshold: u32) -> String {
    let p = &record.prediction;
    let g = &record.goals;
    let side = match g.pick {
        GoalsPick::Over => "over",
        GoalsPick::Under => "under",
    };
    let mut lines = vec![
        format!("{} vs {}", record.home_name, record.away_name),
        format!(
            "Prediction: {} ({:.1}% / {:.1}% / {:.1}%)",
            pick_label(p.outcome, &record.home_name, &record.away_name),
            p.p_home,
            p.p_draw,
            p.p_away
        ),
        format!("Confidence: {} ({})", p.confidence, p.tier.label()),
        format!(
            "Goals: {side} {:.1} (expected {:.2}, over {:.0}%)",
            g.line,
            g.expected_goals,
            g.over_probability * 100.0
        ),
    ];

    lines.extend(record.value_bets.iter().map(|bet| {
        format!(
            "Value: {} @ {:.2}, EV {:+.2} ({})",
            bet.outcome,
            bet.price,
            bet.expected_value,
            bet.quality.label()
        )
    }));

    for (name, snap) in [
        (&record.home_name, &record.home_form),
        (&record.away_name, &record.away_form),
    ] {
        if snap.no_draw_streak > draw_streak_threshold {
            lines.push(format!(
                "Draw streak: {name} {} matches without a draw",
                snap.no_draw_streak
            ));
        }
    }
    lines.push(format!("Advice: {}", p.advice));
    lines.join("\n")
}
