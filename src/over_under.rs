use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OverUnderConfig;
use crate::model::TeamFormSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalsPick {
    Over,
    Under,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverUnderPrediction {
    pub line: f64,
    pub expected_goals: f64,
    pub over_probability: f64,
    pub pick: GoalsPick,
    /// Distance from a coin flip, in [0, 100].
    pub confidence: f64,
}

/// Per-match scoring averages for one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRates {
    pub scored: f64,
    pub conceded: f64,
}

impl GoalRates {
    /// Averages from a snapshot; a side with no matches gets `neutral` for both.
    pub fn from_snapshot(snap: &TeamFormSnapshot, neutral: f64) -> Self {
        Self {
            scored: snap.goals_for_per_match().unwrap_or(neutral),
            conceded: snap.goals_against_per_match().unwrap_or(neutral),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverUnderPredictor {
    cfg: OverUnderConfig,
}

impl OverUnderPredictor {
    pub fn new(cfg: OverUnderConfig) -> Self {
        Self { cfg }
    }

    pub fn predict_snapshots(
        &self,
        home: &TeamFormSnapshot,
        away: &TeamFormSnapshot,
    ) -> OverUnderPrediction {
        let neutral = self.cfg.neutral_goals_per_match;
        self.predict(
            GoalRates::from_snapshot(home, neutral),
            GoalRates::from_snapshot(away, neutral),
            self.cfg.line,
        )
    }

    /// Expected total is the sum of the two cross-matchup estimates:
    /// home attack against away defence, and away attack against home defence.
    pub fn predict(&self, home: GoalRates, away: GoalRates, line: f64) -> OverUnderPrediction {
        let home_estimate = (home.scored + away.conceded) / 2.0;
        let away_estimate = (away.scored + home.conceded) / 2.0;
        let expected_goals = home_estimate + away_estimate;

        let over_probability = self.ladder(expected_goals - line);
        let pick = if over_probability > 0.5 {
            GoalsPick::Over
        } else {
            GoalsPick::Under
        };
        let out = OverUnderPrediction {
            line,
            expected_goals,
            over_probability,
            pick,
            confidence: (over_probability - 0.5).abs() * 200.0,
        };
        debug!(
            expected = out.expected_goals,
            over = out.over_probability,
            "over/under predicted"
        );
        out
    }

    fn ladder(&self, diff: f64) -> f64 {
        let edges = self.cfg.band_edges;
        let idx = edges.iter().position(|edge| diff >= *edge).unwrap_or(edges.len());
        self.cfg.ladder[idx]
    }
}
