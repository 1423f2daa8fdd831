use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the overdue-draw bonus.
pub const MAX_DRAW_BONUS: f64 = 0.25;
/// Upper bound for prediction confidence.
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Every weight, threshold and band used by the advisor, in one place.
///
/// Each section falls back to its defaults field by field, so a JSON file
/// only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub form: FormConfig,
    pub predictor: PredictorConfig,
    pub advice: AdviceConfig,
    pub draw_regression: DrawRegressionConfig,
    pub over_under: OverUnderConfig,
    pub tendency: TendencyConfig,
    pub value: ValueConfig,
    pub tips: TipsConfig,
    /// Maximum number of analyses the orchestrator retains.
    pub history_limit: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            predictor: PredictorConfig::default(),
            advice: AdviceConfig::default(),
            draw_regression: DrawRegressionConfig::default(),
            over_under: OverUnderConfig::default(),
            tendency: TendencyConfig::default(),
            value: ValueConfig::default(),
            tips: TipsConfig::default(),
            history_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub points_win: f64,
    pub points_draw: f64,
    pub points_loss: f64,
    /// Score reported for a team with no matches.
    pub neutral_score: f64,
    /// Length of the rendered form sequence.
    pub display_window: usize,
    /// Most recent matches compared against the rest for the trend tag.
    pub trend_window: usize,
    /// Points difference (on the 0-100 scale) needed to call a trend.
    pub trend_margin: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            points_win: 100.0,
            points_draw: 40.0,
            points_loss: 0.0,
            neutral_score: 50.0,
            display_window: 5,
            trend_window: 3,
            trend_margin: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    // Base split.
    pub draw_reserve: f64,

    // Home advantage, in probability units.
    pub home_advantage: f64,
    pub home_advantage_from_away: f64,
    pub home_advantage_from_draw: f64,

    // Head-to-head.
    pub h2h_min_matches: usize,
    pub h2h_weight: f64,

    // Streak mean reversion.
    pub losing_streak_threshold: u32,
    pub losing_streak_step: f64,
    pub losing_streak_cap: f64,
    pub winning_streak_threshold: u32,
    pub winning_streak_discount: f64,

    /// Share of the final triple taken from bookmaker implied probabilities.
    pub market_weight: f64,

    // Confidence.
    pub confidence_base: f64,
    pub confidence_slope: f64,
    pub confidence_cap: f64,
    pub min_matches_for_full_confidence: usize,
    pub sparse_confidence_factor: f64,
    pub high_confidence: f64,
    pub medium_confidence: f64,

    /// Form score gap that earns a reason line.
    pub form_gap_reason: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            draw_reserve: 0.26,
            home_advantage: 0.12,
            home_advantage_from_away: 0.08,
            home_advantage_from_draw: 0.04,
            h2h_min_matches: 3,
            h2h_weight: 0.10,
            losing_streak_threshold: 3,
            losing_streak_step: 0.02,
            losing_streak_cap: 0.08,
            winning_streak_threshold: 5,
            winning_streak_discount: 0.03,
            market_weight: 0.10,
            confidence_base: 40.0,
            confidence_slope: 150.0,
            confidence_cap: 95.0,
            min_matches_for_full_confidence: 3,
            sparse_confidence_factor: 0.8,
            high_confidence: 70.0,
            medium_confidence: 55.0,
            form_gap_reason: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub strong_value_ev: f64,
    pub value_ev: f64,
    pub overpriced_ev: f64,
    /// Draw probability above which the advice points at the draw price.
    pub draw_check_probability: f64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            strong_value_ev: 0.10,
            value_ev: 0.03,
            overpriced_ev: -0.10,
            draw_check_probability: 0.32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawRegressionConfig {
    pub streak_threshold: u32,
    pub step: f64,
    pub cap: f64,
}

impl Default for DrawRegressionConfig {
    fn default() -> Self {
        Self {
            streak_threshold: 5,
            step: 0.03,
            cap: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverUnderConfig {
    pub line: f64,
    /// Per-match goals assumed for a side with no history.
    pub neutral_goals_per_match: f64,
    /// Lower edges of the (expected - line) bands, highest first.
    pub band_edges: [f64; 4],
    /// Over probability for each band, highest band first.
    pub ladder: [f64; 5],
}

impl Default for OverUnderConfig {
    fn default() -> Self {
        Self {
            line: 2.5,
            neutral_goals_per_match: 1.3,
            band_edges: [0.5, 0.2, -0.2, -0.5],
            ladder: [0.75, 0.60, 0.50, 0.40, 0.25],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendencyConfig {
    pub goal_line: f64,
    // Lower bounds on the over percentage, in percent.
    pub very_offensive: f64,
    pub offensive: f64,
    pub balanced: f64,
    pub defensive: f64,
}

impl Default for TendencyConfig {
    fn default() -> Self {
        Self {
            goal_line: 2.5,
            very_offensive: 70.0,
            offensive: 55.0,
            balanced: 40.0,
            defensive: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    pub min_edge: f64,
    pub good: f64,
    pub excellent: f64,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            min_edge: 0.05,
            good: 0.10,
            excellent: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsConfig {
    pub over_under_min_confidence: f64,
    pub rebound_streak: u32,
}

impl Default for TipsConfig {
    fn default() -> Self {
        Self {
            over_under_min_confidence: 20.0,
            rebound_streak: 3,
        }
    }
}

impl AdvisorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw).context("invalid advisor config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read advisor config {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Defaults with `ADVISOR_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_f64("ADVISOR_HOME_ADVANTAGE") {
            cfg.predictor.home_advantage = v.clamp(0.0, 0.30);
        }
        if let Some(v) = env_f64("ADVISOR_MARKET_WEIGHT") {
            cfg.predictor.market_weight = v.clamp(0.0, 1.0);
        }
        if let Some(v) = env_f64("ADVISOR_VALUE_MIN_EDGE") {
            cfg.value.min_edge = v.clamp(0.0, cfg.value.good);
        }
        if let Some(v) = env::var("ADVISOR_DRAW_STREAK_THRESHOLD")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
        {
            cfg.draw_regression.streak_threshold = v.clamp(1, 20);
        }
        if let Some(v) = env::var("ADVISOR_HISTORY_LIMIT")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            cfg.history_limit = v.clamp(1, 10_000);
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.predictor;
        for (field, v) in [
            ("predictor.draw_reserve", p.draw_reserve),
            ("predictor.home_advantage", p.home_advantage),
            ("predictor.h2h_weight", p.h2h_weight),
            ("predictor.market_weight", p.market_weight),
            ("predictor.sparse_confidence_factor", p.sparse_confidence_factor),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::invalid(field, format!("{v} is outside [0, 1]")));
            }
        }
        if !(0.0..=MAX_DRAW_BONUS).contains(&self.draw_regression.cap) {
            return Err(ConfigError::invalid(
                "draw_regression.cap",
                format!("{} is outside [0, {MAX_DRAW_BONUS}]", self.draw_regression.cap),
            ));
        }
        if !(0.0..=MAX_CONFIDENCE).contains(&p.confidence_cap) {
            return Err(ConfigError::invalid(
                "predictor.confidence_cap",
                format!("{} is outside [0, {MAX_CONFIDENCE}]", p.confidence_cap),
            ));
        }
        if !(p.home_advantage_from_draw >= 0.0
            && p.home_advantage_from_away >= p.home_advantage_from_draw)
        {
            return Err(ConfigError::invalid(
                "predictor.home_advantage_from_away",
                "the away side must give up at least as much as the draw",
            ));
        }
        if p.medium_confidence >= p.high_confidence || p.high_confidence > p.confidence_cap {
            return Err(ConfigError::invalid(
                "predictor.high_confidence",
                "confidence tiers must satisfy medium < high <= cap",
            ));
        }
        let v = &self.value;
        if !(v.min_edge >= 0.0 && v.min_edge <= v.good && v.good <= v.excellent) {
            return Err(ConfigError::invalid(
                "value",
                "EV bands must satisfy 0 <= min_edge <= good <= excellent",
            ));
        }
        if self.over_under.band_edges.windows(2).any(|w| w[0] < w[1]) {
            return Err(ConfigError::invalid(
                "over_under.band_edges",
                "band edges must be listed highest first",
            ));
        }
        if self.over_under.ladder.windows(2).any(|w| w[0] < w[1]) {
            return Err(ConfigError::invalid(
                "over_under.ladder",
                "ladder must be non-increasing",
            ));
        }
        let t = &self.tendency;
        if !(t.very_offensive >= t.offensive && t.offensive >= t.balanced && t.balanced >= t.defensive)
        {
            return Err(ConfigError::invalid(
                "tendency",
                "bands must be listed highest first",
            ));
        }
        if self.form.display_window == 0 {
            return Err(ConfigError::invalid("form.display_window", "must be at least 1"));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::invalid("history_limit", "must be at least 1"));
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AdvisorConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = AdvisorConfig::from_json_str(
            r#"{"predictor": {"home_advantage": 0.08}, "history_limit": 5}"#,
        )
        .expect("partial config parses");
        assert_eq!(cfg.predictor.home_advantage, 0.08);
        assert_eq!(cfg.history_limit, 5);
        assert_eq!(cfg.predictor.draw_reserve, PredictorConfig::default().draw_reserve);
        assert_eq!(cfg.value, ValueConfig::default());
    }

    #[test]
    fn rejects_inverted_value_bands() {
        let mut cfg = AdvisorConfig::default();
        cfg.value.good = 0.30;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "value", .. }));
    }

    #[test]
    fn rejects_market_weight_above_one() {
        let err = AdvisorConfig::from_json_str(r#"{"predictor": {"market_weight": 1.5}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_draw_cap_above_quarter() {
        let err = AdvisorConfig::from_json_str(r#"{"draw_regression": {"cap": 0.6}}"#);
        assert!(err.is_err());
        let mut cfg = AdvisorConfig::default();
        cfg.draw_regression.cap = 0.25;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_confidence_cap_above_95() {
        let mut cfg = AdvisorConfig::default();
        cfg.predictor.confidence_cap = 120.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "predictor.confidence_cap", .. }
        ));
        cfg.predictor.confidence_cap = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_home_advantage_taken_mostly_from_draw() {
        let mut cfg = AdvisorConfig::default();
        cfg.predictor.home_advantage_from_away = 0.02;
        cfg.predictor.home_advantage_from_draw = 0.10;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "predictor.home_advantage_from_away", .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_caps_from_json() {
        let raw = r#"{"predictor": {"confidence_cap": 120.0}, "draw_regression": {"cap": 0.6}}"#;
        assert!(AdvisorConfig::from_json_str(raw).is_err());
    }

    #[test]
    fn rejects_zero_history_limit() {
        let mut cfg = AdvisorConfig::default();
        cfg.history_limit = 0;
        assert!(cfg.validate().is_err());
    }
}
