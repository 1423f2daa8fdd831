use serde::{Deserialize, Serialize};

use crate::config::ValueConfig;
use crate::model::{Outcome, Prob3};
use crate::odds::{OddsTriple, expected_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueQuality {
    Acceptable,
    Good,
    Excellent,
}

impl ValueQuality {
    pub fn label(self) -> &'static str {
        match self {
            Self::Acceptable => "acceptable",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBetFinding {
    pub outcome: Outcome,
    pub probability: f64,
    pub price: f64,
    pub expected_value: f64,
    pub quality: ValueQuality,
}

/// Outcomes whose EV clears `min_edge`, best first. Equal EVs keep
/// home/draw/away order.
pub fn find_value_bets(cfg: &ValueConfig, probs: Prob3, odds: &OddsTriple) -> Vec<ValueBetFinding> {
    let mut out: Vec<ValueBetFinding> = Outcome::PRIORITY
        .into_iter()
        .filter_map(|outcome| {
            let probability = probs.get(outcome);
            let price = odds.price(outcome);
            let ev = expected_value(probability, price);
            if ev <= 0.0 || ev < cfg.min_edge {
                return None;
            }
            Some(ValueBetFinding {
                outcome,
                probability,
                price,
                expected_value: ev,
                quality: quality_for(cfg, ev),
            })
        })
        .collect();
    // Stable sort keeps the priority order for ties.
    out.sort_by(|a, b| b.expected_value.total_cmp(&a.expected_value));
    out
}

pub fn quality_for(cfg: &ValueConfig, ev: f64) -> ValueQuality {
    if ev >= cfg.excellent {
        ValueQuality::Excellent
    } else if ev >= cfg.good {
        ValueQuality::Good
    } else {
        ValueQuality::Acceptable
    }
}
