use serde::{Deserialize, Serialize};

use crate::config::TendencyConfig;
use crate::model::{MatchRecord, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tendency {
    VeryOffensive,
    Offensive,
    Balanced,
    Defensive,
    VeryDefensive,
    Unknown,
}

impl Tendency {
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryOffensive => "very offensive",
            Self::Offensive => "offensive",
            Self::Balanced => "balanced",
            Self::Defensive => "defensive",
            Self::VeryDefensive => "very defensive",
            Self::Unknown => "unknown",
        }
    }
}

/// Goal patterns over a set of matches. Percentages are rounded to one
/// decimal and absent when there is nothing to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendencyReport {
    pub tendency: Tendency,
    pub matches: usize,
    pub over_pct: Option<f64>,
    pub btts_pct: Option<f64>,
    /// Only computed when a team is named.
    pub clean_sheet_pct: Option<f64>,
}

pub fn analyze_tendency(
    cfg: &TendencyConfig,
    matches: &[MatchRecord],
    team: Option<TeamId>,
) -> TendencyReport {
    if matches.is_empty() {
        return TendencyReport {
            tendency: Tendency::Unknown,
            matches: 0,
            over_pct: None,
            btts_pct: None,
            clean_sheet_pct: None,
        };
    }

    let n = matches.len();
    let over = matches
        .iter()
        .filter(|m| m.total_goals() as f64 > cfg.goal_line)
        .count();
    let btts = matches.iter().filter(|m| m.both_scored()).count();
    let over_pct = pct(over, n);

    let clean_sheet_pct = team.and_then(|id| {
        let conceded: Vec<u8> = matches
            .iter()
            .filter_map(|m| m.goals_for(id).map(|(_, against)| against))
            .collect();
        let clean = conceded.iter().filter(|g| **g == 0).count();
        (!conceded.is_empty()).then(|| pct(clean, conceded.len()))
    });

    TendencyReport {
        tendency: classify(cfg, over_pct),
        matches: n,
        over_pct: Some(over_pct),
        btts_pct: Some(pct(btts, n)),
        clean_sheet_pct,
    }
}

fn classify(cfg: &TendencyConfig, over_pct: f64) -> Tendency {
    if over_pct >= cfg.very_offensive {
        Tendency::VeryOffensive
    } else if over_pct >= cfg.offensive {
        Tendency::Offensive
    } else if over_pct >= cfg.balanced {
        Tendency::Balanced
    } else if over_pct >= cfg.defensive {
        Tendency::Defensive
    } else {
        Tendency::VeryDefensive
    }
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_unknown_with_no_stats() {
        let r = analyze_tendency(&TendencyConfig::default(), &[], Some(1));
        assert_eq!(r.tendency, Tendency::Unknown);
        assert_eq!(r.over_pct, None);
        assert_eq!(r.btts_pct, None);
        assert_eq!(r.clean_sheet_pct, None);
    }

    #[test]
    fn goal_heavy_set_is_offensive() {
        let matches = vec![
            MatchRecord::new(1, 2, 3, 1),
            MatchRecord::new(3, 1, 2, 2),
            MatchRecord::new(1, 4, 4, 0),
            MatchRecord::new(5, 1, 1, 0),
        ];
        let r = analyze_tendency(&TendencyConfig::default(), &matches, Some(1));
        assert_eq!(r.over_pct, Some(75.0));
        assert_eq!(r.btts_pct, Some(50.0));
        assert_eq!(r.tendency, Tendency::VeryOffensive);
        // Team 1 kept a clean sheet only against team 4.
        assert_eq!(r.clean_sheet_pct, Some(25.0));
    }

    #[test]
    fn clean_sheets_need_a_named_team() {
        let matches = vec![MatchRecord::new(1, 2, 0, 0), MatchRecord::new(1, 2, 1, 0)];
        let r = analyze_tendency(&TendencyConfig::default(), &matches, None);
        assert_eq!(r.clean_sheet_pct, None);
        assert_eq!(r.tendency, Tendency::VeryDefensive);
        let r = analyze_tendency(&TendencyConfig::default(), &matches, Some(9));
        assert_eq!(r.clean_sheet_pct, None);
    }
}
