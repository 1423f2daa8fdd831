use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{MatchRecord, MatchResult, TeamId};

/// Which candidate the past meetings favour. `Home` refers to the side
/// playing at home in the upcoming fixture, not in the historical matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Home,
    Away,
    Even,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub matches: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub home_goals: u32,
    pub away_goals: u32,
    pub advantage: Advantage,
}

impl HeadToHeadSummary {
    pub fn empty() -> Self {
        Self {
            matches: 0,
            home_wins: 0,
            away_wins: 0,
            draws: 0,
            home_goals: 0,
            away_goals: 0,
            advantage: Advantage::None,
        }
    }

    /// Win-count margin of `home` over `away`, as a share of all meetings.
    pub fn win_margin(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        (self.home_wins as f64 - self.away_wins as f64) / self.matches as f64
    }
}

/// Summarise past meetings between `home` and `away`, regardless of venue.
/// Matches involving any other team are skipped.
pub fn analyze_head_to_head(
    home: TeamId,
    away: TeamId,
    matches: &[MatchRecord],
) -> HeadToHeadSummary {
    let mut out = HeadToHeadSummary::empty();
    for m in matches.iter().filter(|m| m.is_between(home, away)) {
        let Some((scored, conceded)) = m.goals_for(home) else {
            continue;
        };
        out.matches += 1;
        out.home_goals += scored as u32;
        out.away_goals += conceded as u32;
        match MatchResult::from_goals(scored, conceded) {
            MatchResult::Win => out.home_wins += 1,
            MatchResult::Loss => out.away_wins += 1,
            MatchResult::Draw => out.draws += 1,
        }
    }

    out.advantage = if out.matches == 0 {
        Advantage::None
    } else if out.home_wins > out.away_wins {
        Advantage::Home
    } else if out.away_wins > out.home_wins {
        Advantage::Away
    } else {
        Advantage::Even
    };
    debug!(
        home,
        away,
        matches = out.matches,
        advantage = ?out.advantage,
        "head-to-head summarised"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_meetings_means_no_advantage() {
        let h2h = analyze_head_to_head(1, 2, &[]);
        assert_eq!(h2h, HeadToHeadSummary::empty());
        assert_eq!(h2h.win_margin(), 0.0);
    }

    #[test]
    fn counts_wins_regardless_of_venue() {
        let meetings = vec![
            MatchRecord::new(1, 2, 2, 0),
            MatchRecord::new(2, 1, 0, 1),
            MatchRecord::new(2, 1, 3, 1),
            MatchRecord::new(1, 2, 1, 1),
            // Not a meeting of these two.
            MatchRecord::new(1, 3, 5, 0),
        ];
        let h2h = analyze_head_to_head(1, 2, &meetings);
        assert_eq!(h2h.matches, 4);
        assert_eq!((h2h.home_wins, h2h.away_wins, h2h.draws), (2, 1, 1));
        assert_eq!((h2h.home_goals, h2h.away_goals), (5, 4));
        assert_eq!(h2h.advantage, Advantage::Home);
    }

    #[test]
    fn equal_wins_are_even_and_reverse_is_away() {
        let meetings = vec![MatchRecord::new(1, 2, 1, 0), MatchRecord::new(1, 2, 0, 1)];
        assert_eq!(analyze_head_to_head(1, 2, &meetings).advantage, Advantage::Even);
        let meetings = vec![MatchRecord::new(1, 2, 0, 1)];
        assert_eq!(analyze_head_to_head(1, 2, &meetings).advantage, Advantage::Away);
    }
}
