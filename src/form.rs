use tracing::{debug, warn};

use crate::config::FormConfig;
use crate::model::{MatchRecord, MatchResult, Streak, TeamFormSnapshot, TeamId, Trend};

/// Recency-weighted form for one team.
#[derive(Debug, Clone, Default)]
pub struct FormCalculator {
    cfg: FormConfig,
}

impl FormCalculator {
    pub fn new(cfg: FormConfig) -> Self {
        Self { cfg }
    }

    /// `matches` is ordered oldest first. Matches the team did not play in
    /// are ignored.
    pub fn compute(&self, team_id: TeamId, matches: &[MatchRecord]) -> TeamFormSnapshot {
        let mut results = Vec::with_capacity(matches.len());
        let mut goals_for = 0u32;
        let mut goals_against = 0u32;
        for m in matches {
            let Some((scored, conceded)) = m.goals_for(team_id) else {
                continue;
            };
            goals_for += scored as u32;
            goals_against += conceded as u32;
            results.push(MatchResult::from_goals(scored, conceded));
        }
        if results.len() < matches.len() {
            warn!(
                team_id,
                skipped = matches.len() - results.len(),
                "form history contains matches without the team"
            );
        }

        let snapshot = TeamFormSnapshot {
            team_id,
            score: self.weighted_score(&results),
            form: self.form_sequence(&results),
            trend: self.trend(&results),
            streak: current_streak(&results),
            matches_played: results.len(),
            wins: count(&results, MatchResult::Win),
            draws: count(&results, MatchResult::Draw),
            losses: count(&results, MatchResult::Loss),
            goals_for,
            goals_against,
            no_draw_streak: no_draw_streak(&results),
        };
        debug!(
            team_id,
            score = snapshot.score,
            form = %snapshot.form,
            streak = %snapshot.streak,
            "form computed"
        );
        snapshot
    }

    fn points(&self, r: MatchResult) -> f64 {
        match r {
            MatchResult::Win => self.cfg.points_win,
            MatchResult::Draw => self.cfg.points_draw,
            MatchResult::Loss => self.cfg.points_loss,
        }
    }

    /// Weighted mean of result points; the i-th oldest match has weight i.
    fn weighted_score(&self, results: &[MatchResult]) -> f64 {
        if results.is_empty() {
            return self.cfg.neutral_score;
        }
        let mut weighted = 0.0;
        let mut weight_sum = 0.0;
        for (i, r) in results.iter().enumerate() {
            let w = (i + 1) as f64;
            weighted += w * self.points(*r);
            weight_sum += w;
        }
        (weighted / weight_sum).clamp(0.0, 100.0)
    }

    fn form_sequence(&self, results: &[MatchResult]) -> String {
        let window = self.cfg.display_window;
        let tail = &results[results.len().saturating_sub(window)..];
        let mut out = "?".repeat(window - tail.len());
        out.extend(tail.iter().map(|r| r.code()));
        out
    }

    fn trend(&self, results: &[MatchResult]) -> Trend {
        let window = self.cfg.trend_window.max(1);
        if results.len() <= window {
            return Trend::Unknown;
        }
        let split = results.len() - window;
        let mean = |rs: &[MatchResult]| {
            rs.iter().map(|r| self.points(*r)).sum::<f64>() / rs.len() as f64
        };
        let diff = mean(&results[split..]) - mean(&results[..split]);
        if diff > self.cfg.trend_margin {
            Trend::Rising
        } else if diff < -self.cfg.trend_margin {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

fn count(results: &[MatchResult], want: MatchResult) -> usize {
    results.iter().filter(|r| **r == want).count()
}

/// Run of identical results ending at the most recent (last) entry.
pub fn current_streak(results: &[MatchResult]) -> Streak {
    let Some(last) = results.last() else {
        return Streak::NONE;
    };
    let run = results.iter().rev().take_while(|r| *r == last).count();
    Streak::new(*last, run as u32)
}

/// Non-draw results counted back from the most recent entry until a draw.
pub fn no_draw_streak(results: &[MatchResult]) -> u32 {
    results
        .iter()
        .rev()
        .take_while(|r| **r != MatchResult::Draw)
        .count() as u32
}
