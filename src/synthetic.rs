use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{MatchRecord, TeamId};
use crate::odds::OddsTriple;

const GOALS_TOTAL_BASE: f64 = 2.60;
const HOME_ADV_GOALS: f64 = 0.25;
const MAX_GOALS: u8 = 9;

/// Seeded random league for demos, benches and property tests. The same
/// seed always yields the same matches.
pub struct SyntheticLeague {
    rng: StdRng,
    // Attack/defence-neutral strength per team, roughly in [-0.6, 0.6].
    strengths: Vec<(TeamId, f64)>,
    start: NaiveDate,
}

impl SyntheticLeague {
    pub fn new(seed: u64, teams: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let strengths = (0..teams.max(2))
            .map(|i| (i as TeamId + 1, rng.gen_range(-0.6..0.6)))
            .collect();
        Self {
            rng,
            strengths,
            start: NaiveDate::from_ymd_opt(2024, 8, 10).unwrap_or_default(),
        }
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.strengths.iter().map(|(id, _)| *id).collect()
    }

    /// `rounds` rounds of random pairings, oldest first, one week apart.
    pub fn season(&mut self, rounds: usize) -> Vec<MatchRecord> {
        let mut out = Vec::with_capacity(rounds * self.strengths.len() / 2);
        for round in 0..rounds {
            let date = self.start + Duration::days(7 * round as i64);
            let mut order: Vec<usize> = (0..self.strengths.len()).collect();
            for i in (1..order.len()).rev() {
                let j = self.rng.gen_range(0..=i);
                order.swap(i, j);
            }
            for pair in order.chunks_exact(2) {
                let (home_id, s_home) = self.strengths[pair[0]];
                let (away_id, s_away) = self.strengths[pair[1]];
                let mut m = self.play(home_id, s_home, away_id, s_away);
                m.date = Some(date);
                out.push(m);
            }
        }
        out
    }

    fn play(&mut self, home_id: TeamId, s_home: f64, away_id: TeamId, s_away: f64) -> MatchRecord {
        let diff = HOME_ADV_GOALS + (s_home - s_away);
        let lambda_home = ((GOALS_TOTAL_BASE + diff) / 2.0).clamp(0.2, 3.8);
        let lambda_away = ((GOALS_TOTAL_BASE - diff) / 2.0).clamp(0.2, 3.8);
        let home_goals = self.poisson(lambda_home);
        let away_goals = self.poisson(lambda_away);

        let mut m = MatchRecord::new(home_id, away_id, home_goals, away_goals);
        if self.rng.gen_bool(0.8) {
            m.odds = self.price(lambda_home, lambda_away);
        }
        m
    }

    // Inverse-CDF sampling, capped at MAX_GOALS.
    fn poisson(&mut self, lambda: f64) -> u8 {
        let u: f64 = self.rng.gen_range(0.0..1.0);
        let mut k = 0u8;
        let mut p = (-lambda).exp();
        let mut cdf = p;
        while u > cdf && k < MAX_GOALS {
            k += 1;
            p *= lambda / k as f64;
            cdf += p;
        }
        k
    }

    /// Rough bookmaker prices with a 5% margin and some noise.
    fn price(&mut self, lambda_home: f64, lambda_away: f64) -> Option<OddsTriple> {
        let lean = (lambda_home - lambda_away) / (lambda_home + lambda_away);
        let draw = 0.27;
        let home = ((1.0 - draw) * (0.5 + lean / 2.0) + self.rng.gen_range(-0.03..0.03)).clamp(0.05, 0.9);
        let away = (1.0 - draw - home).max(0.05);
        let margin = 1.05;
        OddsTriple::new(1.0 / (home * margin), 1.0 / (draw * margin), 1.0 / (away * margin)).ok()
    }
}
