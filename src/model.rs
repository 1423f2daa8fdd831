use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::odds::OddsTriple;

pub type TeamId = u32;

/// A finished match. Histories are ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_goals: u8,
    pub away_goals: u8,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub odds: Option<OddsTriple>,
}

impl MatchRecord {
    pub fn new(home_id: TeamId, away_id: TeamId, home_goals: u8, away_goals: u8) -> Self {
        Self {
            home_id,
            away_id,
            home_goals,
            away_goals,
            date: None,
            odds: None,
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home_id == team || self.away_id == team
    }

    pub fn is_between(&self, a: TeamId, b: TeamId) -> bool {
        (self.home_id == a && self.away_id == b) || (self.home_id == b && self.away_id == a)
    }

    /// Goals (scored, conceded) from `team`'s point of view.
    pub fn goals_for(&self, team: TeamId) -> Option<(u8, u8)> {
        if self.home_id == team {
            Some((self.home_goals, self.away_goals))
        } else if self.away_id == team {
            Some((self.away_goals, self.home_goals))
        } else {
            None
        }
    }

    pub fn result_for(&self, team: TeamId) -> Option<MatchResult> {
        self.goals_for(team)
            .map(|(scored, conceded)| MatchResult::from_goals(scored, conceded))
    }

    pub fn outcome(&self) -> Outcome {
        if self.home_goals > self.away_goals {
            Outcome::Home
        } else if self.home_goals < self.away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals as u32 + self.away_goals as u32
    }

    pub fn both_scored(&self) -> bool {
        self.home_goals > 0 && self.away_goals > 0
    }
}

/// A result from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    pub fn from_goals(scored: u8, conceded: u8) -> Self {
        if scored > conceded {
            Self::Win
        } else if scored < conceded {
            Self::Loss
        } else {
            Self::Draw
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Draw => 'D',
            Self::Loss => 'L',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(Self::Win),
            'D' => Some(Self::Draw),
            'L' => Some(Self::Loss),
            _ => None,
        }
    }
}

/// Match outcome from the fixture's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Tie-break order when two outcomes share the top probability.
    pub const PRIORITY: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Draw => "draw",
            Self::Away => "away",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Home/draw/away probabilities as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prob3 {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Prob3 {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn uniform() -> Self {
        Self {
            home: 1.0 / 3.0,
            draw: 1.0 / 3.0,
            away: 1.0 / 3.0,
        }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn get_mut(&mut self, outcome: Outcome) -> &mut f64 {
        match outcome {
            Outcome::Home => &mut self.home,
            Outcome::Draw => &mut self.draw,
            Outcome::Away => &mut self.away,
        }
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Negative and non-finite components become zero.
    pub fn clamped_non_negative(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            home: fix(self.home),
            draw: fix(self.draw),
            away: fix(self.away),
        }
    }

    /// Scales to sum 1; a zero triple becomes uniform.
    pub fn normalized(self) -> Self {
        let p = self.clamped_non_negative();
        let sum = p.sum();
        if sum <= f64::EPSILON {
            return Self::uniform();
        }
        Self {
            home: p.home / sum,
            draw: p.draw / sum,
            away: p.away / sum,
        }
    }

    pub fn blend(self, other: Prob3, other_weight: f64) -> Self {
        let w = other_weight.clamp(0.0, 1.0);
        Self {
            home: self.home * (1.0 - w) + other.home * w,
            draw: self.draw * (1.0 - w) + other.draw * w,
            away: self.away * (1.0 - w) + other.away * w,
        }
    }

    /// Highest outcome; ties go to the earlier entry of [`Outcome::PRIORITY`].
    pub fn argmax(&self) -> Outcome {
        let mut best = Outcome::PRIORITY[0];
        for outcome in Outcome::PRIORITY.into_iter().skip(1) {
            if self.get(outcome) > self.get(best) {
                best = outcome;
            }
        }
        best
    }

    /// Difference between the largest and second largest component.
    pub fn top_two_gap(&self) -> f64 {
        let mut v = [self.home, self.draw, self.away];
        v.sort_by(|a, b| b.total_cmp(a));
        v[0] - v[1]
    }
}

/// Consecutive identical results ending at the most recent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Streak {
    pub result: Option<MatchResult>,
    pub count: u32,
}

impl Streak {
    pub const NONE: Streak = Streak {
        result: None,
        count: 0,
    };

    pub fn new(result: MatchResult, count: u32) -> Self {
        Self {
            result: Some(result),
            count,
        }
    }

    pub fn is_losing(&self, min: u32) -> bool {
        self.result == Some(MatchResult::Loss) && self.count >= min
    }

    pub fn is_winning(&self, min: u32) -> bool {
        self.result == Some(MatchResult::Win) && self.count >= min
    }
}

impl fmt::Display for Streak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.result {
            Some(r) => write!(f, "{}{}", r.code(), self.count),
            None => f.write_str("-0"),
        }
    }
}

impl FromStr for Streak {
    type Err = AdvisorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(AdvisorError::MalformedStreak(raw.to_string()));
        };
        let rest = chars.as_str();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AdvisorError::MalformedStreak(raw.to_string()));
        }
        let count = rest
            .parse::<u32>()
            .map_err(|_| AdvisorError::MalformedStreak(raw.to_string()))?;
        if first == '-' {
            return if count == 0 {
                Ok(Self::NONE)
            } else {
                Err(AdvisorError::MalformedStreak(raw.to_string()))
            };
        }
        let result =
            MatchResult::from_code(first).ok_or_else(|| AdvisorError::MalformedStreak(raw.to_string()))?;
        Ok(Self::new(result, count))
    }
}

impl TryFrom<String> for Streak {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Streak> for String {
    fn from(value: Streak) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

/// Recency-weighted view of one team's recent matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamFormSnapshot {
    pub team_id: TeamId,
    /// Weighted form index in [0, 100].
    pub score: f64,
    /// Most recent results, oldest first, padded with `?`.
    pub form: String,
    pub trend: Trend,
    pub streak: Streak,
    pub matches_played: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub goals_for: u32,
    pub goals_against: u32,
    pub no_draw_streak: u32,
}

impl TeamFormSnapshot {
    pub fn goals_for_per_match(&self) -> Option<f64> {
        (self.matches_played > 0).then(|| self.goals_for as f64 / self.matches_played as f64)
    }

    pub fn goals_against_per_match(&self) -> Option<f64> {
        (self.matches_played > 0).then(|| self.goals_against as f64 / self.matches_played as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}
