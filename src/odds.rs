use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::model::{Outcome, Prob3};

/// Decimal home/draw/away prices. Every price is finite and above 1.0, so
/// inverting one can never divide by zero or go negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOdds")]
pub struct OddsTriple {
    home: f64,
    draw: f64,
    away: f64,
}

#[derive(Deserialize)]
struct RawOdds {
    home: f64,
    draw: f64,
    away: f64,
}

impl TryFrom<RawOdds> for OddsTriple {
    type Error = AdvisorError;

    fn try_from(raw: RawOdds) -> Result<Self, Self::Error> {
        OddsTriple::new(raw.home, raw.draw, raw.away)
    }
}

impl OddsTriple {
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self, AdvisorError> {
        for (outcome, price) in [
            (Outcome::Home, home),
            (Outcome::Draw, draw),
            (Outcome::Away, away),
        ] {
            if !price.is_finite() || price <= 1.0 {
                return Err(AdvisorError::InvalidOdds { outcome, price });
            }
        }
        Ok(Self { home, draw, away })
    }

    pub fn price(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Raw implied probabilities (1 / price); they sum above 1 by the margin.
    pub fn implied(&self) -> Prob3 {
        Prob3::new(1.0 / self.home, 1.0 / self.draw, 1.0 / self.away)
    }

    /// Implied probabilities with the bookmaker margin removed.
    pub fn no_vig(&self) -> Prob3 {
        self.implied().normalized()
    }

    pub fn overround(&self) -> f64 {
        self.implied().sum() - 1.0
    }
}

/// EV of a unit stake: `probability * price - 1`.
pub fn expected_value(probability: f64, price: f64) -> f64 {
    probability * price - 1.0
}
