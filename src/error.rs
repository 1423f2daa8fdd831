use thiserror::Error;

use crate::model::Outcome;

/// Errors raised by the advisor library. Sparse or empty histories are not
/// errors; they degrade to neutral defaults instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("invalid {outcome} odds {price}: decimal odds must be finite and above 1.0")]
    InvalidOdds { outcome: Outcome, price: f64 },

    #[error("malformed streak descriptor '{0}'")]
    MalformedStreak(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
