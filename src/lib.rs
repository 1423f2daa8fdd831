pub mod advice;
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod draw_regression;
pub mod error;
pub mod form;
pub mod head_to_head;
pub mod model;
pub mod odds;
pub mod over_under;
pub mod synthetic;
pub mod tendency;
pub mod tips;
pub mod value_bet;
pub mod win_prob;

pub use analysis::{AnalysisRecord, FixtureRequest, MatchAnalyzer};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, ConfigError};
pub use model::{MatchRecord, MatchResult, Outcome, Prob3, TeamFormSnapshot, TeamId};
pub use odds::OddsTriple;
pub use win_prob::{MatchPredictor, OutcomePrediction, PredictionInput};

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). Safe to call more than once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
