use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rayon::prelude::*;
use tracing::info;

use matchday_advisor::analysis::{AnalysisRecord, FixtureRequest, MatchAnalyzer};
use matchday_advisor::calibration::{calibration_bins, empirical_outcome_probs, evaluate_probs};
use matchday_advisor::config::AdvisorConfig;
use matchday_advisor::model::{MatchRecord, Outcome, Prob3};
use matchday_advisor::synthetic::SyntheticLeague;

const DEFAULT_WINDOW: usize = 10;
const WARMUP_MATCHES: usize = 5;

/// Replays a chronological list of matches, predicting each one only from
/// the matches before it, and prints accuracy and calibration metrics.
///
/// usage: backtest <matches.json> [window]
///        backtest --synthetic <seed> [window]
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    matchday_advisor::init_tracing();

    let mut args = std::env::args().skip(1);
    let matches: Vec<MatchRecord> = match args.next().as_deref() {
        Some("--synthetic") => {
            let seed = args
                .next()
                .and_then(|s| s.parse::<u64>().ok())
                .context("--synthetic needs a numeric seed")?;
            SyntheticLeague::new(seed, 20).season(38)
        }
        Some(path) => {
            let raw = fs::read_to_string(PathBuf::from(path))
                .with_context(|| format!("read matches {path}"))?;
            serde_json::from_str(&raw).context("invalid matches json")?
        }
        None => bail!("usage: backtest <matches.json> [window] | --synthetic <seed> [window]"),
    };
    let window = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_WINDOW)
        .max(1);

    let analyzer = MatchAnalyzer::new(AdvisorConfig::from_env()).context("invalid advisor config")?;
    let now = Utc::now();

    let records: Vec<(AnalysisRecord, Outcome)> = (0..matches.len())
        .into_par_iter()
        .filter_map(|i| {
            let m = &matches[i];
            let before = &matches[..i];
            let played = |team| before.iter().filter(|p| p.involves(team)).count();
            if played(m.home_id) < WARMUP_MATCHES || played(m.away_id) < WARMUP_MATCHES {
                return None;
            }
            let mut req = FixtureRequest::from_history(
                before,
                m.home_id,
                m.away_id,
                format!("#{}", m.home_id),
                format!("#{}", m.away_id),
                window,
            );
            req.kickoff = m.date;
            req.odds = m.odds;
            Some((analyzer.evaluate(&req, i as u64, now), m.outcome()))
        })
        .collect();

    if records.is_empty() {
        bail!("no fixtures with at least {WARMUP_MATCHES} prior matches per side");
    }
    info!(fixtures = records.len(), window, "backtest replayed");

    let outcomes: Vec<Outcome> = records.iter().map(|(_, o)| *o).collect();
    let model: Vec<Prob3> = records
        .iter()
        .map(|(r, _)| r.prediction.probabilities)
        .collect();
    let base = empirical_outcome_probs(&outcomes);
    let baseline: Vec<Prob3> = vec![base; outcomes.len()];

    print_metrics("model", &evaluate_probs(&model, &outcomes));
    print_metrics("base rate", &evaluate_probs(&baseline, &outcomes));

    let priced: Vec<(Prob3, Prob3, Outcome)> = records
        .iter()
        .filter_map(|(r, o)| r.odds.map(|odds| (r.prediction.probabilities, odds.no_vig(), *o)))
        .collect();
    if !priced.is_empty() {
        let (m, k, o): (Vec<Prob3>, Vec<Prob3>, Vec<Outcome>) = priced.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut m, mut k, mut o), (pm, pk, po)| {
                m.push(pm);
                k.push(pk);
                o.push(po);
                (m, k, o)
            },
        );
        print_metrics("model (priced)", &evaluate_probs(&m, &o));
        print_metrics("market", &evaluate_probs(&k, &o));
    }

    let mut stakes = 0usize;
    let mut profit = 0.0_f64;
    for (r, o) in &records {
        for bet in &r.value_bets {
            stakes += 1;
            profit += if bet.outcome == *o { bet.price - 1.0 } else { -1.0 };
        }
    }
    if stakes > 0 {
        println!(
            "value bets: {stakes} staked, profit {profit:+.2} units, ROI {:+.1}%",
            profit / stakes as f64 * 100.0
        );
    }

    println!("\nhome-win calibration");
    for bin in calibration_bins(&model, &outcomes, Outcome::Home, 10) {
        if bin.count == 0 {
            continue;
        }
        println!(
            "  {:.1}-{:.1}: n={:<4} predicted {:.3} actual {:.3}",
            bin.bucket_start, bin.bucket_end, bin.count, bin.avg_pred, bin.actual_rate
        );
    }
    Ok(())
}

fn print_metrics(label: &str, m: &matchday_advisor::calibration::Metrics) {
    println!(
        "{label:<16} n={:<5} brier {:.4}  log loss {:.4}  accuracy {:.1}%",
        m.samples,
        m.brier,
        m.log_loss,
        m.accuracy * 100.0
    );
}
