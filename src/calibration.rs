use serde::Serialize;

use crate::model::{Outcome, Prob3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

impl Metrics {
    fn empty() -> Self {
        Self {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

/// Frequencies of each outcome; uniform when there is nothing to count.
pub fn empirical_outcome_probs(outcomes: &[Outcome]) -> Prob3 {
    if outcomes.is_empty() {
        return Prob3::uniform();
    }
    let n = outcomes.len() as f64;
    let share = |want: Outcome| outcomes.iter().filter(|o| **o == want).count() as f64 / n;
    Prob3::new(share(Outcome::Home), share(Outcome::Draw), share(Outcome::Away))
}

/// Brier score, log loss and hit rate. Mismatched or empty inputs give an
/// empty result.
pub fn evaluate_probs(predictions: &[Prob3], outcomes: &[Outcome]) -> Metrics {
    if predictions.is_empty() || predictions.len() != outcomes.len() {
        return Metrics::empty();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, outcome) in predictions.iter().zip(outcomes) {
        let y = one_hot(*outcome);
        brier_sum +=
            (p.home - y.home).powi(2) + (p.draw - y.draw).powi(2) + (p.away - y.away).powi(2);
        log_loss_sum += -p.get(*outcome).clamp(1e-12, 1.0).ln();
        if p.argmax() == *outcome {
            correct += 1;
        }
    }

    let n = predictions.len() as f64;
    Metrics {
        samples: predictions.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

/// Reliability table for one outcome class.
pub fn calibration_bins(
    predictions: &[Prob3],
    outcomes: &[Outcome],
    class: Outcome,
    bins: usize,
) -> Vec<CalibrationBin> {
    let bins = bins.max(2);
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut actual_sum = vec![0.0_f64; bins];

    for (p, outcome) in predictions.iter().zip(outcomes) {
        let class_prob = p.get(class).clamp(0.0, 1.0);
        let idx = ((class_prob * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += class_prob;
        if *outcome == class {
            actual_sum[idx] += 1.0;
        }
    }

    (0..bins)
        .map(|i| {
            let count = counts[i];
            let (avg_pred, actual_rate) = if count > 0 {
                (pred_sum[i] / count as f64, actual_sum[i] / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                bucket_start: i as f64 / bins as f64,
                bucket_end: (i + 1) as f64 / bins as f64,
                count,
                avg_pred,
                actual_rate,
            }
        })
        .collect()
}

fn one_hot(outcome: Outcome) -> Prob3 {
    let mut p = Prob3::new(0.0, 0.0, 0.0);
    *p.get_mut(outcome) = 1.0;
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_have_zero_brier() {
        let preds = vec![
            Prob3::new(1.0, 0.0, 0.0),
            Prob3::new(0.0, 1.0, 0.0),
            Prob3::new(0.0, 0.0, 1.0),
        ];
        let outcomes = vec![Outcome::Home, Outcome::Draw, Outcome::Away];
        let m = evaluate_probs(&preds, &outcomes);
        assert_eq!(m.samples, 3);
        assert!(m.brier < 1e-12);
        assert_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn uniform_predictions_score_two_thirds() {
        let preds = vec![Prob3::uniform(); 4];
        let outcomes = vec![Outcome::Home, Outcome::Away, Outcome::Draw, Outcome::Home];
        let m = evaluate_probs(&preds, &outcomes);
        assert!((m.brier - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.log_loss - 3.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_are_empty() {
        let m = evaluate_probs(&[Prob3::uniform()], &[]);
        assert_eq!(m.samples, 0);
    }

    #[test]
    fn bins_cover_unit_interval() {
        let preds = vec![Prob3::new(0.05, 0.5, 0.45), Prob3::new(0.95, 0.05, 0.0)];
        let outcomes = vec![Outcome::Draw, Outcome::Home];
        let bins = calibration_bins(&preds, &outcomes, Outcome::Home, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[9].actual_rate, 1.0);
        assert_eq!(bins[0].actual_rate, 0.0);
    }

    #[test]
    fn empirical_counts_outcomes() {
        let p = empirical_outcome_probs(&[Outcome::Home, Outcome::Home, Outcome::Draw, Outcome::Away]);
        assert_eq!(p, Prob3::new(0.5, 0.25, 0.25));
    }
}
