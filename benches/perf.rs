use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchday_advisor::analysis::{FixtureRequest, MatchAnalyzer};
use matchday_advisor::form::FormCalculator;
use matchday_advisor::head_to_head::analyze_head_to_head;
use matchday_advisor::model::MatchRecord;
use matchday_advisor::synthetic::SyntheticLeague;
use matchday_advisor::win_prob::{MatchPredictor, PredictionInput};

fn league() -> Vec<MatchRecord> {
    SyntheticLeague::new(2024, 20).season(38)
}

fn fixture(history: &[MatchRecord]) -> FixtureRequest {
    let last = history
        .last()
        .cloned()
        .unwrap_or_else(|| MatchRecord::new(1, 2, 0, 0));
    let mut req = FixtureRequest::from_history(
        &history[..history.len().saturating_sub(1)],
        last.home_id,
        last.away_id,
        "Home",
        "Away",
        10,
    );
    req.odds = last.odds;
    req
}

fn bench_form_compute(c: &mut Criterion) {
    let history = league();
    let req = fixture(&history);
    let calc = FormCalculator::default();
    c.bench_function("form_compute", |b| {
        b.iter(|| {
            let snap = calc.compute(black_box(req.home_id), black_box(&req.home_matches));
            black_box(snap.score);
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let history = league();
    let req = fixture(&history);
    let calc = FormCalculator::default();
    let home = calc.compute(req.home_id, &req.home_matches);
    let away = calc.compute(req.away_id, &req.away_matches);
    let h2h = analyze_head_to_head(req.home_id, req.away_id, &req.head_to_head);
    let input = PredictionInput {
        home_name: &req.home_name,
        away_name: &req.away_name,
        home: &home,
        away: &away,
        h2h: &h2h,
        odds: req.odds.as_ref(),
    };
    let predictor = MatchPredictor::default();
    c.bench_function("predict", |b| {
        b.iter(|| {
            let pred = predictor.predict(black_box(&input));
            black_box(pred.confidence);
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let history = league();
    let req = fixture(&history);
    let mut analyzer = MatchAnalyzer::default();
    c.bench_function("analyze_fixture", |b| {
        b.iter(|| {
            let record = analyzer.analyze(black_box(&req));
            black_box(record.id);
        })
    });
}

fn bench_from_history(c: &mut Criterion) {
    let history = league();
    c.bench_function("fixture_from_history", |b| {
        b.iter(|| {
            let req = fixture(black_box(&history));
            black_box(req.home_matches.len());
        })
    });
}

criterion_group!(
    perf,
    bench_form_compute,
    bench_predict,
    bench_analyze,
    bench_from_history
);
criterion_main!(perf);
