use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use matchday_advisor::analysis::{FixtureRequest, MatchAnalyzer};
use matchday_advisor::config::AdvisorConfig;

struct Args {
    fixture: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    explain: bool,
}

fn parse_args() -> Result<Args> {
    let mut fixture = None;
    let mut config = None;
    let mut json = false;
    let mut explain = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--explain" => explain = true,
            "--config" => {
                let path = it.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => bail!("unknown flag {other}"),
            other => fixture = Some(PathBuf::from(other)),
        }
    }
    let fixture = fixture.context(
        "usage: matchday_advisor <fixture.json> [--json] [--explain] [--config path]",
    )?;
    Ok(Args {
        fixture,
        config,
        json,
        explain,
    })
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    matchday_advisor::init_tracing();

    let args = parse_args()?;
    let cfg = match &args.config {
        Some(path) => AdvisorConfig::from_json_file(path)?,
        None => AdvisorConfig::from_env(),
    };

    let raw = fs::read_to_string(&args.fixture)
        .with_context(|| format!("read fixture {}", args.fixture.display()))?;
    let req: FixtureRequest = serde_json::from_str(&raw).context("invalid fixture json")?;

    let mut analyzer = MatchAnalyzer::new(cfg).context("invalid advisor config")?;

    if args.explain {
        print_trace(&analyzer, &req);
    }

    let record = analyzer.analyze(&req).clone();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).context("serialize analysis")?
        );
    } else {
        println!("{}", analyzer.render_summary(&record));
        for reason in &record.prediction.reasons {
            println!("  - {reason}");
        }
        for tip in &record.tips {
            println!("Tip [{:?}, {}]: {}", tip.kind, tip.confidence, tip.message);
        }
    }
    Ok(())
}

fn print_trace(analyzer: &MatchAnalyzer, req: &FixtureRequest) {
    println!("{:<18} {:>7} {:>7} {:>7}", "step", "home", "draw", "away");
    for (name, p) in analyzer.trace(req) {
        println!(
            "{:<18} {:>7.3} {:>7.3} {:>7.3}",
            name, p.home, p.draw, p.away
        );
    }
    println!();
}
