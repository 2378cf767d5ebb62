//! signal-runner: score a market snapshot and print the fundamental signal.
//!
//! Reads a JSON `MarketSnapshot` (any of `onchain`, `sentiment`, `dominance`,
//! `events`) and writes the resulting `FundamentalSignal` as JSON to stdout.
//!
//! Usage:
//!   signal-runner --input snapshot.json
//!   cat snapshot.json | signal-runner --pretty
//!   signal-runner --input snapshot.json --asset-class equity
//!
//! Weights and threshold come from `ANALYZER_*` variables (a `.env` file is
//! honoured).

use analysis_core::MarketSnapshot;
use anyhow::{Context, Result};
use fundamental_analysis::{AnalyzerConfig, AssetClass, FundamentalAnalyzer};
use std::io::Read;

struct Args {
    input: Option<String>,
    asset_class: Option<AssetClass>,
    pretty: bool,
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage:");
        eprintln!("  signal-runner [--input PATH] [--asset-class NAME] [--pretty]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --input PATH        Snapshot JSON file (default: stdin, or '-')");
        eprintln!("  --asset-class NAME  crypto | equity | forex | commodity");
        eprintln!("  --pretty            Pretty-print the signal");
        std::process::exit(0);
    }

    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let asset_class = match value_of("--asset-class") {
        Some(raw) => Some(raw.parse::<AssetClass>()?),
        None => None,
    };

    Ok(Args {
        input: value_of("--input").filter(|p| p != "-"),
        asset_class,
        pretty: args.iter().any(|a| a == "--pretty"),
    })
}

fn read_snapshot(input: Option<&str>) -> Result<MarketSnapshot> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read snapshot from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("snapshot is not a valid MarketSnapshot document")
}

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "signal_runner=info,fundamental_analysis=info".into())
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays a clean JSON document
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = parse_args()?;

    let mut config = AnalyzerConfig::from_env().context("invalid analyzer configuration")?;
    if let Some(asset_class) = args.asset_class {
        config = config.with_asset_class(asset_class);
    }
    let analyzer = FundamentalAnalyzer::new(config)?;
    tracing::info!("Scoring as {:?}", analyzer.asset_class());

    let snapshot = read_snapshot(args.input.as_deref())?;
    tracing::info!(
        "Loaded snapshot (onchain: {}, sentiment: {}, dominance: {}, events: {})",
        snapshot.onchain.is_some(),
        snapshot.sentiment.is_some(),
        snapshot.dominance.is_some(),
        snapshot.events.as_ref().map_or(0, |e| e.len())
    );

    let signal = analyzer.analyze_snapshot(&snapshot);

    let out = if args.pretty {
        serde_json::to_string_pretty(&signal)?
    } else {
        serde_json::to_string(&signal)?
    };
    println!("{}", out);

    Ok(())
}
