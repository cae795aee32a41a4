//! Agora CLI - Command-line interface for the analysis core
//!
//! Every analysis command reads one JSON document (a file path, or `-` for
//! stdin) and prints one JSON document on stdout. `check` prints the
//! effective configuration as TOML. Logs go to stderr.

use agora_core::{
    render_consensus, render_radar, AnalysisEngine, DriftInput, EngineConfig, Period, VoteSet,
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Agora - consensus, drift and radar analysis for agent answers")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a JSON array of votes into a consensus result
    Votes {
        /// Vote file, or `-` for stdin
        input: PathBuf,

        /// Reveal votes one by one at the configured interval before printing
        #[arg(long)]
        reveal: bool,

        /// Print drawing primitives instead of the result
        #[arg(long)]
        primitives: bool,
    },
    /// Score the drift between two score snapshots
    Drift {
        /// Drift input file, or `-` for stdin
        input: PathBuf,
    },
    /// Project one to three periods onto the radar
    Radar {
        /// Period array file, or `-` for stdin
        input: PathBuf,

        /// Print drawing primitives (grid and polygons) instead of polygons
        #[arg(long)]
        primitives: bool,
    },
    /// Summarize the change between the first and last of 2-3 periods
    Summarize {
        /// Period array file, or `-` for stdin
        input: PathBuf,
    },
    /// Validate the configuration and print it as TOML with defaults filled in
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let engine = AnalysisEngine::new(config).context("Invalid configuration")?;
    info!("Agora v{}", env!("CARGO_PKG_VERSION"));

    let output = run(&engine, cli.command).await?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Initialize logging from `RUST_LOG`, falling back to the verbosity flag.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command and returns the text to print.
///
/// `check` prints the validated configuration as TOML; every other command
/// prints pretty JSON.
async fn run(engine: &AnalysisEngine, command: Commands) -> Result<String> {
    let output = match command {
        Commands::Check => return Ok(engine.config().to_toml_string()?),
        Commands::Votes {
            input,
            reveal,
            primitives,
        } => {
            let votes: VoteSet = read_input(&input)?;
            if reveal {
                reveal_votes(engine, votes.clone()).await?;
            }
            let (result, tally) = engine.evaluate_votes(&votes);
            if primitives {
                let mut target = Vec::new();
                render_consensus(&result, &tally, &mut target);
                serde_json::to_value(target)?
            } else {
                json!({ "result": result, "tally": tally })
            }
        }
        Commands::Drift { input } => {
            let input: DriftInput = read_input(&input)?;
            serde_json::to_value(engine.score_drift(&input)?)?
        }
        Commands::Radar { input, primitives } => {
            let periods: Vec<Period> = read_input(&input)?;
            let outcome = engine.project_radar(&periods)?;
            if primitives {
                let mut target = Vec::new();
                render_radar(&engine.radar_grid(), &outcome.value, &mut target);
                json!({ "primitives": target, "warnings": outcome.warnings })
            } else {
                serde_json::to_value(outcome)?
            }
        }
        Commands::Summarize { input } => {
            let periods: Vec<Period> = read_input(&input)?;
            serde_json::to_value(engine.summarize_change(&periods)?)?
        }
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Reveals votes on stderr, one line per disclosed vote.
async fn reveal_votes(engine: &AnalysisEngine, votes: VoteSet) -> Result<()> {
    let driver = engine.start_reveal(votes)?;
    let mut progress = driver.subscribe();

    while progress.changed().await.is_ok() {
        let step = *progress.borrow_and_update();
        eprintln!("revealed {}/{}", step.revealed, step.total);
    }

    let sequence = driver.finish().await?;
    for vote in sequence.revealed_votes() {
        debug!(%vote, "revealed");
    }
    Ok(())
}

/// Reads and parses a JSON document from a file, or stdin for `-`.
fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["agora", "-vv", "radar", "periods.json", "--primitives"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Radar { primitives: true, .. }));
    }

    #[tokio::test]
    async fn test_votes_command() {
        let file = write_json(
            r#"[
                {"voter": "A", "voted_for": "X"},
                {"voter": "B", "voted_for": "X"},
                {"voter": "C", "voted_for": "Y"}
            ]"#,
        );
        let engine = AnalysisEngine::with_defaults().unwrap();
        let output = run(
            &engine,
            Commands::Votes {
                input: file.path().to_path_buf(),
                reveal: false,
                primitives: false,
            },
        )
        .await
        .unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(output["result"]["winner"], "X");
        assert_eq!(output["result"]["vote_count"], 2);
        assert_eq!(output["tally"]["total"], 3);
    }

    #[tokio::test]
    async fn test_summarize_command() {
        let file = write_json(
            r#"[
                {"label": "Week 1", "timestamp": "2024-05-01T00:00:00Z",
                 "scores": {"pos": 0.25, "norm": 0.25, "left": 0.25, "right": 0.25, "green": 0.25, "emotion": 0.25}},
                {"label": "Week 2", "timestamp": "2024-05-08T00:00:00Z",
                 "scores": {"pos": 0.5, "norm": 0.5, "left": 0.5, "right": 0.5, "green": 0.5, "emotion": 0.5}}
            ]"#,
        );
        let engine = AnalysisEngine::with_defaults().unwrap();
        let output = run(
            &engine,
            Commands::Summarize {
                input: file.path().to_path_buf(),
            },
        )
        .await
        .unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(output["value"]["label"], "significant_increase");
        assert_eq!(output["value"]["to_label"], "Week 2");
    }

    #[tokio::test]
    async fn test_check_prints_effective_config() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let output = run(&engine, Commands::Check).await.unwrap();

        let parsed = EngineConfig::from_toml_str(&output).unwrap();
        assert_eq!(&parsed, engine.config());
        assert!(output.contains("tie_break = \"first_to_reach_max\""));
    }

    #[test]
    fn test_read_input_reports_bad_json() {
        let file = write_json("{ not json");
        let err = read_input::<VoteSet>(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}
