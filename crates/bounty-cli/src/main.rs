//! # bounty CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bounty_cli::scenario::{run_scenario, RunArgs};
use bounty_cli::serve::{run_serve, ServeArgs};

/// Bounty ledger CLI
///
/// Serves the escrowed-bounty HTTP API or replays scripted scenarios
/// against an in-memory ledger.
#[derive(Parser, Debug)]
#[command(name = "bounty", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API.
    Serve(ServeArgs),

    /// Replay a YAML scenario and print the event journal as JSON.
    Run(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `run` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "bounty CLI starting");

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args, cli.config.as_deref()),
        Commands::Run(args) => run_scenario(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_scenario_path() {
        let cli = Cli::try_parse_from(["bounty", "run", "scenarios/accept.yaml", "--compact"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.scenario, PathBuf::from("scenarios/accept.yaml"));
                assert!(args.compact);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_overrides_and_global_flags() {
        let cli = Cli::try_parse_from([
            "bounty", "-vv", "serve", "--port", "9000", "--host", "127.0.0.1", "--metrics",
            "--config", "bounty.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("bounty.yaml")));
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
                assert!(args.metrics);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn run_requires_a_scenario() {
        assert!(Cli::try_parse_from(["bounty", "run"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["bounty", "serve", "--port", "http"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["bounty"]).is_err());
    }
}
