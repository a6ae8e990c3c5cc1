//! Arena CLI - watch simulated tournament debates in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Show the demo bracket
//! arena bracket
//!
//! # Watch the first semi final, ten times faster than real time
//! arena run --match-id 5 --time-scale 10
//!
//! # Join in: type comments, or `/like team4`
//! arena run --match-id 6 --interactive
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{bracket, run};

#[derive(Parser)]
#[command(
    name = "arena",
    version,
    about = "Debate arena - live tournament debate simulator"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tournament bracket
    #[command(name = "bracket")]
    Bracket(bracket::BracketArgs),

    /// Run one match live
    #[command(name = "run")]
    Run(run::RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Bracket(args) => bracket::run(args),
        Commands::Run(args) => run::run(args).await,
    }
}

/// Log to stderr so the transcript on stdout stays clean.
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from(["arena", "-vv", "run", "--match-id", "6", "--fast", "--seed", "3"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn bracket_is_the_default_listing() {
        let cli = Cli::try_parse_from(["arena", "bracket", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Bracket(_)));
    }
}
