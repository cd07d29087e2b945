mod catalog;
mod cli;
mod config;
mod engine;
mod error;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reflex", version, about = "Adaptive rule engine for AI-agent behavioral reminders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a task description and print the rules to inject (dry run)
    Test {
        /// Task description, e.g. "edit some python code"
        #[arg(required = true)]
        task: Vec<String>,
        /// Persist activation and co-activation bookkeeping
        #[arg(long)]
        record: bool,
    },
    /// Record a rule violation from a given source
    Violation {
        /// Rule id, e.g. R4
        rule_id: String,
        /// One of: hook, user, self-check, audit
        source: String,
    },
    /// Advance the decay/dormancy clock
    Advance {
        /// Number of days to advance
        #[arg(long, default_value_t = 1)]
        days: u64,
    },
    /// Check structural invariants of the catalog and state
    Validate,
    /// Show engine statistics and merge candidates
    Stats,
    /// Delete the persisted state (requires confirmation)
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::ReflexConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.logging.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Test { task, record } => {
            cli::test::test(&config, &task.join(" "), record)?;
        }
        Command::Violation { rule_id, source } => {
            cli::violation::violation(&config, &rule_id, &source)?;
        }
        Command::Advance { days } => {
            cli::advance::advance(&config, days)?;
        }
        Command::Validate => {
            cli::validate::validate(&config)?;
        }
        Command::Stats => {
            cli::stats::stats(&config)?;
        }
        Command::Reset => {
            cli::reset::reset(&config)?;
        }
    }

    Ok(())
}
