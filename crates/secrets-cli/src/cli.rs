//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// secretsctl - inspect secret configuration and resolve secrets.
#[derive(Parser, Debug, Clone)]
#[command(name = "secretsctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(
        short,
        long,
        value_enum,
        env = "SECRETSCTL_FORMAT",
        default_value_t = Format::Table,
        global = true
    )]
    pub format: Format,

    /// JSON document mapping secret paths to secret objects.
    #[arg(short, long, env = "SECRETSCTL_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse and validate a secrets file.
    Check(CheckArgs),

    /// Resolve one secret from the store.
    ///
    /// Values are masked unless `--reveal` is given.
    Show(ShowArgs),
}

/// Arguments for the check command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Secrets file to read.
    pub config: PathBuf,

    /// Also check region names against the store's grammar.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the show command.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Secrets file to read.
    pub config: PathBuf,

    /// Name of the secret block to resolve.
    pub id: String,

    /// Print only the value stored under this key.
    #[arg(short, long)]
    pub key: Option<String>,

    /// Print values in clear text.
    #[arg(long)]
    pub reveal: bool,

    /// Give up on the store after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
