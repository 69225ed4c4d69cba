//! secretsctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use secrets_cli::cli::{Cli, Commands};
use secrets_cli::commands::{CheckCommand, ShowCommand};
use secrets_cli::output::OutputFormat;
use secrets_cli::{CliError, FileStore};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check(args) => {
            CheckCommand::new().execute(&mut stdout, &format, &args)?;
        }
        Commands::Show(args) => {
            let path = cli.store.ok_or_else(|| {
                CliError::InvalidArgument("show needs --store or SECRETSCTL_STORE".into())
            })?;
            let store = FileStore::open(&path)?;
            ShowCommand::new(&store).execute(&mut stdout, &format, &args)?;
        }
    }

    Ok(())
}
