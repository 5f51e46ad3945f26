use clap::Parser;
use colored::*;
use pathocurate::cli::{Cli, Commands};
use pathocurate::CurationError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // PATHOCURATE_LOG sets the default level; RUST_LOG still wins when present
    let log_level = match cli.verbose {
        0 => std::env::var("PATHOCURATE_LOG").unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<CurationError>() {
            Some(CurationError::Config(_)) => 2,
            Some(CurationError::Io(_)) | Some(CurationError::FileIo { .. }) => 3,
            Some(CurationError::Schema { .. })
            | Some(CurationError::Csv(_))
            | Some(CurationError::FileParse { .. }) => 4,
            Some(CurationError::EmptyReferenceSet) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Curate(args) => pathocurate::cli::commands::curate::run(args),
        Commands::Normalize(args) => pathocurate::cli::commands::normalize::run(args),
        Commands::Config(args) => pathocurate::cli::commands::config::run(args),
    }
}
