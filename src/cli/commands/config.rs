use crate::cli::output::success;
use crate::core::config::{default_config, save_config};
use anyhow::bail;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Where to write the configuration
    #[arg(short, long, value_name = "FILE", default_value = "pathocurate.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    save_config(&args.output, &default_config())?;
    success(&format!("Default configuration written to {}", args.output.display()));
    Ok(())
}
