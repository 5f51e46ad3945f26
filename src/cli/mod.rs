pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pathocurate",
    version,
    about = "Flag human-associated and pathogenic taxa in QIIME taxonomy output",
    long_about = "Pathocurate cross-references a QIIME taxonomy table against one or more curated \
                  reference lists, matching at species and genus level after normalizing rank \
                  prefixes, brackets and qualifiers. No online lookups are made: all reference \
                  knowledge comes from the lists you provide."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a taxonomy table against curated reference lists
    Curate(commands::curate::CurateArgs),

    /// Show the normalized form of taxon labels
    Normalize(commands::normalize::NormalizeArgs),

    /// Write a default configuration file
    Config(commands::config::ConfigArgs),
}
