use crate::cli::output::*;
use crate::core::config::{default_config, load_config, Config, MatchLevel};
use crate::core::matcher::{Matcher, SummaryEntry};
use crate::core::reference::read_reference_lists;
use crate::core::taxonomy_table::read_taxonomy_table;
use crate::report::{text::generate_text_report, AuditReport, ReportGenerator};
use anyhow::Context;
use clap::Args;
use comfy_table::Cell;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args)]
pub struct CurateArgs {
    /// Taxonomy table (QIIME `taxonomy.tsv` or species export TSV)
    #[arg(short, long, value_name = "FILE")]
    pub taxonomy: PathBuf,

    /// Curated reference list (CSV or TSV); repeat for several lists
    #[arg(short, long = "reference", value_name = "FILE")]
    pub references: Vec<PathBuf>,

    /// Directory for the matches, summary and audit files
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Ranks to compare: species, genus or both
    #[arg(short, long)]
    pub level: Option<MatchLevel>,

    /// Keep uncultured/metagenome/sp./incertae sedis qualifiers when comparing
    #[arg(long)]
    pub keep_qualifiers: bool,

    /// Also list features without matches in the matches table
    #[arg(long)]
    pub include_unmatched: bool,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of flagged taxa to show in the terminal summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Print the plain-text report instead of the table view
    #[arg(long)]
    pub plain: bool,
}

/// Config file (or defaults) with command-line flags applied on top
pub fn effective_config(args: &CurateArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => default_config(),
    };
    if let Some(level) = args.level {
        config.matching.level = level;
    }
    if args.keep_qualifiers {
        config.matching.strip_uncultured = false;
    }
    if args.include_unmatched {
        config.output.include_unmatched = true;
    }
    Ok(config)
}

pub fn run(args: CurateArgs) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    let strip = config.matching.strip_uncultured;

    let loading_pb = ProgressBar::new_spinner();
    loading_pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    loading_pb.set_message(format!("Loading {}...", args.taxonomy.display()));
    let table = read_taxonomy_table(&args.taxonomy, strip)?;

    loading_pb.set_message(format!("Loading {} reference list(s)...", args.references.len()));
    let references = read_reference_lists(&args.references, strip)?;
    loading_pb.finish_and_clear();

    let matcher = Matcher::new(&references, config.matching.level);
    let result = matcher.run(&table);
    let summary = result.species_summary();

    let audit = AuditReport::build(&table, &references, &result, &config.matching);
    let paths = ReportGenerator::new(config.output.clone())
        .write_all(&args.outdir, &table, &result, &audit)
        .with_context(|| format!("Failed to write reports to {}", args.outdir.display()))?;

    if args.plain {
        print!("{}", generate_text_report(&audit, &summary, args.top)?);
    } else {
        print_summary(&audit, &summary, args.top);
    }

    success(&format!("Matches written to {}", paths.matches.display()));
    success(&format!("Summary written to {}", paths.summary.display()));
    success(&format!("Audit written to {}", paths.audit.display()));
    Ok(())
}

fn print_summary(audit: &AuditReport, summary: &[SummaryEntry], top: usize) {
    section_header_with_line("Pathogen Curation Summary");

    let taxonomy = &audit.taxonomy;
    tree_item(false, "Taxonomy", Some(&format!("{} ({})", taxonomy.path.display(), taxonomy.schema)));
    tree_item(false, "Features", Some(&format_number(taxonomy.features)));
    tree_item(false, "With species", Some(&format_number(taxonomy.features_with_species)));
    tree_item(false, "With genus", Some(&format_number(taxonomy.features_with_genus)));
    tree_item(false, "Reference lists", Some(&audit.reference_files.len().to_string()));
    tree_item(false, "Match level", Some(audit.matching.level.as_str()));
    tree_item(false, "Match records", Some(&format_number(audit.matching.match_records)));
    tree_item(true, "Flagged features", Some(&format_number(taxonomy.flagged_features)));

    if !audit.unmatched_references.is_empty() {
        warning(&format!(
            "{} reference entries matched no feature (see audit)",
            audit.unmatched_references.len()
        ));
    }

    if summary.is_empty() {
        empty("No features matched the reference lists");
        return;
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Taxon"),
        header_cell("Rank"),
        header_cell("Features"),
        header_cell("Risk"),
        header_cell("Sources"),
    ]);
    for entry in summary.iter().take(top) {
        table.add_row(vec![
            Cell::new(&entry.matched_name),
            Cell::new(entry.rank.as_str()),
            Cell::new(format_number(entry.n_features())),
            Cell::new(entry.risk_levels.iter().cloned().collect::<Vec<_>>().join("; ")),
            Cell::new(entry.sources.iter().cloned().collect::<Vec<_>>().join("; ")),
        ]);
    }
    println!("\n{}", table);

    if summary.len() > top {
        println!("  ... and {} more (see summary file)", summary.len() - top);
    }
}
