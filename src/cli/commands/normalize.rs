use crate::bio::taxonomy::{normalize_taxon_name, RankLetter};
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Taxon labels or full lineages to normalize
    #[arg(required = true, value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Extract this rank (d, k, p, c, o, f, g, s) from each lineage first
    #[arg(short, long, value_parser = parse_rank_letter)]
    pub rank: Option<RankLetter>,

    /// Keep uncultured/metagenome/sp./incertae sedis qualifiers
    #[arg(long)]
    pub keep_qualifiers: bool,
}

fn parse_rank_letter(s: &str) -> Result<RankLetter, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            RankLetter::from_letter(c).ok_or_else(|| format!("Unknown rank letter: {}", c))
        }
        _ => Err(format!("Expected a single rank letter, got '{}'", s)),
    }
}

pub fn run(args: NormalizeArgs) -> anyhow::Result<()> {
    let strip = !args.keep_qualifiers;

    for label in &args.labels {
        let value = match args.rank {
            Some(rank) => rank.extract(label),
            None => Some(label.as_str()),
        };

        match value {
            Some(v) => {
                let normalized = normalize_taxon_name(v, strip);
                if normalized.is_empty() {
                    println!("{}\t{}", label, "(empty)".dimmed());
                } else {
                    println!("{}\t{}", label, normalized.green());
                }
            }
            None => println!("{}\t{}", label, "(rank not present)".yellow()),
        }
    }

    Ok(())
}
