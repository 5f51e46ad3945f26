use crate::core::matcher::SummaryEntry;
use crate::report::json::AuditReport;
use anyhow::Result;
use std::fmt::Write;

pub fn generate_text_report(audit: &AuditReport, summary: &[SummaryEntry], top: usize) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "Pathogen Curation Report")?;
    writeln!(&mut output, "========================")?;
    writeln!(&mut output)?;

    let taxonomy = &audit.taxonomy;
    writeln!(
        &mut output,
        "Taxonomy: {} ({}, {} features)",
        taxonomy.path.display(),
        taxonomy.schema,
        taxonomy.features
    )?;
    writeln!(
        &mut output,
        "Matching: level={}, strip_uncultured={}",
        audit.matching.level, audit.matching.strip_uncultured
    )?;
    writeln!(&mut output)?;

    writeln!(&mut output, "Reference Lists")?;
    writeln!(&mut output, "---------------")?;
    for file in &audit.reference_files {
        writeln!(
            &mut output,
            "- {}: {} entries ({} species, {} genus, {} other), {} matched",
            file.path.display(),
            file.entries,
            file.species_entries,
            file.genus_entries,
            file.other_rank_entries,
            file.matched_entries
        )?;
    }
    writeln!(&mut output)?;

    writeln!(&mut output, "Summary")?;
    writeln!(&mut output, "-------")?;
    writeln!(&mut output, "- With species:  {:6} features", taxonomy.features_with_species)?;
    writeln!(&mut output, "- With genus:    {:6} features", taxonomy.features_with_genus)?;
    writeln!(&mut output, "- Flagged:       {:6} features", taxonomy.flagged_features)?;
    writeln!(&mut output, "- Match records: {:6}", audit.matching.match_records)?;
    writeln!(
        &mut output,
        "- Unmatched reference entries: {}",
        audit.unmatched_references.len()
    )?;
    writeln!(&mut output)?;

    if !summary.is_empty() {
        writeln!(&mut output, "Flagged Taxa (Top {})", top)?;
        writeln!(&mut output, "-----------------")?;
        for entry in summary.iter().take(top) {
            let risk = entry
                .risk_levels
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            writeln!(
                &mut output,
                "  {} [{}] {} feature(s){}",
                entry.matched_name,
                entry.rank,
                entry.n_features(),
                if risk.is_empty() {
                    String::new()
                } else {
                    format!(", risk: {}", risk)
                }
            )?;
        }
        if summary.len() > top {
            writeln!(&mut output, "  ... and {} more", summary.len() - top)?;
        }
    }

    Ok(output)
}
