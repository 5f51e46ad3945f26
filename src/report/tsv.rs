use crate::core::matcher::{MatchResult, SummaryEntry};
use crate::core::taxonomy_table::TaxonomyTable;
use crate::Result;
use csv::WriterBuilder;
use indexmap::IndexSet;
use std::io::Write;

pub const MATCH_COLUMNS: [&str; 13] = [
    "FeatureID",
    "Taxon",
    "Confidence",
    "Species",
    "Genus",
    "match_rank",
    "matched_name",
    "ref_taxon",
    "risk_level",
    "source",
    "notes",
    "ref_file",
    "ref_row",
];

pub const SUMMARY_COLUMNS: [&str; 7] = [
    "match_rank",
    "matched_name",
    "n_features",
    "feature_ids",
    "risk_levels",
    "sources",
    "ref_files",
];

/// One line per (feature, reference entry) match. With `include_unmatched`,
/// features without matches get a single line with empty match columns.
pub fn write_matches<W: Write>(
    writer: W,
    table: &TaxonomyTable,
    result: &MatchResult,
    include_unmatched: bool,
) -> Result<()> {
    let mut out = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    out.write_record(MATCH_COLUMNS)?;

    // records are ordered by row_index, so one pass over them suffices
    let mut records = result.records.iter().peekable();
    for (idx, row) in table.rows.iter().enumerate() {
        let feature = [
            row.feature_id.as_str(),
            row.taxon.as_str(),
            row.confidence.as_str(),
            row.species.as_str(),
            row.genus.as_str(),
        ];

        let mut any = false;
        while let Some(record) = records.next_if(|r| r.row_index == idx) {
            any = true;
            let reference = &record.reference;
            let ref_file = reference.source_file.display().to_string();
            let ref_row = reference.row_number.to_string();
            out.write_record(feature.iter().copied().chain([
                record.rank.as_str(),
                record.matched_name.as_str(),
                reference.taxon.as_str(),
                reference.risk_level.as_str(),
                reference.source.as_str(),
                reference.notes.as_str(),
                ref_file.as_str(),
                ref_row.as_str(),
            ]))?;
        }

        if !any && include_unmatched {
            out.write_record(feature.iter().copied().chain([""; 8]))?;
        }
    }

    out.flush()?;
    Ok(())
}

fn join(values: &IndexSet<String>, sep: &str) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(sep)
}

pub fn write_summary<W: Write>(writer: W, summary: &[SummaryEntry]) -> Result<()> {
    let mut out = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    out.write_record(SUMMARY_COLUMNS)?;

    for entry in summary {
        out.write_record([
            entry.rank.as_str(),
            entry.matched_name.as_str(),
            entry.n_features().to_string().as_str(),
            join(&entry.feature_ids, ",").as_str(),
            join(&entry.risk_levels, "; ").as_str(),
            join(&entry.sources, "; ").as_str(),
            join(&entry.ref_files, "; ").as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}
