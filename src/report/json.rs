use crate::core::config::{MatchLevel, MatchingConfig};
use crate::core::matcher::MatchResult;
use crate::core::reference::{ReferenceRank, ReferenceSet};
use crate::core::taxonomy_table::TaxonomyTable;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Run-level record of what was read, how it was compared and what matched
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub taxonomy: TaxonomyAudit,
    pub matching: MatchingAudit,
    pub reference_files: Vec<ReferenceFileAudit>,
    pub unmatched_references: Vec<UnmatchedReference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyAudit {
    pub path: PathBuf,
    pub schema: String,
    pub features: usize,
    pub features_with_species: usize,
    pub features_with_genus: usize,
    pub flagged_features: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchingAudit {
    pub level: MatchLevel,
    pub strip_uncultured: bool,
    pub match_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceFileAudit {
    pub path: PathBuf,
    pub entries: usize,
    pub species_entries: usize,
    pub genus_entries: usize,
    pub other_rank_entries: usize,
    /// Entries from this file that matched at least one feature
    pub matched_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedReference {
    pub taxon: String,
    pub rank: ReferenceRank,
    pub taxon_norm: String,
    pub source_file: PathBuf,
    pub row_number: usize,
}

impl AuditReport {
    pub fn build(
        table: &TaxonomyTable,
        references: &ReferenceSet,
        result: &MatchResult,
        matching: &MatchingConfig,
    ) -> Self {
        let matched = result.matched_reference_indices();

        let reference_files = references
            .files
            .iter()
            .map(|file| {
                let mut audit = ReferenceFileAudit {
                    path: file.path.clone(),
                    entries: 0,
                    species_entries: 0,
                    genus_entries: 0,
                    other_rank_entries: 0,
                    matched_entries: 0,
                };
                for (idx, entry) in references.entries_from(file) {
                    audit.entries += 1;
                    match entry.rank {
                        ReferenceRank::Species => audit.species_entries += 1,
                        ReferenceRank::Genus => audit.genus_entries += 1,
                        ReferenceRank::Other(_) => audit.other_rank_entries += 1,
                    }
                    if matched.contains(&idx) {
                        audit.matched_entries += 1;
                    }
                }
                audit
            })
            .collect();

        let unmatched_references = result
            .unmatched_references(references)
            .into_iter()
            .map(|entry| UnmatchedReference {
                taxon: entry.taxon.clone(),
                rank: entry.rank.clone(),
                taxon_norm: entry.taxon_norm.clone(),
                source_file: entry.source_file.clone(),
                row_number: entry.row_number,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            taxonomy: TaxonomyAudit {
                path: table.path.clone(),
                schema: table.schema.name().to_string(),
                features: table.len(),
                features_with_species: table.rows.iter().filter(|r| r.has_species()).count(),
                features_with_genus: table.rows.iter().filter(|r| r.has_genus()).count(),
                flagged_features: result.flagged_features(),
            },
            matching: MatchingAudit {
                level: matching.level,
                strip_uncultured: matching.strip_uncultured,
                match_records: result.records.len(),
            },
            reference_files,
            unmatched_references,
        }
    }
}

pub fn generate_json_report(report: &AuditReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
