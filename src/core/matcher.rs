/// Rank-aware matching of taxonomy rows against curated reference entries
use crate::bio::taxonomy::MatchRank;
use crate::core::config::MatchLevel;
use crate::core::reference::{ReferenceEntry, ReferenceSet};
use crate::core::taxonomy_table::{TaxonomyRow, TaxonomyTable};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One (feature, reference entry) association at a single rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Position of the feature in its taxonomy table
    pub row_index: usize,
    pub feature_id: String,
    pub rank: MatchRank,
    /// Normalized name both sides agreed on
    pub matched_name: String,
    /// Position of the entry in the aggregated reference set
    pub reference_index: usize,
    pub reference: ReferenceEntry,
}

/// One line of the per-taxon summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub rank: MatchRank,
    pub matched_name: String,
    pub feature_ids: IndexSet<String>,
    pub risk_levels: IndexSet<String>,
    pub sources: IndexSet<String>,
    pub ref_files: IndexSet<String>,
}

impl SummaryEntry {
    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Ordered by feature, then species before genus, then reference order
    pub records: Vec<MatchRecord>,
    pub total_features: usize,
}

impl MatchResult {
    pub fn matches_for(&self, row_index: usize) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().filter(move |r| r.row_index == row_index)
    }

    /// Number of distinct features with at least one match
    pub fn flagged_features(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.row_index)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn matched_reference_indices(&self) -> HashSet<usize> {
        self.records.iter().map(|r| r.reference_index).collect()
    }

    /// Reference entries that no feature matched, in reference order
    pub fn unmatched_references<'a>(&self, references: &'a ReferenceSet) -> Vec<&'a ReferenceEntry> {
        let matched = self.matched_reference_indices();
        references
            .entries
            .iter()
            .enumerate()
            .filter(|(idx, _)| !matched.contains(idx))
            .map(|(_, entry)| entry)
            .collect()
    }

    /// Group records by (rank, matched name), largest groups first
    pub fn species_summary(&self) -> Vec<SummaryEntry> {
        let mut groups: IndexMap<(MatchRank, String), SummaryEntry> = IndexMap::new();

        for record in &self.records {
            let entry = groups
                .entry((record.rank, record.matched_name.clone()))
                .or_insert_with(|| SummaryEntry {
                    rank: record.rank,
                    matched_name: record.matched_name.clone(),
                    feature_ids: IndexSet::new(),
                    risk_levels: IndexSet::new(),
                    sources: IndexSet::new(),
                    ref_files: IndexSet::new(),
                });

            entry.feature_ids.insert(record.feature_id.clone());
            if !record.reference.risk_level.is_empty() {
                entry.risk_levels.insert(record.reference.risk_level.clone());
            }
            if !record.reference.source.is_empty() {
                entry.sources.insert(record.reference.source.clone());
            }
            entry
                .ref_files
                .insert(record.reference.source_file.display().to_string());
        }

        let mut summary: Vec<SummaryEntry> = groups.into_values().collect();
        summary.sort_by(|a, b| {
            b.n_features()
                .cmp(&a.n_features())
                .then(a.rank.cmp(&b.rank))
                .then_with(|| a.matched_name.cmp(&b.matched_name))
        });
        summary
    }
}

/// Lookup tables from normalized name to reference entries, one per rank
pub struct Matcher<'a> {
    references: &'a ReferenceSet,
    level: MatchLevel,
    species_index: HashMap<&'a str, Vec<usize>>,
    genus_index: HashMap<&'a str, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    pub fn new(references: &'a ReferenceSet, level: MatchLevel) -> Self {
        let mut species_index: HashMap<&'a str, Vec<usize>> = HashMap::new();
        let mut genus_index: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (idx, entry) in references.entries.iter().enumerate() {
            // An empty name must never act as a wildcard
            if entry.taxon_norm.is_empty() {
                continue;
            }
            let index = match entry.rank.as_match_rank() {
                Some(MatchRank::Species) => &mut species_index,
                Some(MatchRank::Genus) => &mut genus_index,
                None => continue,
            };
            index.entry(entry.taxon_norm.as_str()).or_default().push(idx);
        }

        debug!(
            "Indexed {} species names and {} genus names",
            species_index.len(),
            genus_index.len()
        );

        Self {
            references,
            level,
            species_index,
            genus_index,
        }
    }

    pub fn level(&self) -> MatchLevel {
        self.level
    }

    /// Indices of reference entries listed at `rank` under exactly `name`
    pub fn lookup(&self, rank: MatchRank, name: &str) -> &[usize] {
        if name.is_empty() || !self.level.includes(rank) {
            return &[];
        }
        let index = match rank {
            MatchRank::Species => &self.species_index,
            MatchRank::Genus => &self.genus_index,
        };
        index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All matches for one row. Species and genus are checked independently
    /// and both are reported when both hit.
    pub fn match_row(&self, row_index: usize, row: &TaxonomyRow) -> Vec<MatchRecord> {
        let mut records = Vec::new();
        for (rank, name) in [
            (MatchRank::Species, &row.species_norm),
            (MatchRank::Genus, &row.genus_norm),
        ] {
            for &reference_index in self.lookup(rank, name) {
                records.push(MatchRecord {
                    row_index,
                    feature_id: row.feature_id.clone(),
                    rank,
                    matched_name: name.clone(),
                    reference_index,
                    reference: self.references.entries[reference_index].clone(),
                });
            }
        }
        records
    }

    pub fn run(&self, table: &TaxonomyTable) -> MatchResult {
        let records: Vec<MatchRecord> = table
            .rows
            .iter()
            .enumerate()
            .flat_map(|(idx, row)| self.match_row(idx, row))
            .collect();

        let result = MatchResult {
            records,
            total_features: table.len(),
        };

        info!(
            "Flagged {} of {} features ({} match records, level: {})",
            result.flagged_features(),
            result.total_features,
            result.records.len(),
            self.level
        );
        result
    }
}
