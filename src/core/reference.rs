/// Curated reference lists of human-associated or pathogenic taxa
use crate::bio::taxonomy::{normalize_taxon_name, MatchRank};
use crate::core::table::RawTable;
use crate::{CurationError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RISK_COLUMNS: [&str; 2] = ["risk_level", "risk"];
const SOURCE_COLUMNS: [&str; 3] = ["source", "evidence_source", "reference"];
const NOTES_COLUMNS: [&str; 1] = ["notes"];

/// Rank a reference entry is listed at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceRank {
    Species,
    Genus,
    /// An explicit rank we do not compare at; kept for the audit trail
    Other(String),
}

impl ReferenceRank {
    /// Rank implied by the taxon itself: multi-word names are species
    pub fn infer(taxon: &str) -> Self {
        if taxon.trim().chars().any(char::is_whitespace) {
            Self::Species
        } else {
            Self::Genus
        }
    }

    /// Resolve an explicit rank cell, falling back to inference when blank
    pub fn resolve(rank: &str, taxon: &str) -> Self {
        match rank.trim().to_lowercase().as_str() {
            "" => Self::infer(taxon),
            "species" | "sp" => Self::Species,
            "genus" => Self::Genus,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_match_rank(&self) -> Option<MatchRank> {
        match self {
            Self::Species => Some(MatchRank::Species),
            Self::Genus => Some(MatchRank::Genus),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Species => "species",
            Self::Genus => "genus",
            Self::Other(rank) => rank,
        }
    }
}

impl fmt::Display for ReferenceRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReferenceRank {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of a curated list, with the file and row it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub taxon: String,
    pub rank: ReferenceRank,
    pub taxon_norm: String,
    pub risk_level: String,
    pub source: String,
    pub notes: String,
    pub source_file: PathBuf,
    /// 1-based data row within `source_file`
    pub row_number: usize,
}

/// One loaded list and the slice of `ReferenceSet::entries` it contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    pub path: PathBuf,
    pub entries: Range<usize>,
}

/// All entries from an ordered set of reference files
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub files: Vec<ReferenceFile>,
    pub entries: Vec<ReferenceEntry>,
}

impl ReferenceSet {
    /// Group consecutive entries sharing a `source_file` into one file each
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Self {
        let mut set = Self::default();
        let mut run: Vec<ReferenceEntry> = Vec::new();
        for entry in entries {
            if run.last().is_some_and(|last| last.source_file != entry.source_file) {
                let path = run[0].source_file.clone();
                set.push_file(path, std::mem::take(&mut run));
            }
            run.push(entry);
        }
        if let Some(first) = run.first() {
            let path = first.source_file.clone();
            set.push_file(path, run);
        }
        set
    }

    /// Append one file's entries, recording the index range they occupy
    pub fn push_file(&mut self, path: PathBuf, entries: Vec<ReferenceEntry>) {
        let start = self.entries.len();
        self.entries.extend(entries);
        self.files.push(ReferenceFile {
            path,
            entries: start..self.entries.len(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries contributed by one loaded file, with their global indices
    pub fn entries_from<'a>(
        &'a self,
        file: &'a ReferenceFile,
    ) -> impl Iterator<Item = (usize, &'a ReferenceEntry)> + 'a {
        file.entries
            .clone()
            .filter_map(move |idx| self.entries.get(idx).map(|entry| (idx, entry)))
    }
}

/// `.csv` files are comma separated, anything else is read as TSV
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

fn first_column(table: &RawTable, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| table.column(name))
}

/// Read a single curated reference list
pub fn read_reference_list<P: AsRef<Path>>(path: P, strip_uncultured: bool) -> Result<Vec<ReferenceEntry>> {
    let path = path.as_ref();
    let raw = RawTable::read(path, delimiter_for(path))?;

    let taxon_col = raw.column("taxon").ok_or_else(|| CurationError::Schema {
        path: path.to_path_buf(),
        message: "must contain a 'taxon' column".to_string(),
    })?;
    let rank_col = raw.column("rank");
    let risk_col = first_column(&raw, &RISK_COLUMNS);
    let source_col = first_column(&raw, &SOURCE_COLUMNS);
    let notes_col = first_column(&raw, &NOTES_COLUMNS);

    if rank_col.is_none() {
        debug!("{} has no rank column; inferring rank from taxon names", path.display());
    }

    let mut entries = Vec::with_capacity(raw.rows.len());
    for (idx, cells) in raw.rows.iter().enumerate() {
        let taxon = RawTable::cell(cells, Some(taxon_col));
        let rank = match rank_col {
            Some(col) => ReferenceRank::resolve(RawTable::cell(cells, Some(col)), taxon),
            None => ReferenceRank::infer(taxon),
        };

        if let ReferenceRank::Other(other) = &rank {
            warn!(
                "{} row {}: rank '{}' is neither species nor genus and will not be matched",
                path.display(),
                idx + 1,
                other
            );
        }

        let taxon_norm = normalize_taxon_name(taxon, strip_uncultured);
        if taxon_norm.is_empty() {
            debug!("{} row {}: taxon is empty after normalization", path.display(), idx + 1);
        }

        entries.push(ReferenceEntry {
            taxon: taxon.to_string(),
            rank,
            taxon_norm,
            risk_level: RawTable::cell(cells, risk_col).to_string(),
            source: RawTable::cell(cells, source_col).to_string(),
            notes: RawTable::cell(cells, notes_col).to_string(),
            source_file: path.to_path_buf(),
            row_number: idx + 1,
        });
    }

    info!("Loaded {} reference entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Read every reference list in order and concatenate the entries.
///
/// Entries are not deduplicated across files, so a taxon listed twice keeps
/// both provenances.
pub fn read_reference_lists<P: AsRef<Path>>(paths: &[P], strip_uncultured: bool) -> Result<ReferenceSet> {
    if paths.is_empty() {
        return Err(CurationError::EmptyReferenceSet);
    }

    let mut set = ReferenceSet::default();
    for path in paths {
        let entries = read_reference_list(path, strip_uncultured)?;
        set.push_file(path.as_ref().to_path_buf(), entries);
    }

    info!(
        "Reference set: {} entries from {} file(s)",
        set.len(),
        set.files.len()
    );
    Ok(set)
}
