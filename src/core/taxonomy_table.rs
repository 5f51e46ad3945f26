/// Reader for classifier taxonomy tables (`taxonomy.tsv` and species exports)
use crate::bio::taxonomy::{normalize_taxon_name, RankLetter};
use crate::core::table::RawTable;
use crate::{CurationError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Column layout of a taxonomy table, detected from its header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomySchema {
    /// `Feature ID`, `Taxon`, optional `Confidence` (from `qiime tools export`)
    QiimeExport {
        feature_id: usize,
        taxon: usize,
        confidence: Option<usize>,
    },
    /// `FeatureID`, `Species`, `Taxon`, optional `Confidence` (species-only export)
    SpeciesExport {
        feature_id: usize,
        taxon: usize,
        species: Option<usize>,
        confidence: Option<usize>,
    },
    Unrecognized,
}

impl TaxonomySchema {
    /// Column names are compared lower-cased with surrounding whitespace removed
    pub fn detect(table: &RawTable) -> Self {
        let taxon = table.column("taxon");
        let confidence = table.find_column(|h| h.starts_with("confidence"));

        match (table.column("feature id"), table.column("featureid"), taxon) {
            (Some(feature_id), _, Some(taxon)) => Self::QiimeExport {
                feature_id,
                taxon,
                confidence,
            },
            (None, Some(feature_id), Some(taxon)) => Self::SpeciesExport {
                feature_id,
                taxon,
                species: table.column("species"),
                confidence,
            },
            _ => Self::Unrecognized,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::QiimeExport { .. } => "qiime-export",
            Self::SpeciesExport { .. } => "species-export",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// One classified feature with its derived species/genus fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyRow {
    pub feature_id: String,
    pub taxon: String,
    pub confidence: String,
    pub species: String,
    pub genus: String,
    pub species_norm: String,
    pub genus_norm: String,
}

impl TaxonomyRow {
    /// Build a row from raw cells. `species` is `None` when the table has no
    /// species column, in which case it is read from the lineage.
    pub fn new(
        feature_id: &str,
        taxon: &str,
        confidence: &str,
        species: Option<&str>,
        strip_uncultured: bool,
    ) -> Self {
        let species = match species {
            Some(s) => s.to_string(),
            None => RankLetter::Species.extract(taxon).unwrap_or("").to_string(),
        };
        let genus = RankLetter::Genus.extract(taxon).unwrap_or("").to_string();

        Self {
            feature_id: feature_id.to_string(),
            taxon: taxon.to_string(),
            confidence: confidence.to_string(),
            species_norm: normalize_taxon_name(species.as_str(), strip_uncultured),
            genus_norm: normalize_taxon_name(genus.as_str(), strip_uncultured),
            species,
            genus,
        }
    }

    pub fn has_species(&self) -> bool {
        !self.species_norm.is_empty()
    }

    pub fn has_genus(&self) -> bool {
        !self.genus_norm.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TaxonomyTable {
    pub path: PathBuf,
    pub schema: TaxonomySchema,
    pub rows: Vec<TaxonomyRow>,
}

impl TaxonomyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a tab-separated taxonomy table in either supported layout
pub fn read_taxonomy_table<P: AsRef<Path>>(path: P, strip_uncultured: bool) -> Result<TaxonomyTable> {
    let raw = RawTable::read(path.as_ref(), b'\t')?;
    let schema = TaxonomySchema::detect(&raw);

    let (feature_col, taxon_col, species_col, confidence_col) = match schema {
        TaxonomySchema::QiimeExport {
            feature_id,
            taxon,
            confidence,
        } => (feature_id, taxon, None, confidence),
        TaxonomySchema::SpeciesExport {
            feature_id,
            taxon,
            species,
            confidence,
        } => {
            if species.is_none() {
                warn!(
                    "{} has no Species column; deriving species from Taxon",
                    raw.path.display()
                );
            }
            (feature_id, taxon, species, confidence)
        }
        TaxonomySchema::Unrecognized => {
            return Err(CurationError::Schema {
                path: raw.path,
                message: "unrecognized taxonomy columns; expected `Feature ID`/`Taxon` \
                          (QIIME export) or `FeatureID`/`Taxon` (species export)"
                    .to_string(),
            });
        }
    };

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(raw.rows.len());
    for cells in &raw.rows {
        let species = species_col.map(|idx| RawTable::cell(cells, Some(idx)));
        let row = TaxonomyRow::new(
            RawTable::cell(cells, Some(feature_col)),
            RawTable::cell(cells, Some(taxon_col)),
            RawTable::cell(cells, confidence_col),
            species,
            strip_uncultured,
        );

        if !seen.insert(row.feature_id.clone()) {
            warn!("Duplicate feature ID {} in {}", row.feature_id, raw.path.display());
        }
        if !row.has_species() && !row.has_genus() {
            debug!("Feature {} has no species or genus assignment", row.feature_id);
        }
        rows.push(row);
    }

    info!(
        "Loaded {} features from {} ({})",
        rows.len(),
        raw.path.display(),
        schema.name()
    );

    Ok(TaxonomyTable {
        path: raw.path,
        schema,
        rows,
    })
}
