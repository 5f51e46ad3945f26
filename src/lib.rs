pub mod bio;
pub mod cli;
pub mod core;
pub mod report;

pub use crate::bio::taxonomy::{extract_rank_from_taxon_string, normalize_taxon_name};
pub use crate::core::{
    matcher::{MatchResult, Matcher},
    reference::{read_reference_list, read_reference_lists, ReferenceEntry},
    taxonomy_table::{read_taxonomy_table, TaxonomyRow, TaxonomyTable},
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Schema error in {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("At least one curated reference list is required")]
    EmptyReferenceSet,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CurationError {
    fn from(err: serde_json::Error) -> Self {
        CurationError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CurationError>;
