/// Header-aware delimited text tables with string-typed cells
use crate::{CurationError, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A delimited file read fully into memory. No type inference is done:
/// every cell is kept as text and missing trailing cells read as `""`.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CurationError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| read_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| read_error(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(
            "Read {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Index of the first column whose trimmed, lower-cased name equals `name`
    pub fn column(&self, name: &str) -> Option<usize> {
        self.find_column(|h| h == name)
    }

    /// Index of the first column whose trimmed, lower-cased name satisfies `pred`
    pub fn find_column<F>(&self, pred: F) -> Option<usize>
    where
        F: Fn(&str) -> bool,
    {
        self.headers
            .iter()
            .position(|h| pred(h.trim().to_lowercase().as_str()))
    }

    /// Cell text, or `""` when the row is short or no column was given
    pub fn cell<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
        column
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn read_error(path: &Path, source: csv::Error) -> CurationError {
    CurationError::FileParse {
        path: path.to_path_buf(),
        source,
    }
}
