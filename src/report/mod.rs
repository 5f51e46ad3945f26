use crate::core::config::OutputConfig;
use crate::core::matcher::MatchResult;
use crate::core::taxonomy_table::TaxonomyTable;
use crate::Result;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod json;
pub mod text;
pub mod tsv;

pub use json::AuditReport;

/// Where each output of a run was written
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub matches: PathBuf,
    pub summary: PathBuf,
    pub audit: PathBuf,
}

pub struct ReportGenerator {
    options: OutputConfig,
}

impl ReportGenerator {
    pub fn new(options: OutputConfig) -> Self {
        Self { options }
    }

    pub fn paths(&self, outdir: &Path) -> ReportPaths {
        ReportPaths {
            matches: outdir.join(&self.options.matches_file),
            summary: outdir.join(&self.options.summary_file),
            audit: outdir.join(&self.options.audit_file),
        }
    }

    /// Write the matches table, taxon summary and audit JSON into `outdir`
    pub fn write_all(
        &self,
        outdir: &Path,
        table: &TaxonomyTable,
        result: &MatchResult,
        audit: &AuditReport,
    ) -> Result<ReportPaths> {
        fs::create_dir_all(outdir)?;
        let paths = self.paths(outdir);

        tsv::write_matches(
            BufWriter::new(File::create(&paths.matches)?),
            table,
            result,
            self.options.include_unmatched,
        )?;
        tsv::write_summary(
            BufWriter::new(File::create(&paths.summary)?),
            &result.species_summary(),
        )?;
        fs::write(&paths.audit, json::generate_json_report(audit)?)?;

        info!(
            "Wrote {}, {} and {}",
            paths.matches.display(),
            paths.summary.display(),
            paths.audit.display()
        );
        Ok(paths)
    }
}
