/// Shared fixtures for pathocurate integration tests
///
/// Each test gets its own temporary directory holding the taxonomy table and
/// reference lists it writes.
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const QIIME_TAXONOMY: &str = "Feature ID\tTaxon\tConfidence
f-staph\tk__Bacteria; p__Firmicutes; c__Bacilli; o__Staphylococcales; f__Staphylococcaceae; g__Staphylococcus; s__Staphylococcus aureus\t0.99
f-rumino\tk__Bacteria; p__Firmicutes; c__Clostridia; o__Lachnospirales; f__Lachnospiraceae; g__[Ruminococcus]; s__[Ruminococcus] gnavus\t0.93
f-bacillus\tk__Bacteria; p__Firmicutes; c__Bacilli; o__Bacillales; f__Bacillaceae; g__Bacillus; s__uncultured bacterium\t0.88
f-unassigned\tUnassigned\t0.42
";

/// Test environment that manages a temporary directory and cleanup
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        TestEnvironment {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get a path within the test environment
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Write `contents` to `relative` and return its path
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }
}
