use crate::bio::MatchRank;
use crate::CurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    /// Which ranks are compared against the reference lists
    #[serde(default)]
    pub level: MatchLevel,
    /// Drop `uncultured`/`metagenome`/`sp.`/`incertae sedis` before comparing
    #[serde(default = "default_strip_uncultured")]
    pub strip_uncultured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_matches_file")]
    pub matches_file: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
    /// List features without any match in the matches table as well
    #[serde(default)]
    pub include_unmatched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    Species,
    Genus,
    #[default]
    Both,
}

impl MatchLevel {
    pub fn includes(&self, rank: MatchRank) -> bool {
        match self {
            Self::Both => true,
            Self::Species => rank == MatchRank::Species,
            Self::Genus => rank == MatchRank::Genus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Genus => "genus",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "species" => Ok(MatchLevel::Species),
            "genus" => Ok(MatchLevel::Genus),
            "both" => Ok(MatchLevel::Both),
            _ => Err(format!("Unknown match level: {} (expected species, genus or both)", s)),
        }
    }
}

// Default value functions
fn default_strip_uncultured() -> bool { true }
fn default_matches_file() -> String { "pathogen_matches.tsv".to_string() }
fn default_summary_file() -> String { "pathogen_species_summary.tsv".to_string() }
fn default_audit_file() -> String { "pathogen_audit.json".to_string() }

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            level: MatchLevel::default(),
            strip_uncultured: default_strip_uncultured(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            matches_file: default_matches_file(),
            summary_file: default_summary_file(),
            audit_file: default_audit_file(),
            include_unmatched: false,
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, CurationError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CurationError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| CurationError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), CurationError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| CurationError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
