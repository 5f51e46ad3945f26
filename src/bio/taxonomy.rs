/// Taxon label normalization and rank extraction for QIIME-style lineages
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref SQUARE_BRACKETS_RE: Regex = Regex::new(r"[\[\]]").expect("valid bracket regex");
    static ref RANK_PREFIX_RE: Regex =
        Regex::new(r"(^|\s)[dkpcofgs]__").expect("valid rank prefix regex");
    static ref QUALIFIER_RE: Regex =
        Regex::new(r"(?i)\b(?:uncultured|metagenome|incertae\s+sedis)\b|\bsp\.(?:\s|$)")
            .expect("valid qualifier regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Rank markers used in hierarchical classifier output (`g__Bacillus`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankLetter {
    Domain,
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl RankLetter {
    pub fn letter(&self) -> char {
        match self {
            Self::Domain => 'd',
            Self::Kingdom => 'k',
            Self::Phylum => 'p',
            Self::Class => 'c',
            Self::Order => 'o',
            Self::Family => 'f',
            Self::Genus => 'g',
            Self::Species => 's',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'd' => Some(Self::Domain),
            'k' => Some(Self::Kingdom),
            'p' => Some(Self::Phylum),
            'c' => Some(Self::Class),
            'o' => Some(Self::Order),
            'f' => Some(Self::Family),
            'g' => Some(Self::Genus),
            's' => Some(Self::Species),
            _ => None,
        }
    }

    /// Pull this rank's value out of a full lineage string
    pub fn extract<'a>(&self, taxon: &'a str) -> Option<&'a str> {
        extract_rank_from_taxon_string(taxon, self.letter())
    }
}

/// Ranks at which taxonomy rows are compared against reference lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRank {
    Species,
    Genus,
}

impl MatchRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Genus => "genus",
        }
    }
}

impl fmt::Display for MatchRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchRank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "species" | "sp" => Ok(Self::Species),
            "genus" => Ok(Self::Genus),
            other => Err(format!("Unknown rank: {}", other)),
        }
    }
}

/// Reduce a raw taxon label to the form used for comparisons.
///
/// Square brackets are dropped (their contents kept), rank prefixes such as
/// `g__`/`s__` are removed, and whitespace is collapsed. With
/// `strip_uncultured`, the qualifiers `uncultured`, `metagenome`, `sp.` and
/// `incertae sedis` are removed as whole words, case-insensitively.
///
/// Absent input yields an empty string. The result is a fixpoint: normalizing
/// it again returns the same string.
pub fn normalize_taxon_name<'a>(name: impl Into<Option<&'a str>>, strip_uncultured: bool) -> String {
    let Some(raw) = name.into() else {
        return String::new();
    };

    let mut n = SQUARE_BRACKETS_RE.replace_all(raw.trim(), "").into_owned();

    // Stacked prefixes (`g__s__X`) only expose the inner one after the outer is gone
    while RANK_PREFIX_RE.is_match(&n) {
        n = RANK_PREFIX_RE.replace_all(&n, " ").into_owned();
    }
    n = collapse_whitespace(&n);

    if strip_uncultured {
        while QUALIFIER_RE.is_match(&n) {
            n = collapse_whitespace(&QUALIFIER_RE.replace_all(&n, ""));
        }
    }

    n
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

/// Extract the value of one rank from a `;`-separated lineage.
///
/// Segments are scanned from the end, so when a rank letter appears more than
/// once the last occurrence wins. Returns `None` when no segment carries the
/// `<rank_letter>__` prefix.
pub fn extract_rank_from_taxon_string(taxon: &str, rank_letter: char) -> Option<&str> {
    if taxon.trim().is_empty() {
        return None;
    }

    let prefix = format!("{}__", rank_letter.to_lowercase());
    taxon
        .split(';')
        .map(str::trim)
        .rev()
        .find(|segment| segment.to_lowercase().starts_with(&prefix))
        .and_then(|segment| segment.split_once("__"))
        .map(|(_, value)| value.trim())
}
