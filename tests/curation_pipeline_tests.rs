/// End-to-end tests for the curation pipeline: reading a taxonomy table and
/// reference lists from disk, matching, and writing the three reports.
mod common;

use common::{TestEnvironment, QIIME_TAXONOMY};
use pathocurate::bio::MatchRank;
use pathocurate::core::config::{MatchLevel, MatchingConfig, OutputConfig};
use pathocurate::core::reference::ReferenceRank;
use pathocurate::report::{AuditReport, ReportGenerator};
use pathocurate::{read_reference_lists, read_taxonomy_table, CurationError, Matcher};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

const REFS_A: &str = "taxon,risk_level,source
Staphylococcus,high,CDC
[Ruminococcus] gnavus,low,HMP
Bacillus sp.,moderate,internal
";

const REFS_B: &str = "taxon\trank\tnotes
Staphylococcus aureus\tspecies\tMRSA concern
Staphylococcus\tgenus\t
";

fn setup(env: &TestEnvironment) -> (PathBuf, PathBuf, PathBuf) {
    (
        env.write("taxonomy.tsv", QIIME_TAXONOMY),
        env.write("refs_a.csv", REFS_A),
        env.write("refs_b.tsv", REFS_B),
    )
}

#[test]
fn test_species_and_genus_matches_across_lists() {
    let env = TestEnvironment::new();
    let (taxonomy, refs_a, refs_b) = setup(&env);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs_a.clone(), refs_b.clone()], true).unwrap();
    assert_eq!(references.len(), 5);

    let result = Matcher::new(&references, MatchLevel::Both).run(&table);
    assert_eq!(result.flagged_features(), 2);
    assert_eq!(result.records.len(), 4);

    // f-staph: species hit from list B, genus hits from both lists
    let staph: Vec<(MatchRank, PathBuf, usize)> = result
        .matches_for(0)
        .map(|r| (r.rank, r.reference.source_file.clone(), r.reference.row_number))
        .collect();
    assert_eq!(
        staph,
        vec![
            (MatchRank::Species, refs_b.clone(), 1),
            (MatchRank::Genus, refs_a.clone(), 1),
            (MatchRank::Genus, refs_b.clone(), 2),
        ]
    );

    // Bracketed genus annotation on both sides
    let rumino: Vec<_> = result.matches_for(1).collect();
    assert_eq!(rumino.len(), 1);
    assert_eq!(rumino[0].matched_name, "Ruminococcus gnavus");
    assert_eq!(rumino[0].reference.risk_level, "low");
}

#[test]
fn test_rank_inference_keeps_species_entries_off_genus_names() {
    let env = TestEnvironment::new();
    let (taxonomy, refs_a, _) = setup(&env);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs_a], true).unwrap();

    // "Bacillus sp." normalizes to "Bacillus" but is a species-rank entry
    let bacillus = &references.entries[2];
    assert_eq!(bacillus.rank, ReferenceRank::Species);
    assert_eq!(bacillus.taxon_norm, "Bacillus");

    let result = Matcher::new(&references, MatchLevel::Both).run(&table);
    assert_eq!(result.matches_for(2).count(), 0);
}

#[test]
fn test_match_level_genus_only() {
    let env = TestEnvironment::new();
    let (taxonomy, refs_a, refs_b) = setup(&env);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs_a, refs_b], true).unwrap();

    let result = Matcher::new(&references, MatchLevel::Genus).run(&table);
    assert_eq!(result.records.len(), 2);
    assert!(result.records.iter().all(|r| r.rank == MatchRank::Genus));
}

#[test]
fn test_empty_normalized_names_never_match() {
    let env = TestEnvironment::new();
    let taxonomy = env.write(
        "taxonomy.tsv",
        "Feature ID\tTaxon\nf1\tUnassigned\nf2\tk__Bacteria; g__uncultured; s__uncultured\n",
    );
    let refs = env.write("refs.tsv", "taxon\trank\nuncultured\tgenus\n\tspecies\ns__\tspecies\n");

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs], true).unwrap();
    assert!(references.entries.iter().all(|e| e.taxon_norm.is_empty()));

    let result = Matcher::new(&references, MatchLevel::Both).run(&table);
    assert!(result.records.is_empty());
    assert_eq!(result.unmatched_references(&references).len(), 3);
}

#[test]
fn test_species_export_layout() {
    let env = TestEnvironment::new();
    let taxonomy = env.write(
        "species.tsv",
        "FeatureID\tSpecies\tTaxon\tConfidence\n\
         f1\tStaphylococcus aureus\td__Bacteria; g__Staphylococcus; s__aureus\t0.97\n",
    );
    let refs = env.write("refs.tsv", REFS_B);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs], true).unwrap();
    let result = Matcher::new(&references, MatchLevel::Both).run(&table);

    let ranks: Vec<MatchRank> = result.records.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![MatchRank::Species, MatchRank::Genus]);
}

#[test]
fn test_no_reference_lists_is_fatal() {
    let refs: Vec<PathBuf> = Vec::new();
    match read_reference_lists(&refs, true) {
        Err(CurationError::EmptyReferenceSet) => {}
        other => panic!("Expected empty reference set error, got {:?}", other),
    }
}

#[test]
fn test_reference_without_taxon_column_is_fatal() {
    let env = TestEnvironment::new();
    let good = env.write("good.csv", REFS_A);
    let bad = env.write("bad.csv", "organism,risk\nStaphylococcus,high\n");

    let err = read_reference_lists(&[good, bad.clone()], true).unwrap_err();
    assert!(matches!(&err, CurationError::Schema { path, .. } if *path == bad));
    assert!(err.to_string().contains("bad.csv"));
    assert!(err.to_string().contains("taxon"));
}

#[test]
fn test_unrecognized_taxonomy_is_fatal() {
    let env = TestEnvironment::new();
    let taxonomy = env.write("taxonomy.tsv", "OTU\tLineage\nf1\tg__Bacillus\n");

    let err = read_taxonomy_table(&taxonomy, true).unwrap_err();
    assert!(matches!(err, CurationError::Schema { .. }));
    assert!(err.to_string().contains("taxonomy.tsv"));
}

#[test]
fn test_reports_written_to_outdir() {
    let env = TestEnvironment::new();
    let (taxonomy, refs_a, refs_b) = setup(&env);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs_a, refs_b], true).unwrap();
    let result = Matcher::new(&references, MatchLevel::Both).run(&table);
    let audit = AuditReport::build(&table, &references, &result, &MatchingConfig::default());

    let outdir = env.path("out/nested");
    let output = OutputConfig {
        include_unmatched: true,
        ..OutputConfig::default()
    };
    let paths = ReportGenerator::new(output)
        .write_all(&outdir, &table, &result, &audit)
        .unwrap();

    // 4 match lines + 2 unmatched features + header
    let matches = fs::read_to_string(&paths.matches).unwrap();
    assert_eq!(matches.lines().count(), 7);

    let summary = fs::read_to_string(&paths.summary).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("genus\tStaphylococcus\t1\tf-staph\thigh\tCDC\t"));

    let audit_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.audit).unwrap()).unwrap();
    assert_eq!(audit_json["taxonomy"]["schema"], "qiime-export");
    assert_eq!(audit_json["taxonomy"]["features"], 4);
    assert_eq!(audit_json["taxonomy"]["flagged_features"], 2);
    assert_eq!(audit_json["matching"]["match_records"], 4);
    assert_eq!(audit_json["reference_files"].as_array().unwrap().len(), 2);
    assert_eq!(audit_json["reference_files"][0]["matched_entries"], 2);
    assert_eq!(audit_json["reference_files"][1]["matched_entries"], 2);
    assert_eq!(audit_json["unmatched_references"][0]["taxon"], "Bacillus sp.");
}

#[test]
fn test_missing_reference_list_names_file() {
    let env = TestEnvironment::new();
    let good = env.write("good.csv", REFS_A);
    let missing = env.path("pathogens.csv");

    let err = read_reference_lists(&[good, missing.clone()], true).unwrap_err();
    assert!(matches!(&err, CurationError::FileIo { path, .. } if *path == missing));
    assert!(err.to_string().contains("pathogens.csv"));
}

#[test]
fn test_non_utf8_taxonomy_names_file() {
    let env = TestEnvironment::new();
    let taxonomy = env.path("taxonomy.tsv");
    fs::write(&taxonomy, b"Feature ID\tTaxon\nf1\tg__Staphylo\xffcoccus\n").unwrap();

    let err = read_taxonomy_table(&taxonomy, true).unwrap_err();
    assert!(matches!(&err, CurationError::FileParse { path, .. } if *path == taxonomy));
    assert!(err.to_string().contains("taxonomy.tsv"));
}

#[test]
fn test_audit_counts_each_listing_once() {
    let env = TestEnvironment::new();
    let (taxonomy, _, refs_b) = setup(&env);

    let table = read_taxonomy_table(&taxonomy, true).unwrap();
    let references = read_reference_lists(&[refs_b.clone(), refs_b], true).unwrap();
    assert_eq!(references.len(), 4);

    let result = Matcher::new(&references, MatchLevel::Both).run(&table);
    let audit = AuditReport::build(&table, &references, &result, &MatchingConfig::default());

    let counts: Vec<usize> = audit.reference_files.iter().map(|f| f.entries).collect();
    assert_eq!(counts, vec![2, 2]);
    let matched: Vec<usize> = audit.reference_files.iter().map(|f| f.matched_entries).collect();
    assert_eq!(matched, vec![2, 2]);
}
