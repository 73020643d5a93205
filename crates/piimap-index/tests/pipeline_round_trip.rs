//! End-to-end properties of the index pipeline over a temporary dataset:
//! build → write → audit, idempotence, drift detection and coverage.

use std::path::{Path, PathBuf};

use piimap_index::{
    audit_tree, collect_indexes, read_index, verify_against_stored, BuildOptions, DriftOutcome,
    IndexBuilder, INDEX_FILENAME,
};
use piimap_schema::SchemaValidator;

fn record(country: &str, framework: &str, total: usize, cited: usize) -> String {
    let mut yaml = format!("country: {country}\nframework: {framework}\ncategories:\n");
    for i in 0..total {
        yaml.push_str(&format!(
            "  - name: Field {i}\n    type: quasi_identifier\n    required_masking: false\n"
        ));
        if i < cited {
            yaml.push_str("    citations:\n      - national_law: Data Act\n");
        } else {
            yaml.push_str("    citations: []\n");
        }
    }
    yaml
}

/// `<tmp>/data/{gdpr,lgpd,gdpr-legacy}` with a few records each.
fn dataset() -> (tempfile::TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    let files: &[(&str, &str, String)] = &[
        ("gdpr", "germany.yaml", record("Germany", "GDPR", 12, 12)),
        ("gdpr", "france.yaml", record("France", "GDPR", 7, 1)),
        ("gdpr", "invalid.yaml", "country: Invalid\nframework: GDPR\n".to_string()),
        ("lgpd", "brazil.yaml", record("Brazil", "LGPD", 3, 0)),
        ("gdpr-legacy", "italy.yaml", record("Italy", "GDPR", 1, 1)),
    ];
    for (group, file, body) in files {
        let dir = data.join(group);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), body).unwrap();
    }
    (root, data)
}

fn write_all(data: &Path, date: &str) -> usize {
    let validator = SchemaValidator::builtin().unwrap();
    let builder = IndexBuilder::new(&validator, BuildOptions::new(date));
    let run = builder.build_all(data).unwrap();
    assert!(run.failures.is_empty());
    for build in &run.builds {
        builder.write(build).unwrap();
    }
    run.builds.len()
}

#[test]
fn generated_paths_pass_the_audit() {
    let (_root, data) = dataset();
    assert_eq!(write_all(&data, "2025-11-20"), 3);

    let report = audit_tree(&data, INDEX_FILENAME).unwrap();
    assert_eq!(report.indexes, 3);
    assert_eq!(report.entries, 4);
    assert!(report.is_clean(), "{:?}", report.violations);
}

#[test]
fn invalid_record_is_left_out_of_its_index() {
    let (_root, data) = dataset();
    write_all(&data, "2025-11-20");
    let doc = read_index(&data.join("gdpr").join(INDEX_FILENAME)).unwrap();
    assert_eq!(doc.country_names(), vec!["France", "Germany"]);
    assert_eq!(doc.countries[0].status.as_str(), "in-progress");
    assert_eq!(doc.countries[1].status.as_str(), "complete");
}

#[test]
fn rebuilding_an_unchanged_tree_is_idempotent() {
    let (_root, data) = dataset();
    write_all(&data, "2025-11-20");

    let validator = SchemaValidator::builtin().unwrap();
    let builder = IndexBuilder::new(&validator, BuildOptions::new("2026-10-14"));
    for build in builder.build_all(&data).unwrap().builds {
        let stored = build.index_path(INDEX_FILENAME);
        assert!(verify_against_stored(&stored, &build.document).is_match());
    }
}

#[test]
fn adding_a_record_is_detected_as_drift() {
    let (_root, data) = dataset();
    write_all(&data, "2025-11-20");
    std::fs::write(data.join("gdpr").join("austria.yaml"), record("Austria", "GDPR", 2, 0)).unwrap();

    let validator = SchemaValidator::builtin().unwrap();
    let builder = IndexBuilder::new(&validator, BuildOptions::new("2025-11-21"));
    let build = builder.build_group(&data.join("gdpr")).unwrap();
    match verify_against_stored(&build.index_path(INDEX_FILENAME), &build.document) {
        DriftOutcome::Differs(detail) => {
            assert_eq!(detail.stored_count, 2);
            assert_eq!(detail.generated_count, 3);
            assert_eq!(detail.only_generated, vec!["Austria"]);
        }
        other => panic!("expected drift, got {other:?}"),
    }
}

#[test]
fn coverage_keeps_the_later_group_for_a_shared_framework() {
    let (_root, data) = dataset();
    write_all(&data, "2025-11-20");

    let run = collect_indexes(&data, INDEX_FILENAME).unwrap();
    assert!(run.failures.is_empty());
    let coverage = run.coverage();
    // Paths compare by component: "gdpr" < "gdpr-legacy", so the legacy
    // index is folded last and replaces the main one.
    assert_eq!(coverage["GDPR"], vec!["Italy"]);
    assert_eq!(coverage["LGPD"], vec!["Brazil"]);
    assert_eq!(coverage.len(), 2);
}

#[test]
fn deleting_a_record_breaks_the_audit() {
    let (_root, data) = dataset();
    write_all(&data, "2025-11-20");
    std::fs::remove_file(data.join("lgpd").join("brazil.yaml")).unwrap();

    let report = audit_tree(&data, INDEX_FILENAME).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].entry.as_deref(), Some("Brazil"));
}
