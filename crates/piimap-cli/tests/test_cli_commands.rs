//! # CLI Command Tests
//!
//! Drives the subcommand handlers against a temporary repository with a
//! `data/` tree, checking exit codes and the files they write. These are
//! the same code paths `piimap <command>` dispatches to.

use std::path::Path;

use piimap_cli::audit_paths::{run_audit_paths, AuditPathsArgs};
use piimap_cli::audit_types::{run_audit_types, AuditTypesArgs};
use piimap_cli::config::PipelineConfig;
use piimap_cli::coverage::{run_coverage, CoverageArgs};
use piimap_cli::generate_index::{run_generate_index, GenerateIndexArgs};
use piimap_cli::lint::{run_lint, LintArgs};
use piimap_cli::validate::{run_validate, ValidateArgs};
use piimap_cli::{EXIT_OK, EXIT_VIOLATIONS};
use piimap_index::read_index;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GERMANY: &str = r#"country: Germany
framework: GDPR
categories:
  - name: Email address
    type: direct_identifier
    required_masking: true
    tags: [pii]
    citations:
      - regulation: GDPR
        article: "4(1)"
"#;

const FRANCE: &str = r#"country: France
framework: GDPR
categories:
  - name: Health data
    type: special_category
    required_masking: true
    tags: [phi, sensitive]
    citations:
      - national_law: Loi Informatique et Libertés
"#;

const CHINA: &str = r#"country: China
framework: PIPL
categories:
  - name: Biometric data
    type: special_category
    subtype: biometric
    required_masking: true
    tags: [biometric, sensitive]
    citations:
      - authority: CAC
"#;

const ARTICLE_ONLY: &str = r#"country: Nowhere
framework: GDPR
categories:
  - name: Email address
    type: direct_identifier
    required_masking: true
    tags: [pii]
    citations:
      - article: "5"
"#;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn repo() -> (tempfile::TempDir, PipelineConfig) {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "data/gdpr/germany.yaml", GERMANY);
    write(root.path(), "data/gdpr/france.yaml", FRANCE);
    write(root.path(), "data/pipl/china.yaml", CHINA);
    let config = PipelineConfig::defaults(root.path());
    (root, config)
}

fn generate(config: &PipelineConfig) -> u8 {
    run_generate_index(&GenerateIndexArgs::default(), config).unwrap()
}

fn verify(config: &PipelineConfig) -> u8 {
    let args = GenerateIndexArgs {
        verify: true,
        ..Default::default()
    };
    run_generate_index(&args, config).unwrap()
}

// ---------------------------------------------------------------------------
// 1. validate
// ---------------------------------------------------------------------------

#[test]
fn validate_clean_tree_exits_zero() {
    let (_root, config) = repo();
    assert_eq!(run_validate(&ValidateArgs::default(), &config).unwrap(), EXIT_OK);
}

#[test]
fn validate_rejects_citation_without_legal_source() {
    let (root, config) = repo();
    write(root.path(), "data/gdpr/nowhere.yaml", ARTICLE_ONLY);
    assert_eq!(
        run_validate(&ValidateArgs::default(), &config).unwrap(),
        EXIT_VIOLATIONS
    );

    let single = ValidateArgs {
        path: Some(root.path().join("data/gdpr/germany.yaml")),
    };
    assert_eq!(run_validate(&single, &config).unwrap(), EXIT_OK);
}

#[test]
fn missing_data_root_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let config = PipelineConfig::defaults(root.path());
    assert!(run_validate(&ValidateArgs::default(), &config).is_err());
    assert!(run_generate_index(&GenerateIndexArgs::default(), &config).is_err());
    assert!(run_audit_paths(&AuditPathsArgs::default(), &config).is_err());
    assert!(run_coverage(&CoverageArgs::default(), &config).is_err());
}

// ---------------------------------------------------------------------------
// 2. lint
// ---------------------------------------------------------------------------

#[test]
fn lint_warnings_only_fail_in_strict_mode() {
    let (root, config) = repo();
    write(
        root.path(),
        "data/pipl/hong-kong.yaml",
        "country: Hong Kong\nframework: PIPL\ncategories:\n  - type: quasi_identifier\n    name: IP address\n    required_masking: false\n    citations:\n      - authority: PCPD\n",
    );
    assert_eq!(run_lint(&LintArgs::default(), &config).unwrap(), EXIT_OK);
    assert_eq!(
        run_lint(&LintArgs { strict: true }, &config).unwrap(),
        EXIT_VIOLATIONS
    );
}

#[test]
fn lint_citation_authority_is_an_error() {
    let (root, config) = repo();
    write(root.path(), "data/gdpr/nowhere.yaml", ARTICLE_ONLY);
    assert_eq!(run_lint(&LintArgs::default(), &config).unwrap(), EXIT_VIOLATIONS);
}

// ---------------------------------------------------------------------------
// 3. generate-index
// ---------------------------------------------------------------------------

#[test]
fn generate_then_verify_then_audit_is_clean() {
    let (root, config) = repo();
    assert_eq!(generate(&config), EXIT_OK);

    let gdpr = read_index(&root.path().join("data/gdpr/country-index.json")).unwrap();
    assert_eq!(gdpr.framework, "GDPR");
    assert_eq!(gdpr.region, "EU + EEA");
    assert_eq!(gdpr.country_names(), vec!["France", "Germany"]);
    assert_eq!(gdpr.countries[1].path, "data/gdpr/germany.yaml");

    let pipl = read_index(&root.path().join("data/pipl/country-index.json")).unwrap();
    assert_eq!(pipl.region, "China");

    assert_eq!(verify(&config), EXIT_OK);
    assert_eq!(
        run_audit_paths(&AuditPathsArgs::default(), &config).unwrap(),
        EXIT_OK
    );
}

#[test]
fn verify_without_stored_indexes_fails() {
    let (_root, config) = repo();
    assert_eq!(verify(&config), EXIT_VIOLATIONS);
}

#[test]
fn verify_detects_a_new_record() {
    let (root, config) = repo();
    generate(&config);
    write(
        root.path(),
        "data/gdpr/austria.yaml",
        &GERMANY.replace("Germany", "Austria"),
    );
    assert_eq!(verify(&config), EXIT_VIOLATIONS);
}

#[test]
fn dry_run_writes_nothing() {
    let (root, config) = repo();
    let args = GenerateIndexArgs {
        dry_run: true,
        ..Default::default()
    };
    assert_eq!(run_generate_index(&args, &config).unwrap(), EXIT_OK);
    assert!(!root.path().join("data/gdpr/country-index.json").exists());
}

#[test]
fn single_group_with_framework_override() {
    let (root, config) = repo();
    let args = GenerateIndexArgs {
        group: Some("gdpr".to_string()),
        framework_name: Some("UK GDPR".to_string()),
        ..Default::default()
    };
    assert_eq!(run_generate_index(&args, &config).unwrap(), EXIT_OK);
    let doc = read_index(&root.path().join("data/gdpr/country-index.json")).unwrap();
    assert_eq!(doc.framework, "UK GDPR");
    assert_eq!(doc.region, "United Kingdom");
    assert!(!root.path().join("data/pipl/country-index.json").exists());
}

#[test]
fn unknown_group_is_fatal() {
    let (_root, config) = repo();
    let args = GenerateIndexArgs {
        group: Some("nope".to_string()),
        ..Default::default()
    };
    assert!(run_generate_index(&args, &config).is_err());
}

#[test]
fn group_without_valid_records_fails_but_others_are_written() {
    let (root, config) = repo();
    write(root.path(), "data/broken/x.yaml", "country: X\n");
    assert_eq!(generate(&config), EXIT_VIOLATIONS);
    assert!(root.path().join("data/gdpr/country-index.json").exists());
    assert!(!root.path().join("data/broken/country-index.json").exists());
}

// ---------------------------------------------------------------------------
// 4. audit-paths
// ---------------------------------------------------------------------------

#[test]
fn audit_reports_deleted_record() {
    let (root, config) = repo();
    generate(&config);
    std::fs::remove_file(root.path().join("data/gdpr/france.yaml")).unwrap();
    assert_eq!(
        run_audit_paths(&AuditPathsArgs::default(), &config).unwrap(),
        EXIT_VIOLATIONS
    );
}

#[test]
fn audit_checks_paths_of_hand_edited_index() {
    let (root, config) = repo();
    write(
        root.path(),
        "data/gdpr/country-index.json",
        r#"{"framework":"GDPR","countries":[{"name":"France","path":"data/gdpr/gone.yaml"}]}"#,
    );
    assert_eq!(
        run_audit_paths(&AuditPathsArgs::default(), &config).unwrap(),
        EXIT_VIOLATIONS
    );
    std::fs::write(root.path().join("data/gdpr/gone.yaml"), FRANCE).unwrap();
    assert_eq!(
        run_audit_paths(&AuditPathsArgs::default(), &config).unwrap(),
        EXIT_OK
    );
}

// ---------------------------------------------------------------------------
// 5. coverage and audit-types
// ---------------------------------------------------------------------------

#[test]
fn coverage_is_written_to_the_configured_path() {
    let (root, config) = repo();
    generate(&config);

    assert_eq!(run_coverage(&CoverageArgs::default(), &config).unwrap(), EXIT_OK);
    let raw = std::fs::read_to_string(root.path().join("coverage.json")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map["GDPR"], serde_json::json!(["France", "Germany"]));
    assert_eq!(map["PIPL"], serde_json::json!(["China"]));

    let out = root.path().join("site").join("coverage.json");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    let args = CoverageArgs {
        out: Some(out.clone()),
    };
    assert_eq!(run_coverage(&args, &config).unwrap(), EXIT_OK);
    assert!(out.exists());
}

#[test]
fn coverage_reads_indexes_without_region_or_slug() {
    let (root, config) = repo();
    write(
        root.path(),
        "data/gdpr/country-index.json",
        r#"{"framework":"GDPR","countries":[{"name":"Germany"}]}"#,
    );
    assert_eq!(run_coverage(&CoverageArgs::default(), &config).unwrap(), EXIT_OK);
    let raw = std::fs::read_to_string(root.path().join("coverage.json")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map, serde_json::json!({"GDPR": ["Germany"]}));
}

#[test]
fn verify_flags_unknown_keys_in_stored_index() {
    let (root, config) = repo();
    generate(&config);
    let path = root.path().join("data/gdpr/country-index.json");
    let mut stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    stored["stray"] = serde_json::json!(1);
    std::fs::write(&path, stored.to_string()).unwrap();
    assert_eq!(verify(&config), EXIT_VIOLATIONS);
}

#[test]
fn audit_types_always_succeeds_on_a_present_tree() {
    let (root, config) = repo();
    write(root.path(), "data/gdpr/bad.yaml", "categories: [oops\n");
    assert_eq!(
        run_audit_types(&AuditTypesArgs::default(), &config).unwrap(),
        EXIT_OK
    );
}
