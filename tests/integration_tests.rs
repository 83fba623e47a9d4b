//! Integration tests for RIT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a rit command isolated from the user's config and environment
fn rit(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rit").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("RIT_OPERATOR")
        .env_remove("RIT_REGISTER")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    rit(&tmp).arg("init").assert().success();
    tmp
}

fn register_path(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().join("inspections").join("register.csv")
}

/// Helper to save one record for a supplier
fn record_shipment(tmp: &TempDir, supplier: &str, medium: &str) {
    rit(tmp)
        .args([
            "record",
            "--medium",
            medium,
            "--operator",
            "Ana",
            "--supplier",
            supplier,
            "--fragrance",
            "Rose",
        ])
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Receiving Inspection Toolkit"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("record"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rit"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp).arg("frobnicate").assert().failure();
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized RIT project"));

    assert!(tmp.path().join(".rit").is_dir());
    assert!(tmp.path().join(".rit/config.yaml").is_file());
    assert!(tmp.path().join("inspections").is_dir());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();
    rit(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    rit(&tmp).args(["init", "--force"]).assert().success();
}

// ============================================================================
// Plan Tests
// ============================================================================

#[test]
fn test_plan_small_lot_level_two() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--medium", "10", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("220 g\t10\tB\t3\t0/1\t0/1\t0/1"))
        .stdout(predicate::str::contains("500 g\t0\t-\t-\t-\t-\t-"));
}

#[test]
fn test_plan_large_lot_thresholds() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--large", "1000", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Presentation,Lot,Code,Sample,Critical Ac/Re,Major Ac/Re,Minor Ac/Re\n",
        ))
        .stdout(predicate::str::contains("500 g,1000,J,80,0/1,2/4,4/8"));
}

#[test]
fn test_plan_level_three() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--small", "10", "--level", "III", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 g\t10\tC\t5"));
}

#[test]
fn test_plan_sample_clamped_to_lot() {
    let tmp = TempDir::new().unwrap();
    // Lot 1 falls below the table and resolves to N (500), clamped to 1
    rit(&tmp)
        .args(["plan", "--small", "1", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 g\t1\tN\t1"));
}

#[test]
fn test_plan_json_output() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--large", "1000", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"J\""))
        .stdout(predicate::str::contains("\"sample\": \"80\""));
}

#[test]
fn test_plan_table_output_has_caption() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--medium", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inspection level"))
        .stdout(predicate::str::contains("Ac/Re"));
}

#[test]
fn test_plan_requires_a_quantity() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one presentation"));
}

#[test]
fn test_plan_rejects_out_of_range_fraction() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--medium", "10", "--major-accept", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside [0, 1]"));
}

#[test]
fn test_plan_rejects_bad_critical_thresholds() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args([
            "plan",
            "--medium",
            "10",
            "--critical-accept",
            "2",
            "--critical-reject",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical reject"));
}

#[test]
fn test_plan_rejects_unknown_level() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["plan", "--medium", "10", "--level", "IV"])
        .assert()
        .failure();
}

#[test]
fn test_plan_uses_project_policy() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".rit/config.yaml"),
        "default_level: III\naql:\n  critical_reject: 3\n",
    )
    .unwrap();

    rit(&tmp)
        .args(["plan", "--medium", "10", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("220 g\t10\tC\t5\t0/3"));
}

/// Helper to write a project config that does not parse
fn write_bad_config(tmp: &TempDir) {
    fs::write(
        tmp.path().join(".rit/config.yaml"),
        "default_level: IV\naql:\n  critical_reject: 3\n",
    )
    .unwrap();
}

#[test]
fn test_plan_fails_on_unparseable_project_config() {
    let tmp = setup_test_project();
    write_bad_config(&tmp);

    rit(&tmp)
        .args(["plan", "--medium", "10", "--format", "tsv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"))
        .stdout(predicate::str::contains("220 g").not());
}

#[test]
fn test_plan_fails_on_out_of_range_config_fraction() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".rit/config.yaml"),
        "aql:\n  major_accept: 3\n",
    )
    .unwrap();

    rit(&tmp)
        .args(["plan", "--medium", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_plan_fails_on_unparseable_global_config() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(".config").join("rit");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yaml"), "aql: not-a-map\n").unwrap();

    rit(&tmp)
        .args(["plan", "--medium", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn test_record_appends_row_with_single_header() {
    let tmp = setup_test_project();
    record_shipment(&tmp, "Superpack", "10");
    record_shipment(&tmp, "Acme", "600");

    let content = fs::read_to_string(register_path(&tmp)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("timestamp,operator,supplier,fragrance"));
    assert_eq!(content.matches("timestamp").count(), 1);
    assert!(lines[1].contains(",Ana,Superpack,Rose,,,II,0,,,10,B,3,0,,,yes,"));
    assert!(lines[2].contains(",Acme,"));
    assert!(lines[2].contains(",600,J,80,"));
}

#[test]
fn test_record_missing_fragrance_writes_nothing() {
    let tmp = setup_test_project();
    rit(&tmp)
        .args([
            "record",
            "--medium",
            "10",
            "--operator",
            "Ana",
            "--supplier",
            "Superpack",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fragrance is required"));

    assert!(!register_path(&tmp).exists());
}

#[test]
fn test_record_with_all_zero_quantities_writes_nothing() {
    let tmp = setup_test_project();
    rit(&tmp)
        .args([
            "record",
            "--large",
            "0",
            "--medium",
            "0",
            "--small",
            "0",
            "--operator",
            "Ana",
            "--supplier",
            "Superpack",
            "--fragrance",
            "Rose",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one presentation"));

    assert!(!register_path(&tmp).exists());
}

#[test]
fn test_record_rejects_negative_drum_weight() {
    let tmp = setup_test_project();
    rit(&tmp)
        .args([
            "record",
            "--medium",
            "10",
            "--operator",
            "Ana",
            "--supplier",
            "Superpack",
            "--fragrance",
            "Rose",
            "--drum-weight=-5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drum weight"));

    assert!(!register_path(&tmp).exists());
}

#[test]
fn test_record_fails_on_unparseable_config_and_writes_nothing() {
    let tmp = setup_test_project();
    write_bad_config(&tmp);

    rit(&tmp)
        .args([
            "record",
            "--medium",
            "10",
            "--operator",
            "Ana",
            "--supplier",
            "Superpack",
            "--fragrance",
            "Rose",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));

    assert!(!register_path(&tmp).exists());
}

#[test]
fn test_record_after_hand_edit_without_final_newline() {
    let tmp = setup_test_project();
    record_shipment(&tmp, "Superpack", "10");

    let path = register_path(&tmp);
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.trim_end()).unwrap();

    record_shipment(&tmp, "Acme", "600");

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    rit(&tmp)
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_record_uses_operator_from_environment() {
    let tmp = setup_test_project();
    rit(&tmp)
        .env("RIT_OPERATOR", "Luis")
        .args([
            "record",
            "--small",
            "5",
            "--supplier",
            "Superpack",
            "--fragrance",
            "Lavender",
            "--drum-weight",
            "42.5",
            "--quality",
            "no",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(register_path(&tmp)).unwrap();
    assert!(content.contains(",Luis,Superpack,Lavender,,42.5,II,"));
    assert!(content.contains(",5,A,2,no,"));
}

#[test]
fn test_record_explicit_register_outside_project() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args([
            "record",
            "--medium",
            "10",
            "-o",
            "Ana",
            "-s",
            "Superpack",
            "--fragrance",
            "Rose",
            "--register",
            "out/log.csv",
        ])
        .assert()
        .success();

    assert!(tmp.path().join("out/log.csv").is_file());
}

#[test]
fn test_record_outside_project_needs_register() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args([
            "record",
            "--medium",
            "10",
            "-o",
            "Ana",
            "-s",
            "Superpack",
            "--fragrance",
            "Rose",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a RIT project"));
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_empty_register() {
    let tmp = setup_test_project();
    rit(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No inspection records found"));
}

#[test]
fn test_list_shows_records_and_filters() {
    let tmp = setup_test_project();
    record_shipment(&tmp, "Superpack", "10");
    record_shipment(&tmp, "Acme", "600");

    rit(&tmp)
        .args(["list", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Superpack"))
        .stdout(predicate::str::contains("600/J/80"));

    rit(&tmp)
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("2\n");

    rit(&tmp)
        .args(["list", "--supplier", "acme", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_list_json_round_trips_register_fields() {
    let tmp = setup_test_project();
    record_shipment(&tmp, "Superpack", "10");

    rit(&tmp)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code_220g\": \"B\""))
        .stdout(predicate::str::contains("\"n_500g\": null"));
}

// ============================================================================
// Tables, Config and Completions Tests
// ============================================================================

#[test]
fn test_tables_prints_both_tables() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["tables", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 to 8\tA\tA\tB"))
        .stdout(predicate::str::contains("500001 and over\tN\tQ\tR"))
        .stdout(predicate::str::contains("R\t2000"));
}

#[test]
fn test_tables_only_sizes() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["tables", "--only", "sizes", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Code,Sample size"))
        .stdout(predicate::str::contains("Lot size").not());
}

#[test]
fn test_config_show_key() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join(".rit/config.yaml"), "operator: Ana\n").unwrap();

    rit(&tmp)
        .args(["config", "show", "operator"])
        .assert()
        .success()
        .stdout("Ana\n");

    rit(&tmp)
        .args(["config", "show", "aql.minor_reject"])
        .assert()
        .success()
        .stdout("0.1\n");
}

#[test]
fn test_config_show_fails_on_unparseable_config() {
    let tmp = setup_test_project();
    write_bad_config(&tmp);

    rit(&tmp)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_list_fails_on_unparseable_config() {
    let tmp = setup_test_project();
    write_bad_config(&tmp);

    rit(&tmp).args(["list", "--count"]).assert().failure();
}

#[test]
fn test_config_show_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["config", "show", "editor"])
        .assert()
        .failure();
}

#[test]
fn test_config_path_project_only() {
    let tmp = setup_test_project();
    rit(&tmp)
        .args(["config", "path", "--project-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".rit"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    rit(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rit"));
}
