//! End-to-end tests for the ctrl-anova binary
//!
//! Each test runs inside its own temp directory so the default file names
//! never collide. Plot rendering is skipped because it depends on system fonts.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn ctrl_anova(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ctrl-anova");
    cmd.current_dir(dir);
    cmd
}

fn data_rows(path: &Path) -> Vec<(String, f64)> {
    let text = fs::read_to_string(path).unwrap();
    text.lines()
        .skip(1)
        .map(|line| {
            let (algorithm, value) = line.split_once(',').unwrap();
            (algorithm.to_string(), value.parse().unwrap())
        })
        .collect()
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn test_generate_writes_default_csv() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 90 samples"))
        .stdout(predicate::str::contains("algorithm_performance_data.csv"));

    let csv = tmp.path().join("algorithm_performance_data.csv");
    let header = fs::read_to_string(&csv).unwrap();
    assert!(header.starts_with("algorithm,control_error"));

    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 90);
    for label in ["PID", "LQR", "MPC"] {
        assert_eq!(rows.iter().filter(|(a, _)| a == label).count(), 30);
    }
    assert!(rows.iter().all(|(_, v)| *v >= 0.0));
}

#[test]
fn test_generate_respects_samples_and_output() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .args(["generate", "--samples", "12", "--output", "small.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 36 samples"));

    assert_eq!(data_rows(&tmp.path().join("small.csv")).len(), 36);
    assert!(!tmp.path().join("algorithm_performance_data.csv").exists());
}

#[test]
fn test_generate_is_reproducible_for_a_seed() {
    let tmp = TempDir::new().unwrap();

    for name in ["a.csv", "b.csv"] {
        ctrl_anova(tmp.path())
            .args(["generate", "--seed", "1234", "-o", name])
            .assert()
            .success();
    }

    let a = fs::read_to_string(tmp.path().join("a.csv")).unwrap();
    let b = fs::read_to_string(tmp.path().join("b.csv")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_generate_rejects_zero_samples() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .args(["generate", "--samples", "0"])
        .assert()
        .failure();
}

// =============================================================================
// analyze
// =============================================================================

#[test]
fn test_analyze_reports_significant_difference() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path()).arg("generate").assert().success();

    ctrl_anova(tmp.path())
        .args(["analyze", "--skip-plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SIGNIFICANT DIFFERENCE DETECTED"))
        .stdout(predicate::str::contains("Recommended algorithm: MPC"))
        .stdout(predicate::str::contains("anova_result.json"));

    let json = fs::read_to_string(tmp.path().join("anova_result.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["recommended_algorithm"], "MPC");
    assert_eq!(value["significant"], true);
    assert!(value["f_statistic"].as_f64().unwrap() > value["critical_value"].as_f64().unwrap());
    assert!(!tmp.path().join("algorithm_anova_visualization.png").exists());
}

#[test]
fn test_analyze_missing_data_fails() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .args(["analyze", "--skip-plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("algorithm_performance_data.csv"));
}

#[test]
fn test_analyze_accepts_legacy_error_column() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("legacy.csv"),
        "algorithm,error\nPID,15.1\nPID,14.2\nPID,16.0\nLQR,10.3\nLQR,9.8\nLQR,10.9\nMPC,7.0\nMPC,6.4\nMPC,7.7\n",
    )
    .unwrap();

    ctrl_anova(tmp.path())
        .args(["analyze", "--data", "legacy.csv", "--skip-plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended algorithm: MPC"));
}

#[test]
fn test_analyze_single_sample_group_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("thin.csv"),
        "algorithm,control_error\nPID,15.1\nPID,14.2\nMPC,7.0\n",
    )
    .unwrap();

    ctrl_anova(tmp.path())
        .args(["analyze", "--data", "thin.csv", "--skip-plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient data"));
}

#[test]
fn test_analyze_unknown_algorithm_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.csv"),
        "algorithm,control_error\nPID,15.1\nFUZZY,3.0\n",
    )
    .unwrap();

    ctrl_anova(tmp.path())
        .args(["analyze", "--data", "bad.csv", "--skip-plot"])
        .assert()
        .failure();
}

#[test]
fn test_analyze_rejects_invalid_alpha() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path()).arg("generate").assert().success();

    ctrl_anova(tmp.path())
        .args(["analyze", "--alpha", "1.5", "--skip-plot"])
        .assert()
        .failure();
}

// =============================================================================
// report
// =============================================================================

#[test]
fn test_report_from_result_file() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path()).arg("generate").assert().success();
    ctrl_anova(tmp.path())
        .args(["analyze", "--skip-plot"])
        .assert()
        .success();

    ctrl_anova(tmp.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("ANOVA_Analysis_Report.md"));

    let md = fs::read_to_string(tmp.path().join("ANOVA_Analysis_Report.md")).unwrap();
    assert!(md.contains("## 4. ANOVA Results"));
    assert!(md.contains("**Recommended**: MPC"));
    assert!(md.contains("algorithm_performance_data.csv"));
    assert!(!md.contains("Visualization"));
}

#[test]
fn test_report_recomputes_without_result_file() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path()).arg("generate").assert().success();

    ctrl_anova(tmp.path())
        .args(["report", "--output", "summary.md"])
        .assert()
        .success();

    let md = fs::read_to_string(tmp.path().join("summary.md")).unwrap();
    assert!(md.contains("Reject the null hypothesis"));
}

#[test]
fn test_report_without_any_input_fails() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path()).arg("report").assert().failure();
    assert!(!tmp.path().join("ANOVA_Analysis_Report.md").exists());
}

#[test]
fn test_report_with_explicit_data_analyzes_that_file() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path()).arg("generate").assert().success();
    ctrl_anova(tmp.path())
        .args(["analyze", "--skip-plot"])
        .assert()
        .success();
    ctrl_anova(tmp.path())
        .args(["generate", "--samples", "10", "--seed", "7", "-o", "other.csv"])
        .assert()
        .success();

    ctrl_anova(tmp.path())
        .args(["report", "--data", "other.csv"])
        .assert()
        .success();

    let md = fs::read_to_string(tmp.path().join("ANOVA_Analysis_Report.md")).unwrap();
    assert!(md.contains("**Data file**: other.csv"));
    assert!(md.contains("| PID | 10 |"));
    assert!(!md.contains("| PID | 30 |"));
}

#[test]
fn test_report_names_the_analyzed_file() {
    let tmp = TempDir::new().unwrap();
    ctrl_anova(tmp.path())
        .args(["generate", "-o", "mine.csv"])
        .assert()
        .success();
    ctrl_anova(tmp.path())
        .args(["analyze", "--data", "mine.csv", "--skip-plot"])
        .assert()
        .success();

    ctrl_anova(tmp.path()).arg("report").assert().success();

    let md = fs::read_to_string(tmp.path().join("ANOVA_Analysis_Report.md")).unwrap();
    assert!(md.contains("**Data file**: mine.csv"));
    assert!(!md.contains("algorithm_performance_data.csv"));
}

// =============================================================================
// run + config
// =============================================================================

#[test]
fn test_run_executes_all_stages() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .args(["run", "--skip-plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/3]"))
        .stdout(predicate::str::contains("[3/3]"));

    for name in [
        "algorithm_performance_data.csv",
        "anova_result.json",
        "ANOVA_Analysis_Report.md",
    ] {
        assert!(tmp.path().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("pipeline.toml"),
        r#"
[generator]
samples_per_group = 10
seed = 99

[analysis]
alpha = 0.01
posthoc = false

[paths]
data = "cfg_data.csv"
result = "cfg_result.json"
report = "cfg_report.md"
"#,
    )
    .unwrap();

    ctrl_anova(tmp.path())
        .args(["--config", "pipeline.toml", "run", "--skip-plot"])
        .assert()
        .success();

    assert_eq!(data_rows(&tmp.path().join("cfg_data.csv")).len(), 30);
    let json = fs::read_to_string(tmp.path().join("cfg_result.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["alpha"], 0.01);
    assert!(value["posthoc"].as_array().unwrap().is_empty());
    assert!(tmp.path().join("cfg_report.md").exists());
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.toml"), "[analysis\nalpha = ").unwrap();

    ctrl_anova(tmp.path())
        .args(["-c", "broken.toml", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();

    ctrl_anova(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_invalid_plot_size_fails_before_any_output() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pipeline.toml"), "[plot]\nwidth = 0\n").unwrap();

    ctrl_anova(tmp.path())
        .args(["-c", "pipeline.toml", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!tmp.path().join("algorithm_performance_data.csv").exists());
    assert!(!tmp.path().join("anova_result.json").exists());
}
