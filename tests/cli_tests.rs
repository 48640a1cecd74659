use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const TRACE: &str = indoc! {"
    SF:lib/features/auth/domain/usecases/login_usecase.dart
    LF:10
    LH:9
    end_of_record
    SF:lib/features/auth/presentation/login_page.dart
    LF:10
    LH:0
    end_of_record
"};

fn layercov() -> Command {
    Command::cargo_bin("layercov").unwrap()
}

fn write_trace(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("lcov.info");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_analyze_succeeds_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(&dir, TRACE);
    let output = dir.path().join("coverage_analysis.md");

    let assert = layercov()
        .arg("analyze")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("# Test Coverage Analysis by Architectural Layer"));

    let report = fs::read_to_string(&output).unwrap();
    assert!(report.contains("login_page.dart"));
}

#[test]
fn test_analyze_quiet_skips_report_echo() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(&dir, TRACE);

    let assert = layercov()
        .arg("analyze")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .arg("--quiet")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(!stdout.contains("# Test Coverage Analysis by Architectural Layer"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    let assert = layercov()
        .arg("analyze")
        .arg("-i")
        .arg(dir.path().join("nope.info"))
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("LCOV file not found"));
    assert!(!dir.path().join("report.md").exists());
}

#[test]
fn test_fully_excluded_trace_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(
        &dir,
        indoc! {"
            SF:lib/models/user.freezed.dart
            LF:40
            LH:40
            end_of_record
        "},
    );

    let assert = layercov()
        .arg("analyze")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("No coverage data found"));
}

#[test]
fn test_trace_without_instrumented_lines_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(
        &dir,
        indoc! {"
            SF:lib/features/auth/domain/failures.dart
            LF:0
            LH:0
            end_of_record
        "},
    );

    let assert = layercov()
        .arg("analyze")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("No coverage data found"));
    assert!(!dir.path().join("report.md").exists());
}

#[test]
fn test_fail_under() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(&dir, TRACE);

    layercov()
        .args(["analyze", "--quiet", "--fail-under", "40"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .assert()
        .success();

    layercov()
        .args(["analyze", "--quiet", "--fail-under", "60"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .assert()
        .failure();
}

#[test]
fn test_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(&dir, TRACE);
    let json = dir.path().join("summary.json");

    layercov()
        .args(["analyze", "--quiet"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("report.md"))
        .arg("--json")
        .arg(&json)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(value["totals"]["global"]["counters"]["lines_hit"], 9);
}

#[test]
fn test_classify_prints_layers() {
    let assert = layercov()
        .args([
            "classify",
            "lib/features/auth/domain/usecases/login_usecase.dart",
            "lib/core/network/client.dart",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("domain"));
    assert!(stdout.contains("auth"));
    assert!(stdout.contains("[critical]"));
    assert!(stdout.contains("data"));
}
