use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("popan").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("popan"));
}

#[test]
fn analyze_runs_offline_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    std::fs::write(
        &snapshot,
        r#"[
          {"country": "A", "populationCounts": [
            {"year": 2000, "value": 100}, {"year": 2001, "value": 110}, {"year": 2002, "value": 121}
          ]},
          {"country": "B", "populationCounts": [
            {"year": 2000, "value": 50}, {"year": 2001, "value": 55}
          ]}
        ]"#,
    )
    .unwrap();
    let out = dir.path().join("table.csv");
    let report = dir.path().join("report.txt");

    let mut cmd = Command::cargo_bin("popan").unwrap();
    cmd.current_dir(dir.path());
    cmd.args([
        "analyze",
        "--input",
        snapshot.to_str().unwrap(),
        "--countries",
        "A,B",
        "--start-year",
        "2000",
        "--end-year",
        "2002",
        "--stats",
    ]);
    cmd.arg("--out").arg(&out);
    cmd.arg("--report").arg(&report);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("POPULATION ANALYSIS REPORT"));

    assert!(out.exists());
    let report_text = std::fs::read_to_string(&report).unwrap();
    assert!(report_text.contains("Total countries: 2"));
    assert!(report_text.contains("Year range: 2000-2002"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_population() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("popan").unwrap();
    cmd.args(["fetch", "--snapshot-dir", dir.path().to_str().unwrap()]);
    cmd.assert().success();
}
