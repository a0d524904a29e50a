mod common;

use predicates::prelude::*;

fn extract_scenario(dir: &std::path::Path) {
  let mut cmd = common::bin();
  common::apply_scenario(&mut cmd);
  cmd
    .args(["extract", "--repos", "acme/app,acme/lib"])
    .args(common::WINDOW_ARGS)
    .args(["--out", dir.to_str().unwrap()])
    .assert()
    .success();
}

#[test]
fn metrics_stdout_report_matches_the_scenario() {
  let dir = tempfile::TempDir::new().unwrap();
  extract_scenario(dir.path());

  let out = common::bin()
    .args(["--now-override", "2024-03-12T00:00:00"])
    .args(["metrics", "--input", dir.path().to_str().unwrap(), "--out", "-"])
    .output()
    .unwrap();
  assert!(out.status.success());

  let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  assert_eq!(report["summary"]["totalPullRequests"], 6);
  assert_eq!(report["summary"]["mergedPullRequests"], 6);
  assert_eq!(report["summary"]["totalCommits"], 10);
  assert_eq!(report["summary"]["aiAssistedCommits"], 3);
  assert_eq!(report["summary"]["totalDeployments"], 5);

  // 4 successes over a 10-day window
  assert_eq!(report["dora"]["deploymentFrequency"]["perDay"], 0.4);
  assert_eq!(report["dora"]["deploymentFrequency"]["perWeek"], 2.8);
  assert_eq!(report["dora"]["deploymentFrequency"]["totalSuccessful"], 4);
  assert_eq!(report["dora"]["deploymentFrequency"]["rangeDays"], 10);

  // 1 of 5 deployments failed
  assert_eq!(report["dora"]["changeFailureRate"]["percentage"], 20.0);
  assert_eq!(report["dora"]["changeFailureRate"]["failed"], 1);
  assert_eq!(report["dora"]["changeFailureRate"]["total"], 5);

  // every PR merged 4h after creation
  assert_eq!(report["dora"]["leadTimeForChanges"]["averageHours"], 4.0);
  assert_eq!(report["dora"]["leadTimeForChanges"]["medianFormatted"], "4.0h");
  assert!(report["dora"]["meanTimeToRecovery"].is_null());

  assert_eq!(report["ai"]["summary"]["aiRatio"], 0.3);
  assert_eq!(report["ai"]["byTool"][0]["tool"], "claude");
  assert_eq!(report["ai"]["byTool"][0]["commits"], 3);

  // summary block goes to stderr when JSON owns stdout
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("DORA"));
  assert!(stderr.contains("AI assistance"));
}

#[test]
fn metrics_default_sink_writes_into_the_input_directory() {
  let dir = tempfile::TempDir::new().unwrap();
  extract_scenario(dir.path());

  common::bin()
    .args(["metrics", "--input", dir.path().to_str().unwrap()])
    .assert()
    .success()
    .stdout(predicate::str::contains("DORA"))
    .stderr(predicate::str::contains("metrics-report.json"));

  let report: serde_json::Value =
    serde_json::from_slice(&std::fs::read(dir.path().join("metrics-report.json")).unwrap()).unwrap();
  assert_eq!(report["dateRange"]["start"], "2024-03-01T00:00:00Z");
  assert_eq!(report["summary"]["totalCommits"], 10);
}

#[test]
fn metrics_is_deterministic_apart_from_calculated_at() {
  let dir = tempfile::TempDir::new().unwrap();
  extract_scenario(dir.path());

  let run = |now: &str| -> serde_json::Value {
    let out = common::bin()
      .args(["--now-override", now])
      .args(["metrics", "--input", dir.path().to_str().unwrap(), "--out", "-"])
      .output()
      .unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
  };

  let mut a = run("2024-03-12T00:00:00");
  let mut b = run("2024-03-13T00:00:00");
  assert_ne!(a["calculatedAt"], b["calculatedAt"]);
  a["calculatedAt"] = serde_json::Value::Null;
  b["calculatedAt"] = serde_json::Value::Null;
  assert_eq!(a, b);
}

#[test]
fn metrics_tz_changes_only_the_calculated_at_zone() {
  let dir = tempfile::TempDir::new().unwrap();
  extract_scenario(dir.path());

  let out = common::bin()
    .args(["--now-override", "2024-03-12T00:00:00"])
    .args(["metrics", "--input", dir.path().to_str().unwrap(), "--out", "-", "--tz", "Asia/Tokyo"])
    .output()
    .unwrap();
  assert!(out.status.success());

  let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let calculated_at = report["calculatedAt"].as_str().unwrap();
  assert!(calculated_at.contains("+09:00"), "got {calculated_at}");
  // entity timestamps stay as recorded
  assert_eq!(report["dateRange"]["start"], "2024-03-01T00:00:00Z");
}

#[test]
fn metrics_fails_with_stage_named_error_on_missing_input() {
  common::bin()
    .args(["metrics", "--input", "/no/such/dir", "--out", "-"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("pull-requests.json"));
}
