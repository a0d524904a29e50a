use assert_cmd::Command;

#[allow(dead_code)]
pub fn bin() -> Command {
  Command::cargo_bin("delivery-metrics").unwrap()
}

#[allow(dead_code)]
pub const WINDOW_ARGS: [&str; 4] = ["--since", "2024-03-01", "--until", "2024-03-11"];

#[allow(dead_code)]
pub fn raw_pr(number: i64, author: &str, created: &str, merged: Option<&str>) -> serde_json::Value {
  serde_json::json!({
    "number": number,
    "title": format!("change {number}"),
    "user": {"login": author},
    "draft": false,
    "created_at": created,
    "updated_at": merged.unwrap_or(created),
    "merged_at": merged,
    "closed_at": merged,
    "additions": 40,
    "deletions": 10,
    "changed_files": 3,
    "labels": [],
    "commits": 2,
    "comments": 1,
    "base": {"ref": "main"},
    "head": {"ref": format!("feature/{number}")}
  })
}

#[allow(dead_code)]
pub fn raw_commit(sha: &str, author: &str, date: &str, claude: bool) -> serde_json::Value {
  let message = if claude {
    "feat: widget\n\nCo-Authored-By: Claude <noreply@anthropic.com>".to_string()
  } else {
    "feat: widget".to_string()
  };

  serde_json::json!({
    "sha": sha,
    "author": {"login": author},
    "commit": {
      "message": message,
      "author": {"name": author, "email": format!("{author}@example.com"), "date": date},
      "committer": {"date": date}
    },
    "parents": [{"sha": "parent"}],
    "stats": {"additions": 12, "deletions": 4}
  })
}

#[allow(dead_code)]
pub fn raw_deployment(id: i64, state: &str, created: &str) -> serde_json::Value {
  serde_json::json!({
    "id": id,
    "environment": "production",
    "state": state,
    "created_at": created,
    "updated_at": created,
    "sha": format!("sha{id}"),
    "ref": "main",
    "creator": {"login": "deployer"}
  })
}

/// Two-repo scenario: 6 merged PRs (4h to merge each), 10 commits of which
/// 3 are Claude-tagged, 5 deployments of which 1 failed, all inside
/// 2024-03-01 .. 2024-03-11.
#[allow(dead_code)]
pub fn apply_scenario(cmd: &mut Command) {
  let app_prs: Vec<serde_json::Value> = (1..=4)
    .map(|n| raw_pr(n, "alice", "2024-03-02T08:00:00Z", Some("2024-03-02T12:00:00Z")))
    .collect();
  let lib_prs: Vec<serde_json::Value> = (5..=6)
    .map(|n| raw_pr(n, "bob", "2024-03-03T08:00:00Z", Some("2024-03-03T12:00:00Z")))
    .collect();

  let app_commits: Vec<serde_json::Value> = (0..6)
    .map(|i| {
      let author = if i % 2 == 0 { "alice" } else { "bob" };
      raw_commit(&format!("app{i:07}"), author, "2024-03-04T10:00:00Z", i < 2)
    })
    .collect();
  let lib_commits: Vec<serde_json::Value> = (0..4)
    .map(|i| raw_commit(&format!("lib{i:07}"), "carol", "2024-03-05T10:00:00Z", i < 1))
    .collect();

  let app_deployments: Vec<serde_json::Value> = (1..=3)
    .map(|id| raw_deployment(id, "success", "2024-03-06T00:00:00Z"))
    .collect();
  let lib_deployments = vec![
    raw_deployment(4, "success", "2024-03-07T00:00:00Z"),
    raw_deployment(5, "failure", "2024-03-07T06:00:00Z"),
  ];

  cmd
    .env(
      "DMR_TEST_PRS_JSON",
      serde_json::json!({"acme/app": app_prs, "acme/lib": lib_prs}).to_string(),
    )
    .env(
      "DMR_TEST_COMMITS_JSON",
      serde_json::json!({"acme/app": app_commits, "acme/lib": lib_commits}).to_string(),
    )
    .env(
      "DMR_TEST_DEPLOYMENTS_JSON",
      serde_json::json!({"acme/app": app_deployments, "acme/lib": lib_deployments}).to_string(),
    )
    .env("DMR_TEST_RELEASES_JSON", "[]");
}
