// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Translate raw host API records into normalized entities with default-fill and derived fields
// role: domain/normalizers
// inputs: serde_json::Value records as returned by the host API
// outputs: Commit, PullRequest, Review, Deployment, Release entities
// invariants:
// - Total functions: missing numeric fields become 0, missing authors become "unknown", never an error
// - PR state is derived (mergedAt > closedAt > open), never taken verbatim from the host
// - Unknown deployment states normalize to pending (fail-open, records stay countable)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::ai;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Commit, Deployment, DeploymentState, PrState, PullRequest, Release, Review, ReviewState};

fn short_sha(full: &str) -> String {
  full.chars().take(7).collect()
}

/// Normalize one raw commit record. The display handle prefers the host
/// account login and falls back to the git author name.
pub fn normalize_commit(raw: &serde_json::Value) -> Commit {
  let sha = raw.fetch("sha").to_str_or("");
  let message = raw.fetch("commit.message").to_str_or("");

  let author = {
    let login = raw.fetch("author.login").to_str_or("");
    if login.is_empty() {
      raw.fetch("commit.author.name").to_str_or("unknown")
    } else {
      login
    }
  };

  let committed_at = {
    let committer_date = raw.fetch("commit.committer.date").to_str_or("");
    if committer_date.is_empty() {
      raw.fetch("commit.author.date").to_str_or("")
    } else {
      committer_date
    }
  };

  let parents: Vec<String> = raw
    .fetch("parents")
    .array()
    .iter()
    .map(|p| p.fetch("sha").to_str_or(""))
    .filter(|s| !s.is_empty())
    .collect();

  let files = raw.fetch("files").array();
  let changed_files = if files.is_empty() {
    raw.fetch("stats.total_files").to_i64_or_zero()
  } else {
    files.len() as i64
  };

  let ai_co_authors = ai::detect_co_authors(&message);
  let is_ai_assisted = !ai_co_authors.is_empty() || ai::has_inline_ai_indicator(&message);

  Commit {
    short_sha: short_sha(&sha),
    sha,
    author,
    author_email: raw.fetch("commit.author.email").to_str_or(""),
    message,
    committed_at,
    additions: raw.fetch("stats.additions").to_i64_or_zero(),
    deletions: raw.fetch("stats.deletions").to_i64_or_zero(),
    changed_files,
    is_merge_commit: parents.len() > 1,
    parents,
    ai_co_authors,
    is_ai_assisted,
  }
}

fn parse_review_state(raw: &str) -> ReviewState {
  match raw.to_ascii_uppercase().as_str() {
    "APPROVED" => ReviewState::Approved,
    "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
    "COMMENTED" => ReviewState::Commented,
    "DISMISSED" => ReviewState::Dismissed,
    _ => ReviewState::Pending,
  }
}

pub fn normalize_review(raw: &serde_json::Value) -> Review {
  Review {
    author: raw.fetch("user.login").to_str_or("unknown"),
    state: parse_review_state(&raw.fetch("state").to_str_or("")),
    submitted_at: raw.fetch("submitted_at").to_str_or(""),
  }
}

/// Normalize one raw pull request plus its raw review list.
///
/// State is derived, not trusted: a non-null mergedAt wins, then a non-null
/// closedAt, otherwise the PR is open regardless of the raw `state` field.
pub fn normalize_pull_request(raw: &serde_json::Value, raw_reviews: &[serde_json::Value]) -> PullRequest {
  let merged_at = raw.fetch("merged_at").to::<String>();
  let closed_at = raw.fetch("closed_at").to::<String>();

  let state = if merged_at.is_some() {
    PrState::Merged
  } else if closed_at.is_some() {
    PrState::Closed
  } else {
    PrState::Open
  };

  let labels: Vec<String> = raw
    .fetch("labels")
    .array()
    .iter()
    .map(|l| l.fetch("name").to_str_or(""))
    .filter(|s| !s.is_empty())
    .collect();

  let reviews: Vec<Review> = raw_reviews.iter().map(normalize_review).collect();

  PullRequest {
    number: raw.fetch("number").to_i64_or_zero(),
    title: raw.fetch("title").to_str_or(""),
    author: raw.fetch("user.login").to_str_or("unknown"),
    state,
    is_draft: raw.fetch("draft").to::<bool>().unwrap_or(false),
    created_at: raw.fetch("created_at").to_str_or(""),
    updated_at: raw.fetch("updated_at").to_str_or(""),
    merged_at,
    closed_at,
    additions: raw.fetch("additions").to_i64_or_zero(),
    deletions: raw.fetch("deletions").to_i64_or_zero(),
    changed_files: raw.fetch("changed_files").to_i64_or_zero(),
    labels,
    reviews,
    commits: raw.fetch("commits").to_i64_or_zero(),
    comments: raw.fetch("comments").to_i64_or_zero(),
    base_branch: raw.fetch("base.ref").to_str_or(""),
    head_branch: raw.fetch("head.ref").to_str_or(""),
  }
}

fn parse_deployment_state(raw: &str) -> DeploymentState {
  match raw.to_ascii_lowercase().as_str() {
    "success" => DeploymentState::Success,
    "failure" => DeploymentState::Failure,
    "in_progress" => DeploymentState::InProgress,
    "queued" => DeploymentState::Queued,
    "error" => DeploymentState::Error,
    "inactive" => DeploymentState::Inactive,
    // fail-open: unrecognized states stay countable instead of vanishing
    _ => DeploymentState::Pending,
  }
}

pub fn normalize_deployment(raw: &serde_json::Value) -> Deployment {
  Deployment {
    id: raw.fetch("id").to_i64_or_zero(),
    environment: raw.fetch("environment").to_str_or("unknown"),
    state: parse_deployment_state(&raw.fetch("state").to_str_or("")),
    created_at: raw.fetch("created_at").to_str_or(""),
    updated_at: raw.fetch("updated_at").to_str_or(""),
    sha: raw.fetch("sha").to_str_or(""),
    ref_name: raw.fetch("ref").to_str_or(""),
    creator: raw.fetch("creator.login").to_str_or("unknown"),
    description: raw.fetch("description").to::<String>(),
  }
}

/// Normalize one raw release. Draft releases are excluded here, before any
/// aggregation can see them.
pub fn normalize_release(raw: &serde_json::Value) -> Option<Release> {
  if raw.fetch("draft").to::<bool>().unwrap_or(false) {
    return None;
  }

  let tag_name = raw.fetch("tag_name").to_str_or("");

  Some(Release {
    id: raw.fetch("id").to_i64_or_zero(),
    name: {
      let name = raw.fetch("name").to_str_or("");
      if name.is_empty() { tag_name.clone() } else { name }
    },
    tag_name,
    created_at: raw.fetch("created_at").to_str_or(""),
    published_at: raw.fetch("published_at").to::<String>(),
    author: raw.fetch("author.login").to_str_or("unknown"),
    is_draft: false,
    is_prerelease: raw.fetch("prerelease").to::<bool>().unwrap_or(false),
    target_commitish: raw.fetch("target_commitish").to_str_or(""),
  })
}

/// Deployment proxy for hosts without a deployments API: a published
/// release counts as one successful deployment of its target commit.
pub fn release_as_deployment(release: &Release) -> Deployment {
  let at = release
    .published_at
    .clone()
    .unwrap_or_else(|| release.created_at.clone());

  Deployment {
    id: release.id,
    environment: "release".into(),
    state: DeploymentState::Success,
    created_at: at.clone(),
    updated_at: at,
    sha: release.target_commitish.clone(),
    ref_name: release.tag_name.clone(),
    creator: release.author.clone(),
    description: if release.name.is_empty() {
      None
    } else {
      Some(release.name.clone())
    },
  }
}
