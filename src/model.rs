// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the normalized activity entities (commits, PRs, deployments, releases) and the metrics report document
// role: model/types
// outputs: Serializable structs with stable camelCase field names shared by extraction, calculation, and rendering
// invariants: Entities are immutable value records; derived fields (state, isMergeCommit) are computed at normalization time only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DateRange {
  pub start: String,
  pub end: String,
}

/// AI coding tools we recognize as commit co-authors.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AiTool {
  Copilot,
  Claude,
  Cursor,
  Codeium,
  AmazonQ,
  Gemini,
  Other,
}

impl AiTool {
  pub fn as_str(&self) -> &'static str {
    match self {
      AiTool::Copilot => "copilot",
      AiTool::Claude => "claude",
      AiTool::Cursor => "cursor",
      AiTool::Codeium => "codeium",
      AiTool::AmazonQ => "amazon-q",
      AiTool::Gemini => "gemini",
      AiTool::Other => "other",
    }
  }
}

impl std::fmt::Display for AiTool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiCoAuthor {
  pub name: String,
  /// Lowercased at detection time so dedup is case-insensitive.
  pub email: String,
  pub tool: AiTool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
  pub sha: String,
  pub short_sha: String,
  pub author: String,
  pub author_email: String,
  pub message: String,
  pub committed_at: String,
  pub additions: i64,
  pub deletions: i64,
  pub changed_files: i64,
  pub parents: Vec<String>,
  pub is_merge_commit: bool,
  pub ai_co_authors: Vec<AiCoAuthor>,
  #[serde(rename = "isAIAssisted")]
  pub is_ai_assisted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
  Open,
  Closed,
  Merged,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
  Approved,
  ChangesRequested,
  Commented,
  Pending,
  Dismissed,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub author: String,
  pub state: ReviewState,
  pub submitted_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
  pub number: i64,
  pub title: String,
  pub author: String,
  /// Derived: mergedAt set => merged, else closedAt set => closed, else open.
  pub state: PrState,
  pub is_draft: bool,
  pub created_at: String,
  pub updated_at: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub merged_at: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub closed_at: Option<String>,
  pub additions: i64,
  pub deletions: i64,
  pub changed_files: i64,
  pub labels: Vec<String>,
  pub reviews: Vec<Review>,
  pub commits: i64,
  pub comments: i64,
  pub base_branch: String,
  pub head_branch: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
  Success,
  Failure,
  Pending,
  InProgress,
  Queued,
  Error,
  Inactive,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
  pub id: i64,
  pub environment: String,
  pub state: DeploymentState,
  pub created_at: String,
  pub updated_at: String,
  pub sha: String,
  #[serde(rename = "ref")]
  pub ref_name: String,
  pub creator: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// Deployment proxy for hosts without a deployments API. Draft releases are
/// dropped at normalization time.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Release {
  pub id: i64,
  pub tag_name: String,
  pub name: String,
  pub created_at: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub published_at: Option<String>,
  pub author: String,
  pub is_draft: bool,
  pub is_prerelease: bool,
  pub target_commitish: String,
}

// --- Metrics report document ---

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
  pub calculated_at: String,
  pub date_range: DateRange,
  pub summary: SummarySection,
  pub dora: DoraSection,
  pub pull_requests: PullRequestsSection,
  pub commits: CommitsSection,
  pub ai: AiSection,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SummarySection {
  pub total_pull_requests: usize,
  pub merged_pull_requests: usize,
  pub total_commits: usize,
  pub ai_assisted_commits: usize,
  pub total_deployments: usize,
  pub active_authors: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DoraSection {
  pub lead_time_for_changes: DurationMetric,
  pub deployment_frequency: DeploymentFrequency,
  pub change_failure_rate: ChangeFailureRate,
  /// Explicitly unimplemented; serialized as null.
  pub mean_time_to_recovery: Option<DurationMetric>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DurationMetric {
  pub average_hours: f64,
  pub median_hours: f64,
  pub p90_hours: f64,
  pub median_formatted: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentFrequency {
  pub per_day: f64,
  pub per_week: f64,
  pub total_successful: usize,
  pub range_days: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFailureRate {
  pub percentage: f64,
  pub failed: usize,
  pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsSection {
  pub total: usize,
  pub merged: usize,
  pub open: usize,
  pub closed: usize,
  pub time_to_merge: DurationMetric,
  pub time_to_first_review: DurationMetric,
  pub size_distribution: SizeDistribution,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SizeDistribution {
  pub xs: usize,
  pub s: usize,
  pub m: usize,
  pub l: usize,
  pub xl: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommitsSection {
  pub total: usize,
  pub merge_commits: usize,
  pub total_additions: i64,
  pub total_deletions: i64,
  pub top_contributors: Vec<ContributorCount>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContributorCount {
  pub author: String,
  pub commits: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AiSection {
  pub summary: AiSummary,
  pub by_tool: Vec<ToolUsage>,
  pub by_user: Vec<UserAiUsage>,
  pub daily_trend: Vec<DailyAiTrend>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
  pub ai_commits: usize,
  pub total_commits: usize,
  pub ai_ratio: f64,
  #[serde(rename = "usersWithAI")]
  pub users_with_ai: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsage {
  pub tool: AiTool,
  pub commits: usize,
  pub users: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserAiUsage {
  pub author: String,
  pub ai_commits: usize,
  pub total_commits: usize,
  pub ratio: f64,
  pub primary_tool: AiTool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyAiTrend {
  pub date: String,
  pub ai_commits: usize,
  pub total_commits: usize,
  pub ratio: f64,
}
