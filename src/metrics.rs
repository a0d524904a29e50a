// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure metrics pipeline: normalized PRs/commits/deployments for a window -> MetricsReport
// role: domain/calculator
// inputs: Normalized entity slices and the date range they were extracted for
// outputs: MetricsReport document (DORA, PR, commit, AI sections)
// invariants:
// - Single-pass, stateless, no IO; all accumulators are function-local
// - Empty inputs yield documented zero values, never NaN/Infinity or a panic
// - Recomputation over identical inputs is byte-identical except calculatedAt
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{
  AiSection, AiSummary, AiTool, ChangeFailureRate, Commit, CommitsSection, ContributorCount, DailyAiTrend, DateRange,
  Deployment, DeploymentFrequency, DeploymentState, DoraSection, MetricsReport, PrState, PullRequest,
  PullRequestsSection, SummarySection, ToolUsage, UserAiUsage,
};
use crate::stats::{duration_metric, round1, round2, size_distribution, top_counts};
use crate::util::{effective_now, hours_between, range_days, recorded_date};

/// Compute the full metrics report for one extraction window.
///
/// Pure transform of its inputs; `now_opt` only feeds `calculatedAt`.
pub fn calculate_report(
  prs: &[PullRequest],
  commits: &[Commit],
  deployments: &[Deployment],
  date_range: &DateRange,
  now_opt: Option<DateTime<Utc>>,
) -> MetricsReport {
  let calculated_at = effective_now(now_opt).to_rfc3339_opts(SecondsFormat::Secs, true);

  let merged: Vec<&PullRequest> = prs.iter().filter(|p| p.state == PrState::Merged).collect();

  let lead_times = merge_durations(&merged);
  let first_review_times = first_review_durations(&merged);

  let dora = DoraSection {
    lead_time_for_changes: duration_metric(&lead_times),
    deployment_frequency: deployment_frequency(deployments, date_range),
    change_failure_rate: change_failure_rate(deployments),
    mean_time_to_recovery: None,
  };

  let pull_requests = PullRequestsSection {
    total: prs.len(),
    merged: merged.len(),
    open: prs.iter().filter(|p| p.state == PrState::Open).count(),
    closed: prs.iter().filter(|p| p.state == PrState::Closed).count(),
    // same formula as lead time today; kept separate so a deploy-based lead
    // time can diverge without breaking this metric
    time_to_merge: duration_metric(&lead_times),
    time_to_first_review: duration_metric(&first_review_times),
    size_distribution: size_distribution(prs.iter().map(|p| p.additions + p.deletions)),
  };

  let top_contributors = top_counts(commits.iter().map(|c| c.author.clone()), 10)
    .into_iter()
    .map(|(author, commits)| ContributorCount { author, commits })
    .collect();

  let commits_section = CommitsSection {
    total: commits.len(),
    merge_commits: commits.iter().filter(|c| c.is_merge_commit).count(),
    total_additions: commits.iter().map(|c| c.additions).sum(),
    total_deletions: commits.iter().map(|c| c.deletions).sum(),
    top_contributors,
  };

  let ai = ai_section(commits);

  let summary = SummarySection {
    total_pull_requests: prs.len(),
    merged_pull_requests: merged.len(),
    total_commits: commits.len(),
    ai_assisted_commits: ai.summary.ai_commits,
    total_deployments: deployments.len(),
    active_authors: distinct_authors(commits),
  };

  MetricsReport {
    calculated_at,
    date_range: date_range.clone(),
    summary,
    dora,
    pull_requests,
    commits: commits_section,
    ai,
  }
}

fn distinct_authors(commits: &[Commit]) -> usize {
  let mut seen: Vec<&str> = Vec::new();
  for c in commits {
    if !seen.contains(&c.author.as_str()) {
      seen.push(&c.author);
    }
  }
  seen.len()
}

/// Hours between creation and merge for every merged PR.
fn merge_durations(merged: &[&PullRequest]) -> Vec<f64> {
  merged
    .iter()
    .filter_map(|p| {
      let merged_at = p.merged_at.as_deref()?;
      hours_between(&p.created_at, merged_at)
    })
    .collect()
}

/// Hours to the earliest review of each merged PR. Negative deltas (clock
/// skew, synthetic fixtures) are discarded, not clamped, so they cannot
/// drag the average toward zero.
fn first_review_durations(merged: &[&PullRequest]) -> Vec<f64> {
  merged
    .iter()
    .filter_map(|p| {
      let first = p
        .reviews
        .iter()
        .filter(|r| !r.submitted_at.is_empty())
        .min_by(|a, b| a.submitted_at.cmp(&b.submitted_at))?;
      hours_between(&p.created_at, &first.submitted_at)
    })
    .filter(|h| *h >= 0.0)
    .collect()
}

fn deployment_frequency(deployments: &[Deployment], range: &DateRange) -> DeploymentFrequency {
  let successful = deployments
    .iter()
    .filter(|d| d.state == DeploymentState::Success)
    .count();
  let days = range_days(&range.start, &range.end);

  // the unrounded ratio feeds perWeek; rounding happens only at the edge
  let per_day_raw = if days > 0 { successful as f64 / days as f64 } else { 0.0 };

  DeploymentFrequency {
    per_day: round2(per_day_raw),
    per_week: round2(per_day_raw * 7.0),
    total_successful: successful,
    range_days: days,
  }
}

fn change_failure_rate(deployments: &[Deployment]) -> ChangeFailureRate {
  let total = deployments.len();
  let failed = deployments
    .iter()
    .filter(|d| matches!(d.state, DeploymentState::Failure | DeploymentState::Error))
    .count();

  let percentage = if total > 0 {
    round1(failed as f64 / total as f64 * 100.0)
  } else {
    0.0
  };

  ChangeFailureRate {
    percentage,
    failed,
    total,
  }
}

struct AuthorAcc {
  author: String,
  ai: usize,
  total: usize,
  /// Tool counts in first-encounter order; primaryTool selection walks this
  /// with strictly-greater replacement.
  tools: Vec<(AiTool, usize)>,
}

struct ToolAcc {
  tool: AiTool,
  commits: usize,
  users: Vec<String>,
}

fn ai_section(commits: &[Commit]) -> AiSection {
  // Local accumulators only; nothing survives this call.
  let mut author_index: HashMap<String, usize> = HashMap::new();
  let mut authors: Vec<AuthorAcc> = Vec::new();
  let mut tool_index: HashMap<AiTool, usize> = HashMap::new();
  let mut tools: Vec<ToolAcc> = Vec::new();
  let mut daily: BTreeMap<String, (usize, usize)> = BTreeMap::new();

  let mut ai_commits = 0usize;

  for commit in commits {
    let ai_idx = match author_index.get(&commit.author) {
      Some(&i) => i,
      None => {
        author_index.insert(commit.author.clone(), authors.len());
        authors.push(AuthorAcc {
          author: commit.author.clone(),
          ai: 0,
          total: 0,
          tools: Vec::new(),
        });
        authors.len() - 1
      }
    };
    authors[ai_idx].total += 1;

    if let Some(date) = recorded_date(&commit.committed_at) {
      let entry = daily.entry(date).or_insert((0, 0));
      entry.1 += 1;
      if commit.is_ai_assisted {
        entry.0 += 1;
      }
    }

    if !commit.is_ai_assisted {
      continue;
    }

    ai_commits += 1;
    authors[ai_idx].ai += 1;

    // one commit counts once per distinct tool it tags
    let mut commit_tools: Vec<AiTool> = Vec::new();
    for co in &commit.ai_co_authors {
      if !commit_tools.contains(&co.tool) {
        commit_tools.push(co.tool);
      }
    }

    for tool in commit_tools {
      match authors[ai_idx].tools.iter_mut().find(|(t, _)| *t == tool) {
        Some((_, n)) => *n += 1,
        None => authors[ai_idx].tools.push((tool, 1)),
      }

      let t_idx = match tool_index.get(&tool) {
        Some(&i) => i,
        None => {
          tool_index.insert(tool, tools.len());
          tools.push(ToolAcc {
            tool,
            commits: 0,
            users: Vec::new(),
          });
          tools.len() - 1
        }
      };
      tools[t_idx].commits += 1;
      if !tools[t_idx].users.contains(&commit.author) {
        tools[t_idx].users.push(commit.author.clone());
      }
    }
  }

  let total_commits = commits.len();
  let users_with_ai = authors.iter().filter(|a| a.ai > 0).count();

  let mut by_tool: Vec<ToolUsage> = tools
    .into_iter()
    .map(|t| ToolUsage {
      tool: t.tool,
      commits: t.commits,
      users: t.users.len(),
    })
    .collect();
  by_tool.sort_by(|a, b| b.commits.cmp(&a.commits));

  let mut by_user: Vec<UserAiUsage> = authors
    .iter()
    .filter(|a| a.ai > 0)
    .map(|a| UserAiUsage {
      author: a.author.clone(),
      ai_commits: a.ai,
      total_commits: a.total,
      ratio: round2(a.ai as f64 / a.total as f64),
      primary_tool: primary_tool(&a.tools),
    })
    .collect();
  by_user.sort_by(|a, b| b.ai_commits.cmp(&a.ai_commits));

  let daily_trend: Vec<DailyAiTrend> = daily
    .into_iter()
    .map(|(date, (ai, total))| DailyAiTrend {
      date,
      ai_commits: ai,
      total_commits: total,
      ratio: if total > 0 { round2(ai as f64 / total as f64) } else { 0.0 },
    })
    .collect();

  AiSection {
    summary: AiSummary {
      ai_commits,
      total_commits,
      ai_ratio: if total_commits > 0 {
        round2(ai_commits as f64 / total_commits as f64)
      } else {
        0.0
      },
      users_with_ai,
    },
    by_tool,
    by_user,
    daily_trend,
  }
}

/// Highest-count tool for an author. Ties keep the first-encountered tool:
/// replacement requires strictly greater, never >=.
fn primary_tool(tools: &[(AiTool, usize)]) -> AiTool {
  let mut best = AiTool::Other;
  let mut best_count = 0usize;

  for (tool, count) in tools {
    if *count > best_count {
      best = *tool;
      best_count = *count;
    }
  }

  best
}
