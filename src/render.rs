// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Human-readable console summary of a metrics report
// role: presentation/render
// inputs: MetricsReport
// outputs: Plain-text summary block (no color, pipe-safe)
// invariants:
// - Pure string building; the caller decides the output stream
// - Sections appear in report order: window, DORA, pull requests, commits, AI
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;

use crate::model::MetricsReport;

/// Render the console summary block for a report.
pub fn render_summary(report: &MetricsReport) -> String {
  let mut out = String::new();

  let _ = writeln!(out, "Delivery metrics {} .. {}", report.date_range.start, report.date_range.end);
  let _ = writeln!(out);

  let dora = &report.dora;
  let _ = writeln!(out, "DORA");
  let _ = writeln!(
    out,
    "  lead time for changes   {} (median), {:.1}h avg, {:.1}h p90",
    dora.lead_time_for_changes.median_formatted,
    dora.lead_time_for_changes.average_hours,
    dora.lead_time_for_changes.p90_hours
  );
  let _ = writeln!(
    out,
    "  deployment frequency    {:.2}/day ({:.2}/week, {} successful over {} days)",
    dora.deployment_frequency.per_day,
    dora.deployment_frequency.per_week,
    dora.deployment_frequency.total_successful,
    dora.deployment_frequency.range_days
  );
  let _ = writeln!(
    out,
    "  change failure rate     {:.1}% ({} of {} deployments)",
    dora.change_failure_rate.percentage, dora.change_failure_rate.failed, dora.change_failure_rate.total
  );
  let _ = writeln!(out, "  mean time to recovery   not tracked");
  let _ = writeln!(out);

  let prs = &report.pull_requests;
  let _ = writeln!(out, "Pull requests");
  let _ = writeln!(
    out,
    "  {} total ({} merged, {} open, {} closed)",
    prs.total, prs.merged, prs.open, prs.closed
  );
  let _ = writeln!(out, "  time to merge           {}", prs.time_to_merge.median_formatted);
  let _ = writeln!(out, "  time to first review    {}", prs.time_to_first_review.median_formatted);
  let d = &prs.size_distribution;
  let _ = writeln!(
    out,
    "  size                    xs:{} s:{} m:{} l:{} xl:{}",
    d.xs, d.s, d.m, d.l, d.xl
  );
  let _ = writeln!(out);

  let commits = &report.commits;
  let _ = writeln!(out, "Commits");
  let _ = writeln!(
    out,
    "  {} total ({} merges), +{} / -{} lines",
    commits.total, commits.merge_commits, commits.total_additions, commits.total_deletions
  );
  for c in commits.top_contributors.iter().take(5) {
    let _ = writeln!(out, "    {:<24} {}", c.author, c.commits);
  }
  let _ = writeln!(out);

  let ai = &report.ai;
  let _ = writeln!(out, "AI assistance");
  let _ = writeln!(
    out,
    "  {} of {} commits ({:.0}%), {} authors",
    ai.summary.ai_commits,
    ai.summary.total_commits,
    ai.summary.ai_ratio * 100.0,
    ai.summary.users_with_ai
  );
  for t in &ai.by_tool {
    let _ = writeln!(out, "    {:<24} {} commits, {} users", t.tool.as_str(), t.commits, t.users);
  }
  for u in ai.by_user.iter().take(5) {
    let _ = writeln!(
      out,
      "    {:<24} {}/{} via {}",
      u.author,
      u.ai_commits,
      u.total_commits,
      u.primary_tool.as_str()
    );
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::metrics::calculate_report;
  use crate::model::DateRange;

  fn empty_report() -> MetricsReport {
    calculate_report(
      &[],
      &[],
      &[],
      &DateRange {
        start: "2024-03-01T00:00:00Z".into(),
        end: "2024-03-11T00:00:00Z".into(),
      },
      None,
    )
  }

  #[test]
  fn summary_names_every_section() {
    let text = render_summary(&empty_report());
    assert!(text.contains("DORA"));
    assert!(text.contains("Pull requests"));
    assert!(text.contains("Commits"));
    assert!(text.contains("AI assistance"));
    assert!(text.contains("2024-03-01T00:00:00Z .. 2024-03-11T00:00:00Z"));
  }

  #[test]
  fn mttr_is_reported_as_not_tracked() {
    let text = render_summary(&empty_report());
    assert!(text.contains("mean time to recovery   not tracked"));
  }

  #[test]
  fn empty_report_renders_zeroes_without_panicking() {
    let text = render_summary(&empty_report());
    assert!(text.contains("0 total (0 merged, 0 open, 0 closed)"));
    assert!(text.contains("0.00/day"));
  }
}
