// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Shared statistics primitives: average/median/p90, duration formatting, PR size bucketing, rounding
// role: domain/statistics
// inputs: Numeric sequences (hours, line counts)
// outputs: Stats snapshots and display strings
// invariants:
// - Empty input yields all-zero stats, never NaN/Infinity
// - Median is the upper median (sorted[n/2]); p90 is sorted[floor(n*0.9)]
// - Size bucket boundaries are half-open; a boundary value belongs to the higher bucket
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

use crate::model::{DurationMetric, SizeDistribution};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
  pub average: f64,
  pub median: f64,
  pub p90: f64,
}

pub fn round1(v: f64) -> f64 {
  (v * 10.0).round() / 10.0
}

pub fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Average, median, and p90 of a sample, each rounded to 1 decimal.
///
/// The median is the upper median for even-length samples (sorted[n/2], not
/// an interpolated midpoint); downstream numbers depend on this convention,
/// so it must not be "fixed".
pub fn calculate_stats(values: &[f64]) -> Stats {
  if values.is_empty() {
    return Stats {
      average: 0.0,
      median: 0.0,
      p90: 0.0,
    };
  }

  let mut sorted: Vec<f64> = values.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

  let n = sorted.len();
  let average = sorted.iter().sum::<f64>() / n as f64;
  let median = sorted[n / 2];
  let p90 = sorted[((n as f64) * 0.9).floor() as usize];

  Stats {
    average: round1(average),
    median: round1(median),
    p90: round1(p90),
  }
}

/// Render an hour count for humans: minutes under 1h, hours under a day,
/// days under a week, weeks beyond.
pub fn format_duration(hours: f64) -> String {
  if hours < 1.0 {
    format!("{}m", (hours * 60.0).round() as i64)
  } else if hours < 24.0 {
    format!("{:.1}h", hours)
  } else if hours < 168.0 {
    format!("{:.1}d", hours / 24.0)
  } else {
    format!("{:.1}w", hours / 168.0)
  }
}

/// A duration stats snapshot for the report, with the median pre-formatted.
pub fn duration_metric(values: &[f64]) -> DurationMetric {
  let stats = calculate_stats(values);

  DurationMetric {
    average_hours: stats.average,
    median_hours: stats.median,
    p90_hours: stats.p90,
    median_formatted: format_duration(stats.median),
  }
}

/// Bucket PRs by total changed lines (additions + deletions).
/// Half-open intervals; exactly 10 lines lands in `s`, not `xs`.
pub fn size_distribution<I: IntoIterator<Item = i64>>(changed_lines: I) -> SizeDistribution {
  let mut dist = SizeDistribution {
    xs: 0,
    s: 0,
    m: 0,
    l: 0,
    xl: 0,
  };

  for total in changed_lines {
    if total < 10 {
      dist.xs += 1;
    } else if total < 100 {
      dist.s += 1;
    } else if total < 500 {
      dist.m += 1;
    } else if total < 1000 {
      dist.l += 1;
    } else {
      dist.xl += 1;
    }
  }

  dist
}

/// Count items by key preserving first-seen order, then return the top `n`
/// entries sorted descending by count. Ties keep insertion order (stable sort),
/// which makes the ranking deterministic for equal counts.
pub fn top_counts<I, K>(keys: I, n: usize) -> Vec<(K, usize)>
where
  I: IntoIterator<Item = K>,
  K: Eq + std::hash::Hash + Clone,
{
  let mut index: std::collections::HashMap<K, usize> = std::collections::HashMap::new();
  let mut counts: Vec<(K, usize)> = Vec::new();

  for key in keys {
    match index.get(&key) {
      Some(&i) => counts[i].1 += 1,
      None => {
        index.insert(key.clone(), counts.len());
        counts.push((key, 1));
      }
    }
  }

  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts.truncate(n);
  counts
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn empty_stats_are_zero() {
    let s = calculate_stats(&[]);
    assert_eq!(s.average, 0.0);
    assert_eq!(s.median, 0.0);
    assert_eq!(s.p90, 0.0);
  }

  #[test]
  fn odd_sample_median_is_middle() {
    let s = calculate_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(s.median, 3.0);
    assert_eq!(s.average, 3.0);
    assert_eq!(s.p90, 5.0);
  }

  #[test]
  fn even_sample_uses_upper_median() {
    // sorted[4/2] = sorted[2] = 3, not the interpolated 2.5
    let s = calculate_stats(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(s.median, 3.0);
  }

  #[test]
  fn stats_sort_before_indexing() {
    let s = calculate_stats(&[5.0, 1.0, 4.0, 2.0, 3.0]);
    assert_eq!(s.median, 3.0);
    assert_eq!(s.p90, 5.0);
  }

  #[test]
  fn duration_formatting_boundaries() {
    assert_eq!(format_duration(0.5), "30m");
    assert_eq!(format_duration(0.99), "59m");
    assert_eq!(format_duration(1.0), "1.0h");
    assert_eq!(format_duration(5.0), "5.0h");
    assert_eq!(format_duration(23.99), "24.0h");
    assert_eq!(format_duration(24.0), "1.0d");
    assert_eq!(format_duration(48.0), "2.0d");
    assert_eq!(format_duration(167.99), "7.0d");
    assert_eq!(format_duration(168.0), "1.0w");
  }

  #[test]
  fn size_bucket_boundaries_go_high() {
    let d = size_distribution([9, 10, 99, 100, 499, 500, 999, 1000]);
    assert_eq!(d.xs, 1);
    assert_eq!(d.s, 2); // 10 and 99
    assert_eq!(d.m, 2); // 100 and 499
    assert_eq!(d.l, 2); // 500 and 999
    assert_eq!(d.xl, 1);
  }

  #[test]
  fn top_counts_breaks_ties_by_insertion_order() {
    let ranked = top_counts(["b", "a", "b", "a", "c"], 10);
    // a and b both have 2; b was seen first and must stay first
    assert_eq!(ranked[0], ("b", 2));
    assert_eq!(ranked[1], ("a", 2));
    assert_eq!(ranked[2], ("c", 1));
  }

  #[test]
  fn top_counts_truncates() {
    let ranked = top_counts(["a", "b", "c", "a"], 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0], ("a", 2));
  }

  proptest! {
    #[test]
    fn median_is_a_sample_element(values in proptest::collection::vec(0.0f64..10_000.0, 1..50)) {
      let s = calculate_stats(&values);
      let hit = values.iter().any(|v| (round1(*v) - s.median).abs() < 1e-9);
      prop_assert!(hit, "median {} not drawn from sample", s.median);
    }

    #[test]
    fn p90_at_least_median(values in proptest::collection::vec(0.0f64..10_000.0, 1..50)) {
      let s = calculate_stats(&values);
      prop_assert!(s.p90 + 1e-9 >= s.median);
    }

    #[test]
    fn format_duration_is_total(hours in 0.0f64..100_000.0) {
      let out = format_duration(hours);
      prop_assert!(out.ends_with('m') || out.ends_with('h') || out.ends_with('d') || out.ends_with('w'));
    }
  }
}
