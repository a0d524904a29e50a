// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the extraction date range from --days, --for phrases, or explicit --since/--until
// role: windowing/time
// inputs: WindowSpec, optional now override for deterministic tests
// outputs: DateRange with RFC3339 UTC start/end strings
// invariants:
// - Resolved ranges are forward (start <= end)
// - --days N means [now - N days, now]
// - --for phrases are parsed with two_timer relative to the effective now
// errors: Unparsable phrases or timestamps bail with the offending input
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use two_timer::parse as parse_natural;

use crate::model::DateRange;
use crate::util::effective_now;

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Days { days: u32 },
  ForPhrase { phrase: String },
  SinceUntil { since: String, until: String },
}

/// Parse a `--now-override` string into a UTC instant.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`, interpreted as UTC.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .map(|ndt| Utc.from_utc_datetime(&ndt))
      })
  })
}

fn iso_utc(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accept RFC3339 or a naive `%Y-%m-%dT%H:%M:%S` / `%Y-%m-%d` timestamp,
/// normalized to RFC3339 UTC.
fn normalize_timestamp(raw: &str) -> Result<String> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(iso_utc(dt.with_timezone(&Utc)));
  }

  if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
    return Ok(iso_utc(Utc.from_utc_datetime(&ndt)));
  }

  if let Ok(nd) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    let ndt = nd.and_hms_opt(0, 0, 0).context("constructing midnight")?;
    return Ok(iso_utc(Utc.from_utc_datetime(&ndt)));
  }

  bail!("unrecognized timestamp: {raw} (expected RFC3339 or YYYY-MM-DD[THH:MM:SS])")
}

/// Resolve a window selection into the concrete date range for a run.
pub fn resolve_range(window: &WindowSpec, now_opt: Option<DateTime<Utc>>) -> Result<DateRange> {
  let now = effective_now(now_opt);

  let (start, end) = match window {
    WindowSpec::Days { days } => {
      if *days == 0 {
        bail!("--days must be at least 1");
      }
      let start = now - Duration::days(i64::from(*days));
      (iso_utc(start), iso_utc(now))
    }
    WindowSpec::SinceUntil { since, until } => {
      (normalize_timestamp(since)?, normalize_timestamp(until)?)
    }
    WindowSpec::ForPhrase { phrase } => {
      // two_timer works in naive local time; anchor it at the effective now
      let anchor = now.with_timezone(&Local).naive_local();
      let config = two_timer::Config::new().now(anchor);
      let (s, e, _) = parse_natural(phrase, Some(config))
        .map_err(|e| anyhow::anyhow!("could not parse --for phrase {phrase:?}: {e:?}"))?;

      let to_utc = |ndt: chrono::NaiveDateTime| -> DateTime<Utc> {
        Local
          .from_local_datetime(&ndt)
          .single()
          .map(|dt| dt.with_timezone(&Utc))
          .unwrap_or_else(|| Utc.from_utc_datetime(&ndt))
      };

      (iso_utc(to_utc(s)), iso_utc(to_utc(e)))
    }
  };

  if start > end {
    bail!("window start {start} is after end {end}");
  }

  Ok(DateRange { start, end })
}
