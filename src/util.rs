// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for timestamp parsing/formatting, JSON file IO, and man page rendering
// role: utilities/helpers
// inputs: RFC3339 strings; paths; clap CommandFactory
// outputs: Hour deltas, formatted timestamps, JSON documents on disk, man page text
// side_effects: read_json/write_json touch the filesystem
// invariants:
// - hours_between returns None when either timestamp fails to parse
// - iso_in_tz falls back to UTC for unknown zone names
// - write_json creates parent directories before writing
// errors: IO errors bubble with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use clap::CommandFactory;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Elapsed hours between two RFC3339 timestamps.
/// Returns None when either timestamp cannot be parsed.
pub fn hours_between(start_iso: &str, end_iso: &str) -> Option<f64> {
  let ps = DateTime::parse_from_rfc3339(start_iso).ok()?;
  let pe = DateTime::parse_from_rfc3339(end_iso).ok()?;
  Some((pe - ps).num_seconds() as f64 / 3600.0)
}

/// Whole days covered by a range, rounded up. Never less than 1 for a
/// non-empty forward range; 0 when the range is empty or unparsable.
pub fn range_days(start_iso: &str, end_iso: &str) -> i64 {
  let Some(hours) = hours_between(start_iso, end_iso) else {
    return 0;
  };

  if hours <= 0.0 {
    return 0;
  }

  (hours / 24.0).ceil() as i64
}

/// Calendar date (YYYY-MM-DD) of an RFC3339 timestamp in its recorded zone.
/// The offset carried by the timestamp is honored; we do not reinterpret
/// into the machine's local time.
pub fn recorded_date(iso: &str) -> Option<String> {
  DateTime::parse_from_rfc3339(iso)
    .ok()
    .map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Formats an instant as RFC3339 in the given zone label ("local", "utc",
/// or an IANA name). Unknown names fall back to UTC.
pub fn iso_in_tz(instant: DateTime<Utc>, tz: &str) -> String {
  if tz.eq_ignore_ascii_case("local") {
    return instant
      .with_timezone(&Local)
      .to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  if tz.eq_ignore_ascii_case("utc") {
    return instant.to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  match tz.parse::<Tz>() {
    Ok(zone) => zone
      .from_utc_datetime(&instant.naive_utc())
      .to_rfc3339_opts(SecondsFormat::Secs, true),
    Err(_) => instant.to_rfc3339_opts(SecondsFormat::Secs, true),
  }
}

/// Returns the effective "now" given an optional override.
///
/// Centralizes test determinism so `Utc::now()` is not sprinkled through
/// the extraction and calculation paths.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Write a pretty JSON document, creating parent directories as needed.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
  let path = path.as_ref();

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  let bytes = serde_json::to_vec_pretty(value)?;
  std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Read and deserialize a JSON document with path context on failure.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
  let path = path.as_ref();
  let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[test]
  fn hours_between_parses_rfc3339() {
    let h = hours_between("2024-01-01T00:00:00Z", "2024-01-01T04:00:00Z");
    assert_eq!(h, Some(4.0));
    assert_eq!(hours_between("not a date", "2024-01-01T00:00:00Z"), None);
  }

  #[test]
  fn hours_between_can_be_negative() {
    let h = hours_between("2024-01-02T00:00:00Z", "2024-01-01T00:00:00Z");
    assert_eq!(h, Some(-24.0));
  }

  #[test]
  fn range_days_rounds_up() {
    assert_eq!(range_days("2024-01-01T00:00:00Z", "2024-01-11T00:00:00Z"), 10);
    assert_eq!(range_days("2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z"), 1);
    assert_eq!(range_days("2024-01-02T00:00:00Z", "2024-01-01T00:00:00Z"), 0);
    assert_eq!(range_days("garbage", "2024-01-01T00:00:00Z"), 0);
  }

  #[test]
  fn recorded_date_keeps_commit_zone() {
    // 23:30 at +09:00 is the 15th in its own zone even though it is the
    // 14th in UTC
    assert_eq!(
      recorded_date("2024-03-15T23:30:00+09:00").as_deref(),
      Some("2024-03-15")
    );
    assert_eq!(recorded_date("nope"), None);
  }

  #[test]
  fn iso_formats_utc_and_unknown_zone() {
    let instant = Utc.with_ymd_and_hms(2024, 9, 12, 0, 30, 0).single().unwrap();
    assert!(iso_in_tz(instant, "utc").ends_with('Z'));
    // unknown zone falls back to UTC
    assert!(iso_in_tz(instant, "Not/AZone").ends_with('Z'));
    let tokyo = iso_in_tz(instant, "Asia/Tokyo");
    assert!(tokyo.contains("+09:00"));
  }

  #[test]
  fn write_and_read_json_roundtrip() {
    let td = tempfile::TempDir::new().unwrap();
    let path = td.path().join("nested/dir/doc.json");
    write_json(&path, &serde_json::json!({"ok": true})).unwrap();
    let v: serde_json::Value = read_json(&path).unwrap();
    assert_eq!(v["ok"], true);
  }

  #[test]
  fn read_json_missing_file_is_error_with_path() {
    let err = read_json::<serde_json::Value, _>("/definitely/missing.json").unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));
  }

  #[derive(Parser, Debug)]
  #[command(name = "dummy", version, about = "Dummy CLI", long_about = None)]
  struct DummyCli;

  #[test]
  fn render_man_page_produces_troff_text() {
    let page = render_man_page::<DummyCli>().expect("render manpage");
    assert!(page.contains(".TH"));
    assert!(page.to_lowercase().contains("dummy"));
  }
}
