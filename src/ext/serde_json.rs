// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Provide ergonomic nested JSON fetching via dotted paths plus default-fill extraction for raw host records
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper for typed extraction with normalizer-friendly defaults
// invariants: No panics; missing paths yield None; *_or_zero / *_or helpers never propagate null into entities
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, returning `T::default()` on failure.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Numeric default-fill rule for raw host records: absent or malformed counts are 0.
  pub fn to_i64_or_zero(&self) -> i64 {
    self.inner.and_then(|v| v.as_i64()).unwrap_or(0)
  }

  /// String default-fill with an explicit sentinel (e.g. "unknown" for missing authors).
  pub fn to_str_or(&self, fallback: &str) -> String {
    self
      .inner
      .and_then(|v| v.as_str())
      .map(|s| s.to_string())
      .unwrap_or_else(|| fallback.to_string())
  }

  /// Borrow the fetched value as an array slice; missing or non-array yields an empty slice.
  pub fn array(&self) -> &'a [serde_json::Value] {
    self.inner.and_then(|v| v.as_array()).map(|a| a.as_slice()).unwrap_or(&[])
  }
}

/// Extension to fetch nested values via dotted paths like "user.login".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fetch_top_level_and_nested() {
    let v: serde_json::Value = serde_json::json!({
      "number": 7,
      "user": { "login": "octocat" },
      "labels": [{"name": "bug"}]
    });

    assert_eq!(v.fetch("number").to::<i64>(), Some(7));
    assert_eq!(v.fetch("user.login").to::<String>().as_deref(), Some("octocat"));
    assert_eq!(v.fetch("missing.path").to::<String>(), None);
    assert!(v.fetch("").to::<serde_json::Value>().is_some());
  }

  #[test]
  fn default_fill_helpers() {
    let v: serde_json::Value = serde_json::json!({ "stats": { "additions": 3 }, "author": null });

    assert_eq!(v.fetch("stats.additions").to_i64_or_zero(), 3);
    assert_eq!(v.fetch("stats.deletions").to_i64_or_zero(), 0);
    assert_eq!(v.fetch("stats.additions").to_str_or("unknown"), "unknown");
    assert_eq!(v.fetch("author.login").to_str_or("unknown"), "unknown");
  }

  #[test]
  fn array_is_empty_for_missing_or_scalar() {
    let v: serde_json::Value = serde_json::json!({ "parents": [{"sha": "a"}], "title": "x" });

    assert_eq!(v.fetch("parents").array().len(), 1);
    assert!(v.fetch("title").array().is_empty());
    assert!(v.fetch("nope").array().is_empty());
  }
}
