// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Extraction settings document: author/label exclusions and draft-PR filtering
// role: config/settings
// inputs: Optional JSON settings file
// outputs: Settings value consumed by the extraction orchestrator
// invariants: Missing file or fields fall back to defaults; excludeDraftPRs defaults to true
// errors: Unreadable/invalid settings files bail with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::util::read_json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
  /// Exact-match exclusion against commit/PR author handles.
  pub exclude_authors: Vec<String>,
  /// Drop a PR when any of its labels matches one of these.
  pub exclude_labels: Vec<String>,
  #[serde(rename = "excludeDraftPRs")]
  pub exclude_draft_prs: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      exclude_authors: Vec::new(),
      exclude_labels: Vec::new(),
      exclude_draft_prs: true,
    }
  }
}

impl Settings {
  /// Load settings from a JSON file, or defaults when no path was given.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(p) => read_json(p),
      None => Ok(Self::default()),
    }
  }

  pub fn author_excluded(&self, author: &str) -> bool {
    self.exclude_authors.iter().any(|a| a == author)
  }

  pub fn any_label_excluded(&self, labels: &[String]) -> bool {
    labels.iter().any(|l| self.exclude_labels.iter().any(|x| x == l))
  }
}
