// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: On-disk artifact layout: raw extraction envelopes and the metrics report document
// role: persistence/artifacts
// inputs: Extraction output keyed by repository; metrics report values
// outputs: pull-requests.json / commits.json / deployments.json envelopes, metrics-report.json
// invariants:
// - Envelope repository keys are sorted (BTreeMap) so writes are reproducible
// - Every envelope carries the window it was extracted for
// errors: IO and parse failures bubble with path context via util::{read_json,write_json}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{Commit, DateRange, Deployment, MetricsReport, PullRequest};
use crate::util::{read_json, write_json};

pub const PULL_REQUESTS_FILE: &str = "pull-requests.json";
pub const COMMITS_FILE: &str = "commits.json";
pub const DEPLOYMENTS_FILE: &str = "deployments.json";
pub const METRICS_REPORT_FILE: &str = "metrics-report.json";

/// Wrapper for raw extraction output: records grouped per repository plus
/// the window they cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope<T> {
  pub extracted_at: String,
  pub date_range: DateRange,
  pub repositories: BTreeMap<String, Vec<T>>,
}

impl<T> RawEnvelope<T> {
  pub fn new(extracted_at: String, date_range: DateRange) -> Self {
    Self {
      extracted_at,
      date_range,
      repositories: BTreeMap::new(),
    }
  }

  /// All records across repositories, flattened in repository-key order.
  pub fn flatten(&self) -> Vec<&T> {
    self.repositories.values().flatten().collect()
  }

  pub fn record_count(&self) -> usize {
    self.repositories.values().map(Vec::len).sum()
  }
}

#[derive(Debug)]
pub struct ExtractionArtifacts {
  pub pull_requests: RawEnvelope<PullRequest>,
  pub commits: RawEnvelope<Commit>,
  pub deployments: RawEnvelope<Deployment>,
}

impl ExtractionArtifacts {
  /// Write the three envelopes under `dir`.
  pub fn write(&self, dir: &Path) -> Result<()> {
    write_json(dir.join(PULL_REQUESTS_FILE), &self.pull_requests)?;
    write_json(dir.join(COMMITS_FILE), &self.commits)?;
    write_json(dir.join(DEPLOYMENTS_FILE), &self.deployments)?;
    Ok(())
  }

  /// Read the three envelopes back from `dir`.
  pub fn read(dir: &Path) -> Result<Self> {
    Ok(Self {
      pull_requests: read_envelope(dir, PULL_REQUESTS_FILE)?,
      commits: read_envelope(dir, COMMITS_FILE)?,
      deployments: read_envelope(dir, DEPLOYMENTS_FILE)?,
    })
  }
}

fn read_envelope<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<RawEnvelope<T>> {
  read_json(dir.join(file))
}

pub fn report_path(dir: &Path) -> PathBuf {
  dir.join(METRICS_REPORT_FILE)
}

pub fn write_report(path: &Path, report: &MetricsReport) -> Result<()> {
  write_json(path, report)
}
