// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for extraction (GitHub API seam, per-repo orchestration)
// role: extraction/namespace
// outputs: Public submodules implementing repository data extraction
// invariants: Extraction isolates external integrations and remains best-effort per repo
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github_api;
pub mod orchestrator;
