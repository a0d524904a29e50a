// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Classify commit authorship signals as AI-tool co-authorship and parse Co-Authored-By trailers
// role: domain/classifier
// inputs: (name, email) pairs and free-text commit messages
// outputs: Option<AiTool> classifications, deduplicated AiCoAuthor lists, inline-indicator booleans
// invariants:
// - Bot exclusion takes precedence over every AI-tool pattern
// - Pattern tables are fixed, ordered slices; first literal match wins
// - Never panics; malformed input resolves to None/false
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{AiCoAuthor, AiTool};

/// One entry in the known-tool table. When both fields are present, both must
/// match (AND); a single field matches on its own.
struct ToolPattern {
  name_re: Option<Regex>,
  email_re: Option<Regex>,
}

impl ToolPattern {
  fn name(re: &str) -> Self {
    Self {
      name_re: Some(Regex::new(re).unwrap()),
      email_re: None,
    }
  }

  fn email(re: &str) -> Self {
    Self {
      name_re: None,
      email_re: Some(Regex::new(re).unwrap()),
    }
  }

  fn both(name: &str, email: &str) -> Self {
    Self {
      name_re: Some(Regex::new(name).unwrap()),
      email_re: Some(Regex::new(email).unwrap()),
    }
  }

  fn matches(&self, name: &str, email: &str) -> bool {
    match (&self.name_re, &self.email_re) {
      (Some(n), Some(e)) => n.is_match(name) && e.is_match(email),
      (Some(n), None) => n.is_match(name),
      (None, Some(e)) => e.is_match(email),
      (None, None) => false,
    }
  }
}

/// Known non-AI automation accounts. Matched against "name email" as one
/// string so a marker in either field excludes the account. This gate runs
/// before any AI-tool pattern: an account that looks like both a CI bot and
/// an AI tool is treated as non-AI.
static BOT_EXCLUSIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"(?i)dependabot",
    r"(?i)renovate",
    r"(?i)greenkeeper",
    r"(?i)snyk",
    r"(?i)github-actions",
    r"(?i)actions-user",
    r"(?i)codecov",
    r"(?i)coveralls",
    r"(?i)circleci",
    r"(?i)travis",
    r"(?i)jenkins",
    r"(?i)azure-pipelines",
    r"(?i)gitlab-ci",
    r"(?i)netlify",
    r"(?i)vercel",
    r"(?i)mergify",
    r"(?i)imgbot",
    r"(?i)allcontributors",
    r"(?i)whitesource",
    r"(?i)web-flow",
    r"(?i)release",
    r"(?i)merge[-_ ]?bot",
    r"(?i)sync[-_ ]?bot",
    r"(?i)deploy[-_ ]?bot",
    r"(?i)ci[-_ ]bot",
    r"(?i)build[-_ ]?bot",
  ]
  .iter()
  .map(|p| Regex::new(p).unwrap())
  .collect()
});

/// Ordered known-tool table. Order is an implementation-defined tie-break
/// only; entries do not overlap in practice.
static TOOL_PATTERNS: Lazy<Vec<(AiTool, Vec<ToolPattern>)>> = Lazy::new(|| {
  vec![
    (
      AiTool::Copilot,
      vec![
        ToolPattern::email(r"(?i)copilot@users\.noreply\.github\.com"),
        ToolPattern::name(r"(?i)\bgithub\s+copilot\b"),
        ToolPattern::name(r"(?i)\bcopilot\b"),
      ],
    ),
    (
      AiTool::Claude,
      vec![
        ToolPattern::both(r"(?i)\bclaude\b", r"(?i)@anthropic\.com"),
        ToolPattern::email(r"(?i)noreply@anthropic\.com"),
        ToolPattern::name(r"(?i)\bclaude\b"),
      ],
    ),
    (
      AiTool::Cursor,
      vec![
        ToolPattern::email(r"(?i)@cursor\.(so|sh|com)\b"),
        ToolPattern::name(r"(?i)\bcursor\b"),
      ],
    ),
    (
      AiTool::Codeium,
      vec![
        ToolPattern::email(r"(?i)@codeium\.com"),
        ToolPattern::name(r"(?i)\bcodeium\b"),
      ],
    ),
    (
      AiTool::AmazonQ,
      vec![
        ToolPattern::email(r"(?i)amazon-q|codewhisperer"),
        ToolPattern::name(r"(?i)\bamazon\s*q\b"),
      ],
    ),
    (
      AiTool::Gemini,
      vec![
        ToolPattern::both(r"(?i)\bgemini\b", r"(?i)@google\.com"),
        ToolPattern::name(r"(?i)\bgemini\b"),
      ],
    ),
  ]
});

/// Generic markers for unnamed AI assistance. Deliberately narrower than a
/// bare `\bai\b` so words like "again" or unrelated bot names never match.
static GENERIC_AI_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"(?i)\bai[-_](assistant|agent|pair|coder)\b",
    r"(?i)\bai-generated\b",
    r"(?i)\bllm\b",
    r"(?i)\bgpt-?\w*\b",
    r"(?i)\bchatgpt\b",
    r"(?i)\bopenai\b",
    r"(?i)\bcodegen\b",
  ]
  .iter()
  .map(|p| Regex::new(p).unwrap())
  .collect()
});

static RE_CO_AUTHOR: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?im)^\s*co-authored-by:\s*(.+?)\s*<([^<>]+)>\s*$").unwrap());

static INLINE_AI_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"(?i)\[ai\]",
    r"(?i)\[ai-generated\]",
    r"(?i)\bai-assisted\b",
    r"(?i)generated\s+(by|with)\s+(an?\s+)?(ai|copilot|claude|cursor|codeium)\b",
  ]
  .iter()
  .map(|p| Regex::new(p).unwrap())
  .collect()
});

/// Classify a (name, email) pair as a known AI tool, a generic AI assistant,
/// or nothing. Strict order: bot gate, known-tool table, generic fallback.
pub fn classify(name: &str, email: &str) -> Option<AiTool> {
  if name.trim().is_empty() && email.trim().is_empty() {
    return None;
  }

  // Phase 1: bot exclusion gate
  let combined = format!("{} {}", name, email);

  if BOT_EXCLUSIONS.iter().any(|re| re.is_match(&combined)) {
    return None;
  }

  // Phase 2: known-tool patterns, first literal match wins
  for (tool, patterns) in TOOL_PATTERNS.iter() {
    if patterns.iter().any(|p| p.matches(name, email)) {
      return Some(*tool);
    }
  }

  // Phase 3: generic fallback
  if GENERIC_AI_MARKERS.iter().any(|re| re.is_match(&combined)) {
    return Some(AiTool::Other);
  }

  None
}

/// Parse `Co-Authored-By: Name <email>` trailers from a commit message,
/// deduplicate by lowercase (name, email) preserving first-seen order, and
/// keep only pairs that classify as AI tools.
pub fn detect_co_authors(message: &str) -> Vec<AiCoAuthor> {
  let mut seen: Vec<(String, String)> = Vec::new();
  let mut out: Vec<AiCoAuthor> = Vec::new();

  for caps in RE_CO_AUTHOR.captures_iter(message) {
    let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    let email = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    let key = (name.to_lowercase(), email.to_lowercase());

    if seen.contains(&key) {
      continue;
    }
    seen.push(key.clone());

    if let Some(tool) = classify(name, email) {
      out.push(AiCoAuthor {
        name: name.to_string(),
        email: key.1,
        tool,
      });
    }
  }

  out
}

/// Explicit bracket/phrase tags in the message body. Supplements co-author
/// detection when deciding `isAIAssisted`; it does not replace it.
pub fn has_inline_ai_indicator(message: &str) -> bool {
  if message.is_empty() {
    return false;
  }
  INLINE_AI_INDICATORS.iter().any(|re| re.is_match(message))
}
