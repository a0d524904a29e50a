// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: CLI surface (clap derive) and normalization into one validated action
// role: cli/parse+normalize
// inputs: argv
// outputs: Action value consumed by main
// invariants:
// - Exactly one window selector per extract run; none given means --days 30
// - --since and --until travel together
// - Hidden flags: --gen-man, --now-override
// errors: Conflicting or incomplete flag combinations bail before any IO
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use crate::window::WindowSpec;

const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Parser, Debug)]
#[command(
  name = "delivery-metrics",
  version,
  about = "Extract GitHub delivery activity and calculate DORA + AI-assistance metrics",
  long_about = None
)]
pub struct Cli {
  /// Print a man page to stdout and exit.
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the current instant (RFC3339 or YYYY-MM-DDTHH:MM:SS, UTC).
  #[arg(long, hide = true, value_name = "TIMESTAMP")]
  pub now_override: Option<String>,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Fetch pull requests, commits, and deployments for a set of repositories.
  Extract(ExtractArgs),
  /// Calculate the metrics report from previously extracted data.
  Metrics(MetricsArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
  /// Repositories as owner/name, comma separated or repeated.
  #[arg(long, required = true, value_delimiter = ',', value_name = "OWNER/NAME")]
  pub repos: Vec<String>,

  /// Look back N days from now.
  #[arg(long, value_name = "N")]
  pub days: Option<u32>,

  /// Natural-language window, e.g. "last month".
  #[arg(long = "for", value_name = "PHRASE")]
  pub for_phrase: Option<String>,

  /// Window start (RFC3339 or YYYY-MM-DD). Requires --until.
  #[arg(long, value_name = "TIMESTAMP")]
  pub since: Option<String>,

  /// Window end (RFC3339 or YYYY-MM-DD). Requires --since.
  #[arg(long, value_name = "TIMESTAMP")]
  pub until: Option<String>,

  /// JSON settings file (exclusions, draft filtering).
  #[arg(long, value_name = "FILE")]
  pub settings: Option<PathBuf>,

  /// Output directory for the raw envelopes.
  #[arg(long, default_value = "./metrics-data", value_name = "DIR")]
  pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
  /// Directory holding the extracted envelopes.
  #[arg(long, default_value = "./metrics-data", value_name = "DIR")]
  pub input: PathBuf,

  /// Report destination: a file path, or "-" for stdout.
  #[arg(long, value_name = "FILE|-")]
  pub out: Option<String>,

  /// Timezone label for display timestamps: utc, local, or an IANA name.
  #[arg(long, default_value = "utc", value_name = "ZONE")]
  pub tz: String,
}

/// Where the metrics document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
  Stdout,
  File(PathBuf),
}

/// One validated action for main to dispatch on.
#[derive(Debug)]
pub enum Action {
  GenMan,
  Extract {
    repos: Vec<String>,
    window: WindowSpec,
    settings_path: Option<PathBuf>,
    out_dir: PathBuf,
  },
  Metrics {
    input: PathBuf,
    sink: ReportSink,
    tz: String,
  },
}

/// Validate the parsed CLI into a single action.
pub fn normalize(cli: &Cli) -> Result<Action> {
  if cli.gen_man {
    return Ok(Action::GenMan);
  }

  let Some(command) = &cli.command else {
    bail!("a subcommand is required: extract or metrics (see --help)");
  };

  match command {
    Command::Extract(args) => {
      let window = resolve_window_flags(args)?;

      Ok(Action::Extract {
        repos: args.repos.clone(),
        window,
        settings_path: args.settings.clone(),
        out_dir: args.out.clone(),
      })
    }
    Command::Metrics(args) => {
      let sink = match args.out.as_deref() {
        None => ReportSink::File(crate::artifacts::report_path(&args.input)),
        Some("-") => ReportSink::Stdout,
        Some(path) => ReportSink::File(PathBuf::from(path)),
      };

      Ok(Action::Metrics {
        input: args.input.clone(),
        sink,
        tz: args.tz.clone(),
      })
    }
  }
}

fn resolve_window_flags(args: &ExtractArgs) -> Result<WindowSpec> {
  let has_days = args.days.is_some();
  let has_phrase = args.for_phrase.is_some();
  let has_bounds = args.since.is_some() || args.until.is_some();

  let selected = [has_days, has_phrase, has_bounds].iter().filter(|b| **b).count();

  if selected > 1 {
    bail!("--days, --for, and --since/--until are mutually exclusive");
  }

  if let Some(days) = args.days {
    return Ok(WindowSpec::Days { days });
  }

  if let Some(phrase) = &args.for_phrase {
    return Ok(WindowSpec::ForPhrase { phrase: phrase.clone() });
  }

  if has_bounds {
    let (Some(since), Some(until)) = (&args.since, &args.until) else {
      bail!("--since and --until must be given together");
    };
    return Ok(WindowSpec::SinceUntil {
      since: since.clone(),
      until: until.clone(),
    });
  }

  Ok(WindowSpec::Days {
    days: DEFAULT_WINDOW_DAYS,
  })
}
