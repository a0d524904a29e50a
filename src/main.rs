use anyhow::Result;
use clap::Parser;

mod ai;
mod artifacts;
mod cli;
mod ext;
mod extraction;
mod metrics;
mod model;
mod normalize;
mod render;
mod settings;
mod stats;
mod util;
mod window;

use crate::cli::{Action, Cli, ReportSink, normalize};
use crate::settings::Settings;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let action = normalize(&cli)?;

  // Phase 2: resolve now (deterministic runs pass --now-override)
  let now_opt = crate::window::parse_now_override(cli.now_override.as_deref());

  // Phase 3: dispatch
  match action {
    Action::GenMan => unreachable!("handled before normalization"),
    Action::Extract {
      repos,
      window,
      settings_path,
      out_dir,
    } => {
      let range = crate::window::resolve_range(&window, now_opt)?;
      let settings = Settings::load(settings_path.as_deref())?;
      let token = crate::extraction::github_api::get_github_token();
      let api = crate::extraction::github_api::build_api(token);

      let artifacts = crate::extraction::orchestrator::extract(&repos, &range, &settings, api.as_ref(), now_opt);
      artifacts.write(&out_dir)?;

      eprintln!(
        "[extract] wrote {} pull requests, {} commits, {} deployments to {}",
        artifacts.pull_requests.record_count(),
        artifacts.commits.record_count(),
        artifacts.deployments.record_count(),
        out_dir.display()
      );
      Ok(())
    }
    Action::Metrics { input, sink, tz } => {
      let data = crate::artifacts::ExtractionArtifacts::read(&input)?;

      let prs: Vec<_> = data.pull_requests.flatten().into_iter().cloned().collect();
      let commits: Vec<_> = data.commits.flatten().into_iter().cloned().collect();
      let deployments: Vec<_> = data.deployments.flatten().into_iter().cloned().collect();

      let mut report =
        crate::metrics::calculate_report(&prs, &commits, &deployments, &data.pull_requests.date_range, now_opt);
      report.calculated_at = util::iso_in_tz(util::effective_now(now_opt), &tz);

      let summary = crate::render::render_summary(&report);

      match sink {
        ReportSink::Stdout => {
          // JSON owns stdout; the summary moves to stderr
          println!("{}", serde_json::to_string_pretty(&report)?);
          eprint!("{}", summary);
        }
        ReportSink::File(path) => {
          crate::artifacts::write_report(&path, &report)?;
          print!("{}", summary);
          eprintln!("[metrics] wrote {}", path.display());
        }
      }
      Ok(())
    }
  }
}
