use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use gitlab_release::config::{self, ConfigOverrides};
use gitlab_release::gitlab::GitLabClient;
use gitlab_release::release::{ReleaseOrchestrator, ReleaseOutcome};
use gitlab_release::ui::{self, ConsoleReporter};
use gitlab_release::ReleaseError;

#[derive(clap::Parser)]
#[command(
    name = "gitlab-release",
    version,
    about = "Merge the release branch and tag the next version on GitLab"
)]
struct Args {
    #[arg(long, help = "GitLab access token [env: GITLAB_ACCESS_TOKEN]")]
    token: Option<String>,

    #[arg(long, help = "Project id or path [env: GITLAB_PROJECT_ID]")]
    project: Option<String>,

    #[arg(long, help = "GitLab API base URL [default: https://gitlab.com/api/v4]")]
    api: Option<String>,

    #[arg(long, help = "Branch to merge from [default: development]")]
    source_branch: Option<String>,

    #[arg(long, help = "Branch to merge into and tag [default: main]")]
    target_branch: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Environment file to read [default: .env]")]
    env_file: Option<PathBuf>,

    #[arg(long, help = "Fail instead of starting from v0.0.0 when no tag exists")]
    no_bootstrap: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            token: self.token.clone(),
            project: self.project.clone(),
            api_url: self.api.clone(),
            source_branch: self.source_branch.clone(),
            target_branch: self.target_branch.clone(),
            config_path: self.config.clone(),
            env_file: self.env_file.clone(),
            no_bootstrap: self.no_bootstrap,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    ui::display_banner();

    match release(&args) {
        Ok(outcome) => {
            ui::display_header("Ready to deploy 🚀");
            ui::display_success("Previous tag:", &outcome.previous_tag);
            ui::display_success("New tag:", &outcome.new_tag);
            ui::display_success("Tagged at:", &outcome.tagged_ref);
            if let Some(url) = &outcome.web_url {
                ui::display_success("Merge request:", url);
            }
            Ok(())
        }
        Err(err) => {
            ui::display_error(&format!("{:#}", err));
            let code = err
                .downcast_ref::<ReleaseError>()
                .map_or(1, ReleaseError::exit_code);
            process::exit(code);
        }
    }
}

fn release(args: &Args) -> Result<ReleaseOutcome> {
    let config = config::load_config(&args.overrides())?;
    log::debug!("resolved configuration: {:?}", config);

    ui::display_status(&format!(
        "Releasing {} -> {} for project {}",
        config.branches.source, config.branches.target, config.project
    ));

    let client = GitLabClient::new(
        &config.api_url,
        &config.project,
        &config.token,
        config.timeout,
    )?;

    // Log output and the spinner share stderr.
    let reporter = if args.verbose > 0 {
        ConsoleReporter::plain()
    } else {
        ConsoleReporter::new()
    };
    let mut orchestrator = ReleaseOrchestrator::from_config(client, reporter, &config);
    let outcome = orchestrator
        .run()
        .with_context(|| format!("release of project {} aborted", config.project))?;
    Ok(outcome)
}
