use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use git_release_tag::cli::{Orchestrator, RunOptions, TagOutcome};
use git_release_tag::config::{self, Backend};
use git_release_tag::git::command::DEFAULT_TIMEOUT;
use git_release_tag::git::{Git2Repository, SystemGit, VersionControl};
use git_release_tag::ui::Reporter;
use git_release_tag::{logging, ReleaseTagError};

#[derive(clap::Parser)]
#[command(
    name = "git-release-tag",
    version,
    about = "Create the next signed release tag on a maintenance branch"
)]
struct Args {
    #[arg(short = 'C', long, default_value = ".", help = "Repository to operate on")]
    repo: PathBuf,

    #[arg(short, long, help = "Select the release series from this branch instead of HEAD's")]
    branch: Option<String>,

    #[arg(short, long, help = "Tag message (default: from the configured template)")]
    message: Option<String>,

    #[arg(short = 'n', long, help = "Compute and print the tag without creating it")]
    dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, value_enum, help = "Git backend (overrides configuration)")]
    backend: Option<Backend>,

    #[arg(long, value_name = "SECS", help = "Timeout for each git command")]
    timeout: Option<u64>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More logging (-v debug, -vv trace)")]
    verbose: u8,
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "git-release-tag".to_string())
}

fn main() -> ExitCode {
    let reporter = Reporter::new(program_name());

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                reporter.usage_error(&clap_message(&e));
                return ExitCode::from(1);
            }
        },
    };

    logging::init(args.verbose);

    match run(&args) {
        Ok(outcome) => {
            reporter.outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let usage = e
                .downcast_ref::<ReleaseTagError>()
                .is_some_and(ReleaseTagError::is_usage);
            if usage {
                reporter.usage_error(&format!("{:#}", e));
            } else {
                reporter.error(&format!("{:#}", e));
            }
            ExitCode::from(1)
        }
    }
}

/// First line of a clap error without its own "error: " prefix
fn clap_message(e: &clap::Error) -> String {
    let rendered = console::strip_ansi_codes(&e.to_string()).into_owned();
    let first = rendered.lines().next().unwrap_or("invalid arguments");
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn run(args: &Args) -> Result<TagOutcome> {
    if args.timeout == Some(0) {
        return Err(ReleaseTagError::usage("--timeout must be greater than zero").into());
    }

    // Config and project name belong to the work tree root, not to -C
    let flag_timeout = args.timeout.map(Duration::from_secs);
    let root = open_backend(
        args.backend.unwrap_or_default(),
        &args.repo,
        flag_timeout.unwrap_or(DEFAULT_TIMEOUT),
    )?
    .work_tree()?;

    let config = config::load_config(args.config.as_deref(), &root)?;
    let backend = args.backend.unwrap_or(config.backend);
    let timeout = flag_timeout.unwrap_or(Duration::from_secs(config.command_timeout_secs));

    let options = RunOptions {
        project: config.project_name(&root),
        message_template: config.tag.message.clone(),
        branch_override: args.branch.clone(),
        message_override: args.message.clone(),
        dry_run: args.dry_run,
    };

    tracing::debug!(
        ?backend,
        root = %root.display(),
        timeout_secs = timeout.as_secs(),
        "starting"
    );

    let repo = open_backend(backend, &root, timeout)?;
    Ok(Orchestrator::new(repo.as_ref(), options).run()?)
}

fn open_backend(
    backend: Backend,
    path: &Path,
    timeout: Duration,
) -> Result<Box<dyn VersionControl>> {
    let repo: Box<dyn VersionControl> = match backend {
        Backend::Cli => Box::new(SystemGit::new(path).with_timeout(timeout)),
        Backend::Git2 => Box::new(Git2Repository::open(path)?.with_timeout(timeout)),
    };
    Ok(repo)
}
