use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use crate::changelog;
use crate::config;
use crate::model::operation::Operation;
use crate::model::outcome::{TicketOutcome, TicketReport};
use crate::release::ReleaseOrchestrator;
use crate::tracker::JiraClient;

const USAGE: &str = "Usage: jira-release [--config <path>] release <version> <changelog>\n       jira-release [--config <path>] verify [<version>] <changelog>\n\nPass '-' as <changelog> to read it from stdin.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Release { version: String },
    Verify,
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Release { .. } => Operation::Release,
            Command::Verify => Operation::Verify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogSource {
    Text(String),
    Stdin,
}

impl ChangelogSource {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ChangelogSource::Stdin
        } else {
            ChangelogSource::Text(arg.to_string())
        }
    }

    fn read(self) -> Result<String> {
        match self {
            ChangelogSource::Text(text) => Ok(text),
            ChangelogSource::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read changelog from stdin")?;
                Ok(text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub changelog: ChangelogSource,
    pub config_path: Option<PathBuf>,
}

/// True when `-h`/`--help` appears among the flags before the operation.
pub fn wants_help(args: &[String]) -> bool {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return true,
            "-c" | "--config" => {
                iter.next();
            }
            _ => return false,
        }
    }
    false
}

/// Parse process arguments (without the program name).
///
/// Flags are only recognised before the operation; everything after it is
/// positional, so a changelog may itself look like a flag.
///
/// Supported forms:
///   jira-release release 1.4.0 "ADA-1 fixed"
///   jira-release verify "ADA-1 fixed"
///   jira-release verify 1.4.0 "ADA-1 fixed"    (version is ignored)
///   jira-release --config ./jira.toml release 1.4.0 -
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut config_path = None;
    let mut iter = args.iter();
    let mut op = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => match iter.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("Missing value for --config flag"),
            },
            other => {
                op = Some(other);
                break;
            }
        }
    }

    let Some(op) = op else {
        bail!("{USAGE}");
    };
    let operation: Operation = op.parse()?;
    let rest: Vec<&str> = iter.map(String::as_str).collect();

    let (command, changelog) = match (operation, rest.as_slice()) {
        (Operation::Release, [version, changelog]) => {
            if version.trim().is_empty() {
                bail!("Release version cannot be empty");
            }
            (
                Command::Release {
                    version: version.to_string(),
                },
                changelog,
            )
        }
        (Operation::Verify, [changelog]) | (Operation::Verify, [_, changelog]) => {
            (Command::Verify, changelog)
        }
        _ => bail!("Wrong number of arguments for '{operation}'\n\n{USAGE}"),
    };

    Ok(Invocation {
        command,
        changelog: ChangelogSource::from_arg(changelog),
        config_path,
    })
}

/// Load and validate config, then run the requested workflow.
pub async fn run(invocation: Invocation) -> Result<()> {
    let operation = invocation.command.operation();

    let config = config::load_config(invocation.config_path.as_deref())?;
    config.validate(operation)?;
    info!("configuration loaded");

    let changelog = invocation.changelog.read()?;
    let tickets = changelog::parse_ticket_ids(&changelog, &config.project_key);
    info!(
        %operation,
        tickets = ?tickets.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        "parsed changelog"
    );

    let orchestrator = ReleaseOrchestrator::new(JiraClient::connect(config)?);
    let reports = match &invocation.command {
        Command::Release { version } => orchestrator.release(version, &tickets).await?,
        Command::Verify => orchestrator.verify(&tickets).await?,
    };
    drop(orchestrator);

    print!("{}", format_summary(operation, &reports));
    info!(%operation, "Jira sync finished");
    Ok(())
}

pub fn format_summary(operation: Operation, reports: &[TicketReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("{}: {}\n", report.ticket, report.outcome));
    }

    let moved = reports
        .iter()
        .filter(|r| r.outcome == TicketOutcome::Transitioned)
        .count();
    out.push_str(&format!(
        "{operation}: {moved}/{} tickets transitioned\n",
        reports.len()
    ));
    out
}

pub fn print_help() {
    println!("jira-release — sync release changelogs with Jira\n");
    println!("USAGE:");
    println!("  jira-release release <version> <changelog>   Attach version, move tickets to Done");
    println!("  jira-release verify <changelog>              Move tickets to released-on-staging");
    println!();
    println!("OPTIONS:");
    println!("  -c, --config <path>  Config file (default ~/.jira-release/config.toml)");
    println!("  -h, --help           Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("  JIRA_URL, JIRA_USER_EMAIL, JIRA_USER_TOKEN, JIRA_PROJECT_KEY, JIRA_PROJECT_ID,");
    println!("  JIRA_READY_FOR_RELEASE_STATUS_NAME, JIRA_DONE_TRANSITION_ID,");
    println!("  JIRA_RELEASED_ON_STAGING_TRANSITION_ID, JIRA_TIMEOUT_SECS, RUST_LOG");
    println!();
    println!("EXAMPLES:");
    println!("  jira-release release 1.4.0 \"$(cat CHANGELOG.md)\"");
    println!("  git log --oneline v1.3.0.. | jira-release verify -");
}
