//! Binary entrypoint for the change log tool.
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use changelog_core::{AppVersion, ChangeLog, ChangeLogConfig, ChangeLogSource, JsonVersionStore};
use changelog_out::{ChangeLogRenderer, OutputFormat, TemplateSet};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "changelog", version, about = "Show what changed between application versions")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "CHANGELOG_CONFIG")]
    config: Option<PathBuf>,

    /// Master change log (overrides the config file)
    #[arg(long, env = "CHANGELOG_MASTER")]
    master: Option<PathBuf>,

    /// Localized change log preferred per version
    #[arg(long, env = "CHANGELOG_LOCALIZED")]
    localized: Option<PathBuf>,

    /// JSON file holding the last seen version code
    #[arg(long, env = "CHANGELOG_STATE")]
    state: Option<PathBuf>,

    /// YAML file overriding the html/text templates
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output format: html, text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the full change log
    Full,
    /// Print releases newer than the last seen (or given) version code
    Recent {
        #[arg(long, allow_negative_numbers = true)]
        since: Option<i32>,
    },
    /// Record a version code as seen
    MarkSeen {
        #[arg(long)]
        code: i32,
    },
    /// Report first-run state for the running application version
    Status {
        #[arg(long)]
        code: i32,
        #[arg(long, default_value = "")]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore errors: the tool works without logging.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    debug!(?config, "Resolved configuration");

    let source = config.build_source();
    let store = JsonVersionStore::new(&config.state_file);

    match &cli.command {
        Command::Full => {
            let releases = source.full_log().context("Failed to read change log")?;
            print(&config, cli, &releases)
        }
        Command::Recent { since: Some(since) } => {
            let releases = source
                .log_since(*since)
                .context("Failed to read change log")?;
            print(&config, cli, &releases)
        }
        Command::Recent { since: None } => {
            let change_log = ChangeLog::new(source, store, AppVersion::new(0, ""))?;
            let releases = change_log
                .recent_changes()
                .context("Failed to read change log")?;
            print(&config, cli, &releases)
        }
        Command::MarkSeen { code } => {
            let mut change_log = ChangeLog::new(source, store, AppVersion::new(*code, ""))?;
            change_log
                .write_current_version()
                .with_context(|| format!("Failed to store version {}", code))?;
            Ok(())
        }
        Command::Status { code, name } => {
            let change_log = ChangeLog::new(source, store, AppVersion::new(*code, name.as_str()))?;
            println!("last seen version: {}", change_log.last_version_code());
            println!(
                "current version: {} {}",
                change_log.current_version_code(),
                change_log.current_version_name()
            );
            println!("first run: {}", change_log.is_first_run());
            println!("first run ever: {}", change_log.is_first_run_ever());
            Ok(())
        }
    }
}

/// Config file values, overridden by command line flags.
fn resolve_config(cli: &Cli) -> Result<ChangeLogConfig> {
    let mut config = match (&cli.config, &cli.master) {
        (Some(path), _) => ChangeLogConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (None, Some(master)) => ChangeLogConfig::new(master),
        (None, None) => return Err(anyhow!("either --config or --master is required")),
    };

    if let Some(master) = &cli.master {
        config.master = master.clone();
    }
    if let Some(localized) = &cli.localized {
        config.localized = Some(localized.clone());
    }
    if let Some(state) = &cli.state {
        config.state_file = state.clone();
    }
    Ok(config)
}

fn print(config: &ChangeLogConfig, cli: &Cli, releases: &[changelog_core::ReleaseItem]) -> Result<()> {
    let templates = match &cli.templates {
        Some(path) => TemplateSet::load(&path.to_string_lossy()).map_err(|e| anyhow!(e))?,
        None => TemplateSet::default(),
    };

    let renderer = ChangeLogRenderer::with_templates(&templates)?
        .version_format(config.version_format.as_str())
        .css(config.css.as_str());
    println!("{}", renderer.render(releases, cli.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_flag_builds_config() {
        let cli = Cli::try_parse_from([
            "changelog",
            "--master",
            "master.xml",
            "--localized",
            "de.xml",
            "--format",
            "html",
            "full",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.master, PathBuf::from("master.xml"));
        assert_eq!(config.localized, Some(PathBuf::from("de.xml")));
        assert_eq!(cli.format, OutputFormat::Html);
    }

    #[test]
    fn test_recent_accepts_negative_since() {
        let cli =
            Cli::try_parse_from(["changelog", "--master", "m.xml", "recent", "--since", "-1"])
                .unwrap();
        assert!(matches!(cli.command, Command::Recent { since: Some(-1) }));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["changelog", "--master", "m.xml", "-f", "pdf", "full"]);
        assert!(result.is_err());
    }
}
