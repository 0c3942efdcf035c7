use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat, Overrides, Settings};
use crate::output;
use crate::providers::GitLabProvider;

#[derive(Parser)]
#[command(name = "mergedlistr")]
#[command(author, version, about = "Lists GitLab merge requests merged in watched groups", long_about = None)]
pub struct Cli {
    /// First day to look for merged requests (YYYY-MM-DD, default: yesterday)
    #[arg(short, long)]
    from: Option<NaiveDate>,

    /// Last day to look for merged requests, inclusive (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    to: Option<NaiveDate>,

    /// Log level
    #[arg(short, long, value_enum, default_value_t = Verbosity::Info)]
    verbosity: Verbosity,

    /// Config file (default: .mergedlistr in the current or home directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitLab instance base URL
    #[arg(short, long)]
    url: Option<String>,

    /// Group name fragment to watch; repeat to watch several (replaces the config's list)
    #[arg(short, long = "group")]
    groups: Vec<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Hide phase progress
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Error => Self::Error,
            Verbosity::Warn => Self::Warn,
            Verbosity::Info => Self::Info,
            Verbosity::Debug => Self::Debug,
            Verbosity::Trace => Self::Trace,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.into()
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    fn settings(&self) -> Result<Settings> {
        let config = Config::load(self.config.as_deref())?;

        let overrides = Overrides {
            token: self.token.clone(),
            url: self.url.clone(),
            groups: self.groups.clone(),
            from: self.from,
            to: self.to,
            format: self.format,
            pretty: self.pretty,
        };

        Settings::resolve(config, overrides, Local::now().date_naive())
            .context("Failed to resolve settings")
    }

    pub async fn execute(&self) -> Result<()> {
        let settings = self.settings()?;

        info!("Watching groups: {}", settings.groups.join(", "));

        let provider =
            GitLabProvider::new(&settings.base_url, settings.token.clone(), &settings.client)?
                .with_progress(!self.quiet);

        let listing = provider
            .list_merged(&settings.groups, &settings.window)
            .await
            .context("Failed to list merged requests")?;

        let mut rendered = Vec::new();
        output::export_listing(&listing, settings.format, settings.pretty, &mut rendered)?;

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Listing written to: {}", output_path.display());
        } else {
            std::io::stdout().lock().write_all(&rendered)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_dates_and_repeated_groups() {
        let cli = Cli::try_parse_from([
            "mergedlistr",
            "-f",
            "2024-03-01",
            "-t",
            "2024-03-05",
            "-g",
            "teamA",
            "--group",
            "teamB",
            "-v",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cli.to, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(cli.groups, vec!["teamA", "teamB"]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_malformed_date() {
        assert!(Cli::try_parse_from(["mergedlistr", "-f", "03/01/2024"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mergedlistr"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Info);
        assert!(cli.from.is_none());
        assert!(cli.format.is_none());
        assert!(!cli.quiet());
    }
}
