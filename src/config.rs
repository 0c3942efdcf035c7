use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Token;
use crate::error::MergedListrError;
use crate::listing::TimeWindow;
use crate::providers::ClientOptions;

/// Configuration file structure for mergedlistr.
///
/// Read once at startup from `.mergedlistr` (TOML, JSON or YAML) in the
/// current directory or the home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitLab personal access token
    pub gitlab_token: Option<String>,

    /// GitLab instance base URL
    #[serde(default = "default_gitlab_url")]
    pub gitlab_url: String,

    /// Group name fragments to watch
    #[serde(default)]
    pub groups: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of API requests in flight
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Page size of the single page fetched per API call
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table
    #[default]
    Table,
    /// Boxed terminal table with links
    Summary,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gitlab_token: None,
            gitlab_url: default_gitlab_url(),
            groups: Vec::new(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
            per_page: default_per_page(),
            output: OutputConfig::default(),
        }
    }
}

fn default_gitlab_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    50
}

fn default_per_page() -> usize {
    100
}

const CONFIG_FILE_NAMES: [&str; 5] = [
    ".mergedlistr.toml",
    ".mergedlistr.json",
    ".mergedlistr.yaml",
    ".mergedlistr.yml",
    ".mergedlistr",
];

impl Config {
    /// Load configuration from a file.
    ///
    /// An explicit `path` must exist. Otherwise the current directory and
    /// then the home directory are searched for, in order, `.mergedlistr.toml`,
    /// `.mergedlistr.json`, `.mergedlistr.yaml`, `.mergedlistr.yml` and
    /// `.mergedlistr`.
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let mut search_dirs = vec![PathBuf::from(".")];
        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home);
        }

        match discover(&search_dirs) {
            Some(path) => {
                log::debug!("Using config file: {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

/// First config file found, searching `dirs` in order.
fn discover(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub url: Option<String>,
    pub groups: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub format: Option<OutputFormat>,
    pub pretty: bool,
}

/// Everything a run needs, resolved from config file and command line.
#[derive(Debug)]
pub struct Settings {
    pub token: Option<Token>,
    pub base_url: String,
    pub groups: Vec<String>,
    pub window: TimeWindow,
    pub client: ClientOptions,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Settings {
    /// Merges `overrides` onto `config`. Dates default to yesterday through `today`.
    pub fn resolve(
        config: Config,
        overrides: Overrides,
        today: NaiveDate,
    ) -> std::result::Result<Self, MergedListrError> {
        let requested = if overrides.groups.is_empty() {
            config.groups
        } else {
            overrides.groups
        };
        let groups: Vec<String> = requested
            .into_iter()
            .map(|group| group.trim().to_string())
            .filter(|group| !group.is_empty())
            .collect();

        if groups.is_empty() {
            return Err(MergedListrError::Config(
                "no groups to watch: set `groups` in .mergedlistr or pass --group".to_string(),
            ));
        }

        let from = match overrides.from {
            Some(date) => date,
            None => today
                .checked_sub_days(Days::new(1))
                .ok_or_else(|| MergedListrError::Config(format!("date out of range: {today}")))?,
        };
        let to = overrides.to.unwrap_or(today);
        let window = TimeWindow::from_dates(from, to)?;

        let token = overrides
            .token
            .or(config.gitlab_token)
            .filter(|token| !token.is_empty())
            .map(Token::from);

        Ok(Self {
            token,
            base_url: overrides.url.unwrap_or(config.gitlab_url),
            groups,
            window,
            client: ClientOptions {
                timeout: Duration::from_secs(config.timeout_secs),
                max_concurrent_requests: config.max_concurrent_requests,
                per_page: config.per_page,
            },
            format: overrides.format.unwrap_or(config.output.format),
            pretty: overrides.pretty || config.output.pretty,
        })
    }
}
