//! TOML configuration parsing and validation.
//!
//! A [`Config`] is loaded once at startup by [`load_config`] and passed by
//! reference to the crawler, the corpus writer, and the CLI commands.
//!
//! # Example
//!
//! ```toml
//! [github]
//! token_env = "GITHUB_TOKEN"
//!
//! [[github.repos]]
//! owner = "langchain-ai"
//! repo = "langchain"
//! path = "docs/extras"
//!
//! [crawl]
//! extensions = [".md", ".mdx"]
//! excluded_dirs = ["zh"]
//!
//! [corpus]
//! data_dir = "data"
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::corpus::corpus_file_name;
use crate::models::RepoRef;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub github: GithubConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub repos: Vec<RepoRef>,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_user_agent() -> String {
    concat!("docs-corpus/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// File name suffixes that qualify a file for download.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names that are never descended into.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".md".to_string(), ".mdx".to_string()]
}
fn default_excluded_dirs() -> Vec<String> {
    vec!["zh".to_string()]
}

impl CrawlConfig {
    pub fn is_document(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Whether the final segment of `path` names an excluded directory.
    pub fn is_excluded(&self, path: &str) -> bool {
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        self.excluded_dirs.iter().any(|dir| dir == last)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Corpus file read by `inspect` when no file is given on the command line.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            path: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    /// Location of the corpus file a crawl started on `date` writes to.
    pub fn corpus_file_for(&self, date: NaiveDate) -> PathBuf {
        self.corpus.data_dir.join(corpus_file_name(date))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate github
    if !(config.github.api_base.starts_with("http://")
        || config.github.api_base.starts_with("https://"))
    {
        anyhow::bail!(
            "github.api_base must be an http(s) URL, got '{}'",
            config.github.api_base
        );
    }

    if config.github.token_env.trim().is_empty() {
        anyhow::bail!("github.token_env must not be empty");
    }

    if config.github.repos.is_empty() {
        anyhow::bail!("github.repos must list at least one repository");
    }

    for (i, repo) in config.github.repos.iter().enumerate() {
        if repo.owner.trim().is_empty() || repo.repo.trim().is_empty() {
            anyhow::bail!("github.repos[{}] needs a non-empty owner and repo", i);
        }
    }

    // Validate crawl
    if config.crawl.extensions.is_empty() {
        anyhow::bail!("crawl.extensions must not be empty");
    }

    if let Some(ext) = config.crawl.extensions.iter().find(|e| !e.starts_with('.')) {
        anyhow::bail!("crawl.extensions entries must start with '.', got '{}'", ext);
    }

    Ok(())
}
