//! # docs-corpus CLI
//!
//! Crawls GitHub documentation directories into a JSONL corpus and inspects
//! the result.
//!
//! ## Usage
//!
//! ```bash
//! docs-corpus [--config ./config/docs-corpus.toml] [command]
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | *(none)* / `docs-corpus crawl` | Crawl every configured repository into `data/docs_en_YYYY_MM_DD.jsonl` |
//! | `docs-corpus inspect [FILE]` | Load a corpus and print a summary (`--json` prints documents) |
//! | `docs-corpus repos` | List the configured repositories |
//!
//! The crawl needs an API token in the environment variable named by
//! `github.token_env` (default `GITHUB_TOKEN`); without it the program exits
//! before making any request or touching the corpus file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docs_corpus::config;
use docs_corpus::crawl;
use docs_corpus::github::GithubCredentials;
use docs_corpus::inspect;
use docs_corpus::repos;

/// docs-corpus: crawl GitHub documentation into a JSONL corpus for
/// retrieval-augmented generation.
#[derive(Parser)]
#[command(
    name = "docs-corpus",
    about = "Crawl GitHub documentation into a JSONL corpus for retrieval-augmented generation",
    version,
    long_about = "docs-corpus walks the documentation directories of the configured GitHub \
    repositories, downloads every Markdown/MDX file, normalizes its text, and appends one JSON \
    record per file to a dated corpus file. Run without a command to crawl."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docs-corpus.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every configured repository into today's corpus file.
    ///
    /// Any corpus file already written today is replaced. This is also what
    /// runs when no command is given.
    Crawl,

    /// Load a corpus file and summarize it.
    ///
    /// Without FILE, uses `corpus.path` from the config, then today's file
    /// under `corpus.data_dir`.
    Inspect {
        /// Corpus file to load.
        file: Option<PathBuf>,

        /// Print every document as a JSON line instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// List the configured repositories and their starting paths.
    Repos,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Crawl) {
        Commands::Crawl => {
            let cfg = config::load_config(&cli.config)?;
            let credentials = GithubCredentials::from_env(&cfg.github.token_env)?;
            let report = crawl::run_crawl(&cfg, credentials).await?;
            print!("{}", report);
        }
        Commands::Inspect { file, json } => {
            // An explicit file needs no config.
            let cfg = match file {
                Some(_) => None,
                None => Some(config::load_config(&cli.config)?),
            };
            let path = inspect::resolve_corpus_path(file, cfg.as_ref())?;
            inspect::run_inspect(&path, json)?;
        }
        Commands::Repos => {
            let cfg = config::load_config(&cli.config)?;
            repos::list_repos(&cfg)?;
        }
    }

    Ok(())
}
