//! Repository crawler.
//!
//! Walks a repository's documentation tree through a [`ContentsApi`],
//! downloads every qualifying document, cleans it with
//! [`clean_document`], and appends one [`CorpusRecord`] per file to a
//! [`CorpusSink`].
//!
//! # Traversal
//!
//! Depth-first, in listing order, one request at a time. Each open directory
//! is a frame on an explicit stack holding the rest of its entries; a
//! subdirectory is listed and pushed the moment it is reached, so its files
//! are written before the remaining siblings of its parent.
//!
//! # Failures
//!
//! | Failure | Scope |
//! |---------|-------|
//! | Excluded directory (e.g. `zh`) | Never listed; nothing below it is touched |
//! | Listing error or non-2xx status | That directory's subtree is dropped; siblings continue |
//! | Download error | That file is skipped |
//! | Sink error | Fatal: the crawl stops and the error is returned |

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::path::PathBuf;

use crate::config::{Config, CrawlConfig};
use crate::corpus::{prepare_corpus_file, CorpusSink, CorpusWriter};
use crate::github::{ContentsApi, GithubClient, GithubCredentials};
use crate::models::{CorpusRecord, EntryKind, FileEntry, RepoRef};
use crate::normalize::clean_document;

/// Counters for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub directories_listed: u64,
    pub directories_excluded: u64,
    pub listing_failures: u64,
    pub documents_written: u64,
    pub documents_skipped: u64,
}

impl std::ops::AddAssign for CrawlStats {
    fn add_assign(&mut self, other: Self) {
        self.directories_listed += other.directories_listed;
        self.directories_excluded += other.directories_excluded;
        self.listing_failures += other.listing_failures;
        self.documents_written += other.documents_written;
        self.documents_skipped += other.documents_skipped;
    }
}

pub struct Crawler<'a, A: ContentsApi + ?Sized> {
    api: &'a A,
    config: &'a CrawlConfig,
}

impl<'a, A: ContentsApi + ?Sized> Crawler<'a, A> {
    pub fn new(api: &'a A, config: &'a CrawlConfig) -> Self {
        Self { api, config }
    }

    /// Crawl `repo` from its configured starting path.
    pub async fn crawl<S: CorpusSink>(&self, repo: &RepoRef, sink: &mut S) -> Result<CrawlStats> {
        self.crawl_path(&repo.path, repo, sink).await
    }

    /// Crawl `repo` starting at `path`.
    pub async fn crawl_path<S: CorpusSink>(
        &self,
        path: &str,
        repo: &RepoRef,
        sink: &mut S,
    ) -> Result<CrawlStats> {
        let mut stats = CrawlStats::default();
        let mut stack: Vec<(String, std::vec::IntoIter<FileEntry>)> = Vec::new();

        if let Some(entries) = self.open_dir(repo, path, &mut stats).await {
            stack.push((path.to_string(), entries.into_iter()));
        }

        loop {
            let Some((dir, remaining)) = stack.last_mut() else {
                break;
            };
            let Some(entry) = remaining.next() else {
                tracing::info!(repo = %repo.slug(), path = %dir, "finished extracting documents from directory");
                stack.pop();
                continue;
            };

            match entry.kind {
                EntryKind::File if self.config.is_document(&entry.name) => {
                    self.ingest_file(&entry, repo, sink, &mut stats).await?;
                }
                EntryKind::Dir => {
                    if let Some(children) = self.open_dir(repo, &entry.path, &mut stats).await {
                        stack.push((entry.path, children.into_iter()));
                    }
                }
                _ => {}
            }
        }

        Ok(stats)
    }

    /// List `path`, or return `None` when it is excluded or the listing fails.
    async fn open_dir(
        &self,
        repo: &RepoRef,
        path: &str,
        stats: &mut CrawlStats,
    ) -> Option<Vec<FileEntry>> {
        if self.config.is_excluded(path) {
            tracing::info!(repo = %repo.slug(), path, "skipping excluded directory");
            stats.directories_excluded += 1;
            return None;
        }

        tracing::info!(repo = %repo.slug(), path, "processing directory");
        match self.api.list_dir(repo, path).await {
            Ok(entries) => {
                stats.directories_listed += 1;
                Some(entries)
            }
            Err(e) => {
                tracing::error!(
                    repo = %repo.slug(),
                    path,
                    error = %format!("{e:#}"),
                    "files could not be retrieved; verify your GitHub token and repository details"
                );
                stats.listing_failures += 1;
                None
            }
        }
    }

    async fn ingest_file<S: CorpusSink>(
        &self,
        entry: &FileEntry,
        repo: &RepoRef,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<()> {
        let Some(url) = entry.download_url.as_deref() else {
            tracing::warn!(path = %entry.path, "file entry has no download_url, skipping");
            stats.documents_skipped += 1;
            return Ok(());
        };

        tracing::info!(name = %entry.name, url, "downloading document");
        let raw = match self.api.fetch_raw(url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %entry.path, error = %format!("{e:#}"), "skipping document");
                stats.documents_skipped += 1;
                return Ok(());
            }
        };

        let record = CorpusRecord::new(entry.name.as_str(), repo, clean_document(&raw));
        sink.append(&record)
            .with_context(|| format!("Failed to write {} to the corpus", entry.path))?;
        stats.documents_written += 1;
        Ok(())
    }
}

/// Outcome of a full run over every configured repository.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub corpus_path: PathBuf,
    pub per_repo: Vec<(String, CrawlStats)>,
    pub total: CrawlStats,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "crawl -> {}", self.corpus_path.display())?;
        for (slug, stats) in &self.per_repo {
            writeln!(
                f,
                "  {}: {} documents from {} directories",
                slug, stats.documents_written, stats.directories_listed
            )?;
        }
        writeln!(f, "  directories listed: {}", self.total.directories_listed)?;
        writeln!(f, "  directories excluded: {}", self.total.directories_excluded)?;
        writeln!(f, "  listing failures: {}", self.total.listing_failures)?;
        writeln!(f, "  documents written: {}", self.total.documents_written)?;
        writeln!(f, "  documents skipped: {}", self.total.documents_skipped)?;
        writeln!(f, "ok")
    }
}

/// Crawl every repository in `config` into a fresh corpus file for today.
///
/// Any corpus already written today is deleted first. Repositories are
/// crawled in configuration order.
pub async fn run_crawl(config: &Config, credentials: GithubCredentials) -> Result<CrawlReport> {
    let client = GithubClient::new(&config.github, credentials)?;
    let mut writer = CorpusWriter::new(prepare_corpus_file(
        &config.corpus.data_dir,
        Local::now().date_naive(),
    )?);
    let crawler = Crawler::new(&client, &config.crawl);

    let mut report = CrawlReport {
        corpus_path: writer.path().to_path_buf(),
        per_repo: Vec::with_capacity(config.github.repos.len()),
        total: CrawlStats::default(),
    };

    for repo in &config.github.repos {
        let stats = crawler.crawl(repo, &mut writer).await?;
        tracing::info!(
            repo = %repo.slug(),
            documents = stats.documents_written,
            "repository done"
        );
        report.total += stats;
        report.per_repo.push((repo.slug(), stats));
    }

    Ok(report)
}
