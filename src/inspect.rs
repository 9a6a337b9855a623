//! `inspect` command: load a corpus file and report what it contains.
//!
//! This is the command-line face of [`load_corpus`]. With `--json` each
//! loaded [`Document`](crate::models::Document) is printed as one JSON line
//! (`{"content": …, "metadata": {…}}`), which is the shape downstream
//! embedding pipelines consume.

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::corpus::{load_corpus, CorpusSummary};

/// Pick the corpus to inspect: an explicit file, then `corpus.path`, then
/// today's file under `corpus.data_dir`.
pub fn resolve_corpus_path(file: Option<PathBuf>, config: Option<&Config>) -> Result<PathBuf> {
    if let Some(file) = file {
        return Ok(file);
    }
    match config {
        Some(cfg) => Ok(cfg
            .corpus
            .path
            .clone()
            .unwrap_or_else(|| cfg.corpus_file_for(Local::now().date_naive()))),
        None => bail!("No corpus file given and no configuration available to locate one"),
    }
}

pub fn run_inspect(path: &Path, json: bool) -> Result<()> {
    let documents = load_corpus(path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        for doc in &documents {
            let line = serde_json::to_string(doc)?;
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    let summary = CorpusSummary::from_documents(&documents);
    write!(out, "{}", render_summary(path, &summary)).context("Failed to write summary")?;
    Ok(())
}

fn render_summary(path: &Path, summary: &CorpusSummary) -> String {
    let mut out = format!("corpus {}\n", path.display());
    out.push_str(&format!("  documents: {}\n", summary.documents));
    out.push_str(&format!("  empty documents: {}\n", summary.empty_documents));
    out.push_str(&format!("  total characters: {}\n", summary.total_chars));
    for (repo, count) in &summary.per_repo {
        out.push_str(&format!("  {}: {}\n", repo, count));
    }
    out
}
