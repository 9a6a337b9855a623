//! The JSONL corpus file: writing records during a crawl and loading them
//! back as [`Document`]s.
//!
//! Each line is one self-contained JSON object with the keys `title`,
//! `repo_owner`, `repo_name`, and `text`. The writer opens, appends, and
//! closes the file for every record, so an interrupted crawl leaves a valid
//! partial corpus.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::models::{CorpusRecord, Document, DocumentMetadata};

/// Destination for corpus records produced by the crawler.
pub trait CorpusSink {
    fn append(&mut self, record: &CorpusRecord) -> Result<()>;
}

/// In-memory sink.
impl CorpusSink for Vec<CorpusRecord> {
    fn append(&mut self, record: &CorpusRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// File-backed sink that appends one JSON line per record.
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    path: PathBuf,
    written: u64,
}

impl CorpusWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this writer.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl CorpusSink for CorpusWriter {
    fn append(&mut self, record: &CorpusRecord) -> Result<()> {
        append_record(&self.path, record)?;
        self.written += 1;
        Ok(())
    }
}

/// Append a single record to `path`, creating the file if needed.
///
/// The line is written with one `write_all` and the handle is dropped before
/// returning.
pub fn append_record(path: &Path, record: &CorpusRecord) -> Result<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open corpus file: {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to append to corpus file: {}", path.display()))?;
    Ok(())
}

/// `docs_en_YYYY_MM_DD.jsonl`
pub fn corpus_file_name(date: NaiveDate) -> String {
    format!("docs_en_{}.jsonl", date.format("%Y_%m_%d"))
}

/// Create `data_dir` if needed and return the corpus path for `date`,
/// deleting any file left there by an earlier run on the same day.
pub fn prepare_corpus_file(data_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let path = data_dir.join(corpus_file_name(date));
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stale corpus: {}", path.display()))?;
        tracing::info!(path = %path.display(), "removed existing corpus file");
    }
    Ok(path)
}

// ============ Loading ============

/// Error returned by [`load_corpus`]. No partial results are returned.
#[derive(Debug)]
pub enum CorpusError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for CorpusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorpusError::Io { path, source } => {
                write!(f, "failed to read corpus {}: {}", path.display(), source)
            }
            CorpusError::Parse { path, line, source } => write!(
                f,
                "invalid JSON on line {} of {}: {}",
                line,
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorpusError::Io { source, .. } => Some(source),
            CorpusError::Parse { source, .. } => Some(source),
        }
    }
}

/// Lenient view of a corpus line: absent or `null` fields become `""`.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    repo_owner: Option<String>,
    #[serde(default)]
    repo_name: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<RawRecord> for Document {
    fn from(raw: RawRecord) -> Self {
        Document {
            content: raw.text.unwrap_or_default(),
            metadata: DocumentMetadata {
                title: raw.title.unwrap_or_default(),
                repo_owner: raw.repo_owner.unwrap_or_default(),
                repo_name: raw.repo_name.unwrap_or_default(),
            },
        }
    }
}

/// Read a corpus file into documents, in file order.
///
/// Every line must be a JSON object; the first line that is not fails the
/// whole load.
pub fn load_corpus(path: &Path) -> std::result::Result<Vec<Document>, CorpusError> {
    let io_err = |source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut documents = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let raw = parse_line(&line).map_err(|source| CorpusError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        documents.push(Document::from(raw));
    }

    Ok(documents)
}

fn parse_line(line: &str) -> serde_json::Result<RawRecord> {
    // Going through a map rejects arrays, which serde would otherwise accept
    // positionally for a struct.
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)?;
    serde_json::from_value(serde_json::Value::Object(object))
}

// ============ Summary ============

/// Aggregate view of a loaded corpus, printed by `inspect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    pub documents: usize,
    pub empty_documents: usize,
    pub total_chars: usize,
    /// Document count per `owner/repo`.
    pub per_repo: BTreeMap<String, usize>,
}

impl CorpusSummary {
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut summary = CorpusSummary {
            documents: documents.len(),
            ..Default::default()
        };
        for doc in documents {
            if doc.content.is_empty() {
                summary.empty_documents += 1;
            }
            summary.total_chars += doc.content.chars().count();
            let key = format!("{}/{}", doc.metadata.repo_owner, doc.metadata.repo_name);
            *summary.per_repo.entry(key).or_insert(0) += 1;
        }
        summary
    }
}
