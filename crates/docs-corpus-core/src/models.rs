//! Core data models used throughout docs-corpus.
//!
//! These types describe where documentation comes from ([`RepoRef`],
//! [`FileEntry`]), how it is stored ([`CorpusRecord`]), and how it is handed
//! to downstream retrieval pipelines ([`Document`]).

use serde::{Deserialize, Serialize};

/// A repository and the directory within it where crawling starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Starting path inside the repository, e.g. `docs/extras`.
    #[serde(default)]
    pub path: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
        }
    }

    /// `owner/repo`, the label used in logs and summaries.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Type of an entry in a directory listing.
///
/// Maps to the `type` field of the GitHub Contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    #[serde(alias = "directory")]
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// A single entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    /// Raw content URL. Only files carry one.
    #[serde(default)]
    pub download_url: Option<String>,
}

impl FileEntry {
    pub fn file(name: &str, path: &str, download_url: &str) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.to_string(),
            path: path.to_string(),
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(name: &str, path: &str) -> Self {
        Self {
            kind: EntryKind::Dir,
            name: name.to_string(),
            path: path.to_string(),
            download_url: None,
        }
    }
}

/// One line of the corpus file: a downloaded document plus its origin.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub title: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub text: String,
}

impl CorpusRecord {
    pub fn new(title: impl Into<String>, repo: &RepoRef, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            repo_owner: repo.owner.clone(),
            repo_name: repo.repo.clone(),
            text: text.into(),
        }
    }
}

/// Metadata attached to a loaded [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub repo_owner: String,
    pub repo_name: String,
}

/// A corpus record reconstructed for retrieval: page content plus metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl From<CorpusRecord> for Document {
    fn from(record: CorpusRecord) -> Self {
        Self {
            content: record.text,
            metadata: DocumentMetadata {
                title: record.title,
                repo_owner: record.repo_owner,
                repo_name: record.repo_name,
            },
        }
    }
}
