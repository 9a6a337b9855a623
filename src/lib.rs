//! # docs-corpus
//!
//! Crawl the documentation trees of GitHub repositories into a
//! newline-delimited JSON corpus for retrieval-augmented generation, and load
//! that corpus back as documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Contents API │──▶│   Crawler   │──▶│  Normalizer │──▶│ Corpus JSONL │
//! │ list + raw   │   │ depth-first │   │ clean text  │   │ append/line  │
//! └──────────────┘   └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                                               │
//!                                                               ▼
//!                                                        ┌──────────────┐
//!                                                        │    Loader    │
//!                                                        │  Documents   │
//!                                                        └──────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. A [`config::Config`] names the repositories and their starting paths.
//! 2. The [`crawl::Crawler`] lists each directory through a
//!    [`github::ContentsApi`], descending into subdirectories in listing order.
//! 3. Every `.md`/`.mdx` file is downloaded and cleaned by
//!    [`normalize::clean_document`].
//! 4. A [`models::CorpusRecord`] is appended to the corpus file by
//!    [`corpus::CorpusWriter`], one open/append/close per record.
//! 5. Consumers read the file back with [`corpus::load_corpus`].
//!
//! ## Quick Start
//!
//! ```bash
//! export GITHUB_TOKEN=...
//! docs-corpus                       # crawl every configured repository
//! docs-corpus repos                 # show what would be crawled
//! docs-corpus inspect               # summarize today's corpus
//! docs-corpus inspect data/docs_en_2024_05_01.jsonl --json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Core data types: `RepoRef`, `FileEntry`, `CorpusRecord`, `Document` |
//! | [`normalize`] | Text cleaning applied to every downloaded document |
//! | [`github`] | GitHub Contents API client and the `ContentsApi` trait |
//! | [`crawl`] | Depth-first repository crawler and full-run orchestration |
//! | [`corpus`] | JSONL corpus writer, loader, and summary |
//! | [`inspect`] | `inspect` command |
//! | [`repos`] | `repos` command |

pub mod config;
pub mod corpus;
pub mod crawl;
pub mod github;
pub mod inspect;
pub mod repos;

pub use docs_corpus_core::{models, normalize};
pub use models::{CorpusRecord, Document, DocumentMetadata, FileEntry, RepoRef};
