//! # docs-corpus core
//!
//! Pure logic shared by the crawler and by downstream consumers of the
//! corpus: the data model and the text normalizer.
//!
//! This crate performs no network or filesystem I/O and pulls in no async
//! runtime, so it can be embedded by any tool that only needs to read or
//! clean corpus text.

pub mod models;
pub mod normalize;
