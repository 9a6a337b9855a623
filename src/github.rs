//! GitHub Contents API client.
//!
//! Lists repository directories and downloads raw file content over plain
//! REST calls.
//!
//! # Environment Variables
//!
//! The API token is read from the variable named by `github.token_env`
//! (default `GITHUB_TOKEN`). It is required: [`GithubCredentials::from_env`]
//! fails when it is unset or empty, and the CLI stops before any request is
//! made.
//!
//! # Requests
//!
//! | Call | Request |
//! |------|---------|
//! | [`ContentsApi::list_dir`] | `GET {api_base}/repos/{owner}/{repo}/contents/{path}` with bearer token |
//! | [`ContentsApi::fetch_raw`] | `GET {download_url}` |

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::models::{FileEntry, RepoRef};

/// Media type asking GitHub for raw content where applicable.
pub const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

/// Source of directory listings and file bodies for the crawler.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// List the entries of `path` in `repo`, in the order the API returns them.
    ///
    /// Any non-success status is an error.
    async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<FileEntry>>;

    /// Download the raw text behind a file's `download_url`.
    async fn fetch_raw(&self, url: &str) -> Result<String>;
}

// ============ Credentials ============

/// GitHub API token loaded from the environment.
#[derive(Clone)]
pub struct GithubCredentials {
    token: String,
}

impl GithubCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Load the token from `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let token = std::env::var(var)
            .with_context(|| format!("{} is not configured in the environment variables", var))?;
        if token.trim().is_empty() {
            bail!("{} is set but empty", var);
        }
        Ok(Self::new(token))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

// ============ Client ============

/// A listing body is an array of entries, or a single entry when the path
/// names a file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Many(Vec<FileEntry>),
    One(FileEntry),
}

impl From<Listing> for Vec<FileEntry> {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        }
    }
}

fn parse_listing(body: &str) -> serde_json::Result<Vec<FileEntry>> {
    serde_json::from_str::<Listing>(body).map(Vec::from)
}

/// [`ContentsApi`] backed by the GitHub REST API.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    credentials: GithubCredentials,
}

impl GithubClient {
    pub fn new(config: &GithubConfig, credentials: GithubCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn contents_url(&self, repo: &RepoRef, path: &str) -> String {
        contents_url(&self.api_base, repo, path)
    }
}

fn contents_url(api_base: &str, repo: &RepoRef, path: &str) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}",
        api_base.trim_end_matches('/'),
        repo.owner,
        repo.repo,
        path.trim_matches('/')
    )
}

#[async_trait]
impl ContentsApi for GithubClient {
    async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<FileEntry>> {
        let url = self.contents_url(repo, path);

        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.credentials.bearer())
            .header(ACCEPT, ACCEPT_RAW)
            .send()
            .await
            .with_context(|| format!("Failed to list {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "GitHub contents listing failed (HTTP {}) for {}: {}",
                status,
                url,
                body.chars().take(200).collect::<String>()
            );
        }

        let body = resp.text().await?;
        parse_listing(&body).with_context(|| format!("Unexpected listing body from {}", url))
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !resp.status().is_success() {
            bail!("Download failed (HTTP {}) for {}", resp.status(), url);
        }

        resp.text()
            .await
            .with_context(|| format!("Response body of {} is not text", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    #[test]
    fn contents_url_joins_segments() {
        let repo = RepoRef::new("acme", "widgets", "docs");
        assert_eq!(
            contents_url("https://api.github.com/", &repo, "/docs/guides/"),
            "https://api.github.com/repos/acme/widgets/contents/docs/guides"
        );
        assert_eq!(
            contents_url("http://127.0.0.1:9000", &repo, ""),
            "http://127.0.0.1:9000/repos/acme/widgets/contents/"
        );
    }

    #[test]
    fn listing_accepts_array_or_single_entry() {
        let many = parse_listing(
            r#"[{"type":"file","name":"a.md","path":"docs/a.md","download_url":"u"},
                {"type":"dir","name":"g","path":"docs/g","download_url":null}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].kind, EntryKind::Dir);

        let one = parse_listing(
            r#"{"type":"file","name":"a.md","path":"docs/a.md","download_url":"u","sha":"abc","size":3}"#,
        )
        .unwrap();
        assert_eq!(one, vec![FileEntry::file("a.md", "docs/a.md", "u")]);
    }

    #[test]
    fn listing_rejects_raw_text() {
        assert!(parse_listing("# Just markdown").is_err());
        assert!(parse_listing(r#"{"message":"Not Found"}"#).is_err());
    }

    #[test]
    fn credentials_debug_hides_token() {
        let creds = GithubCredentials::new("ghp_secret");
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("ghp_secret"));
        assert_eq!(creds.bearer(), "Bearer ghp_secret");
    }

    #[test]
    fn credentials_from_env_requires_variable() {
        let err = GithubCredentials::from_env("DOCS_CORPUS_TEST_TOKEN_THAT_IS_NEVER_SET").unwrap_err();
        assert!(err
            .to_string()
            .contains("DOCS_CORPUS_TEST_TOKEN_THAT_IS_NEVER_SET"));
    }
}
