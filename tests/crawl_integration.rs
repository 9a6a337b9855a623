//! End-to-end crawls against a local fake of the GitHub API.

mod common;

use common::{expected_documents, write_config, FakeGithub, TOKEN};
use docs_corpus::config::load_config;
use docs_corpus::corpus::load_corpus;
use docs_corpus::crawl::run_crawl;
use docs_corpus::github::GithubCredentials;

#[tokio::test]
async fn crawl_writes_normalized_corpus_in_listing_order() {
    let gh = FakeGithub::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let config = load_config(&write_config(tmp.path(), &gh.base, "GITHUB_TOKEN")).unwrap();

    let report = run_crawl(&config, GithubCredentials::new(TOKEN)).await.unwrap();

    assert!(report.corpus_path.starts_with(tmp.path().join("data")));
    assert_eq!(report.total.documents_written, 3);
    assert_eq!(report.total.directories_listed, 2);
    assert_eq!(report.total.directories_excluded, 1);
    assert_eq!(report.total.listing_failures, 1);

    let docs = load_corpus(&report.corpus_path).unwrap();
    let got: Vec<(&str, &str)> = docs
        .iter()
        .map(|d| (d.metadata.title.as_str(), d.content.as_str()))
        .collect();
    assert_eq!(got, expected_documents());
    for doc in &docs {
        assert_eq!(doc.metadata.repo_owner, "acme");
        assert_eq!(doc.metadata.repo_name, "widgets");
    }
}

#[tokio::test]
async fn crawl_never_touches_excluded_or_non_markdown_paths() {
    let gh = FakeGithub::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let config = load_config(&write_config(tmp.path(), &gh.base, "GITHUB_TOKEN")).unwrap();

    run_crawl(&config, GithubCredentials::new(TOKEN)).await.unwrap();

    let hits = gh.hits();
    assert!(hits.iter().all(|h| !h.contains("/zh")), "hits: {:?}", hits);
    assert!(!hits.contains(&"/raw/docs/logo.png".to_string()));
    // The failing subtree is attempted once and its siblings still run.
    assert!(hits.contains(&"/repos/acme/widgets/contents/docs/private".to_string()));
    assert!(hits.contains(&"/raw/docs/setup.mdx".to_string()));
}

#[tokio::test]
async fn crawl_replaces_todays_existing_corpus() {
    let gh = FakeGithub::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let config = load_config(&write_config(tmp.path(), &gh.base, "GITHUB_TOKEN")).unwrap();

    let today = chrono::Local::now().date_naive();
    let stale = config.corpus_file_for(today);
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(
        &stale,
        "{\"title\":\"old.md\",\"repo_owner\":\"x\",\"repo_name\":\"y\",\"text\":\"stale\"}\n",
    )
    .unwrap();

    let report = run_crawl(&config, GithubCredentials::new(TOKEN)).await.unwrap();
    assert_eq!(report.corpus_path, stale);

    let docs = load_corpus(&report.corpus_path).unwrap();
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d.metadata.title != "old.md"));
}

#[tokio::test]
async fn rejected_token_aborts_root_listing_and_writes_nothing() {
    let gh = FakeGithub::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let config = load_config(&write_config(tmp.path(), &gh.base, "GITHUB_TOKEN")).unwrap();

    let report = run_crawl(&config, GithubCredentials::new("wrong-token"))
        .await
        .unwrap();

    assert_eq!(report.total.listing_failures, 1);
    assert_eq!(report.total.documents_written, 0);
    assert_eq!(gh.hits(), vec!["/repos/acme/widgets/contents/docs".to_string()]);
    assert!(!report.corpus_path.exists());
}
