//! A local stand-in for the GitHub Contents API and raw file host.
//!
//! Tree served under `acme/widgets`:
//!
//! ```text
//! docs/
//!   intro.md
//!   guides/advanced.md
//!   zh/index.md          (must never be requested)
//!   private/             (listing returns 404)
//!   logo.png             (must never be downloaded)
//!   setup.mdx
//! ```

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";

#[derive(Clone)]
pub struct FakeGithub {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeGithub {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let gh = FakeGithub {
            base: format!("http://{}", addr),
            hits: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/repos/acme/widgets/contents/{*path}", get(list_contents))
            .route("/raw/{*path}", get(raw_file))
            .with_state(gh.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        gh
    }

    /// Every request path served so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    fn record(&self, path: String) {
        self.hits.lock().unwrap().push(path);
    }

    fn listing(&self, path: &str) -> Option<Value> {
        let b = &self.base;
        match path {
            "docs" => Some(json!([
                file(b, "intro.md", "docs/intro.md"),
                dir("guides", "docs/guides"),
                dir("zh", "docs/zh"),
                dir("private", "docs/private"),
                file(b, "logo.png", "docs/logo.png"),
                file(b, "setup.mdx", "docs/setup.mdx"),
            ])),
            "docs/guides" => Some(json!([file(b, "advanced.md", "docs/guides/advanced.md")])),
            "docs/zh" => Some(json!([file(b, "index.md", "docs/zh/index.md")])),
            _ => None,
        }
    }
}

fn file(base: &str, name: &str, path: &str) -> Value {
    json!({
        "type": "file",
        "name": name,
        "path": path,
        "sha": "0000000000000000000000000000000000000000",
        "size": 1,
        "download_url": format!("{}/raw/{}", base, path),
    })
}

fn dir(name: &str, path: &str) -> Value {
    json!({
        "type": "dir",
        "name": name,
        "path": path,
        "sha": "0000000000000000000000000000000000000000",
        "size": 0,
        "download_url": null,
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    header("authorization") == Some(format!("Bearer {}", TOKEN))
        && header("accept").as_deref() == Some("application/vnd.github.v3.raw")
        && header("user-agent").is_some()
}

async fn list_contents(
    State(gh): State<FakeGithub>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    gh.record(format!("/repos/acme/widgets/contents/{}", path));

    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Bad credentials"})),
        )
            .into_response();
    }

    match gh.listing(&path) {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

async fn raw_file(State(gh): State<FakeGithub>, Path(path): Path<String>) -> Response {
    gh.record(format!("/raw/{}", path));

    let body = match path.as_str() {
        "docs/intro.md" => {
            "# Intro\n\n<p>Welcome</p> to the <b>docs</b> 🎉\nSee https://example.com/more\n\nCopyright 2024 Acme"
        }
        "docs/guides/advanced.md" => "Advanced :rocket: usage\n",
        "docs/setup.mdx" => "import X from 'y'\n\n<Tabs>Install</Tabs>",
        "docs/zh/index.md" => "中文文档",
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    body.into_response()
}

/// Expected `(title, text)` pairs, in crawl order.
pub fn expected_documents() -> Vec<(&'static str, &'static str)> {
    vec![
        ("intro.md", "# Intro Welcome to the docs See"),
        ("advanced.md", "Advanced usage"),
        ("setup.mdx", "import X from 'y' Install"),
    ]
}

/// Write a config pointing at `base` with its data dir under `root`.
pub fn write_config(root: &std::path::Path, base: &str, token_env: &str) -> PathBuf {
    let config_dir = root.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();

    let content = format!(
        r#"[github]
api_base = "{}"
token_env = "{}"

[[github.repos]]
owner = "acme"
repo = "widgets"
path = "docs"

[corpus]
data_dir = "{}/data"
"#,
        base,
        token_env,
        root.display()
    );

    let path = config_dir.join("docs-corpus.toml");
    std::fs::write(&path, content).unwrap();
    path
}
