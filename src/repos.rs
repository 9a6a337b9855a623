use anyhow::Result;

use crate::config::Config;

pub fn list_repos(config: &Config) -> Result<()> {
    print!("{}", render_repos(config));
    Ok(())
}

fn render_repos(config: &Config) -> String {
    let mut out = format!("{:<32} {}\n", "REPOSITORY", "PATH");
    for repo in &config.github.repos {
        let path = if repo.path.is_empty() { "/" } else { repo.path.as_str() };
        out.push_str(&format!("{:<32} {}\n", repo.slug(), path));
    }
    out
}
