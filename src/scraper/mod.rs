pub mod aggregator;
pub mod cleaner;
pub mod http_client;
pub mod parsers;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

// ── Fetcher trait ─────────────────────────────────────────────────────────────

/// Swappable page source: network, saved file, or a test double.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Serves a saved standings page regardless of the requested URL.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageFetcher for FileFetcher {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {:?}", self.path))
    }
}

// ── URLs ──────────────────────────────────────────────────────────────────────

/// Group contest standings page, unofficial participants included.
/// e.g. https://codeforces.com/group/abc/contest/123/standings/page/1?list=xyz&showUnofficial=true
pub fn standings_url(
    base_url: &str,
    group: &str,
    contest: &str,
    page: &str,
    list: Option<&str>,
) -> Result<String> {
    let mut url = Url::parse(base_url).with_context(|| format!("Invalid base URL {}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Base URL {} cannot carry a path", base_url))?
        .pop_if_empty()
        .extend(["group", group, "contest", contest, "standings", "page", page]);

    {
        let mut query = url.query_pairs_mut();
        if let Some(list) = list {
            query.append_pair("list", list);
        }
        query.append_pair("showUnofficial", "true");
    }

    Ok(url.to_string())
}
