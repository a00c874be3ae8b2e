use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};

use crate::http::HttpClient;

use super::repo::GitHubRepo;
use super::types::Release;

/// Suffix of the digest sidecar published next to every release asset.
pub const DIGEST_SUFFIX: &str = ".sha256";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetReleases: Send + Sync {
    /// Fetch the release GitHub currently marks as latest.
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release>;

    /// Fetch the SHA-256 digest published at `<asset_url>.sha256`.
    async fn get_asset_digest(&self, asset_url: &str) -> Result<String>;
}

pub struct GitHub {
    pub client: HttpClient,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| "https://api.github.com".to_string());
        let api_url = api_url.trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    fn latest_release_url(&self, repo: &GitHubRepo) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        )
    }
}

#[async_trait]
impl GetReleases for GitHub {
    #[tracing::instrument(skip(self))]
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release> {
        let url = self.latest_release_url(repo);
        debug!("Fetching latest release of {} from {}...", repo, url);

        let release: Release = self
            .client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch latest release info for {}", repo))?;

        if release.draft || release.prerelease {
            warn!(
                "Latest release {} of {} is marked draft={} prerelease={}",
                release.tag_name, repo, release.draft, release.prerelease
            );
        }
        debug!(
            "Release {} ({}) has {} assets",
            release.name,
            release.tag_name,
            release.assets.len()
        );

        Ok(release)
    }

    #[tracing::instrument(skip(self))]
    async fn get_asset_digest(&self, asset_url: &str) -> Result<String> {
        let url = format!("{}{}", asset_url, DIGEST_SUFFIX);
        self.client
            .get_text(&url)
            .await
            .with_context(|| format!("Failed to fetch digest for {}", asset_url))
    }
}
