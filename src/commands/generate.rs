use anyhow::Result;
use log::info;
use std::collections::BTreeMap;
use std::io::Write;

use crate::{
    DISTRIBUTION,
    asset::AssetPicker,
    descriptor::{self, Descriptor},
    github::{GetReleases, GitHubRepo},
    platform,
};

use super::config::Config;

/// Default interpreter series to describe.
pub const DEFAULT_VERSION: &str = "3.13";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Interpreter series, e.g. `3.13`
    pub version: String,
    pub free_threaded: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            free_threaded: false,
        }
    }
}

impl GenerateOptions {
    /// `cpython-3.13`, or `cpython-3.13t` for free-threaded builds.
    pub fn descriptor_name(&self) -> String {
        let suffix = if self.free_threaded { "t" } else { "" };
        format!("{}-{}{}", DISTRIBUTION, self.version, suffix)
    }
}

/// Generates a descriptor from the latest release and writes it to stdout.
#[tracing::instrument(skip(api_url, github_token))]
pub async fn generate(
    repo: Option<&str>,
    api_url: Option<String>,
    github_token: Option<String>,
    options: GenerateOptions,
) -> Result<()> {
    let config = Config::new(repo, api_url, github_token)?;
    run(&config, &options, std::io::stdout()).await
}

#[tracing::instrument(skip(config, out))]
pub async fn run<G: GetReleases, W: Write>(
    config: &Config<G>,
    options: &GenerateOptions,
    out: W,
) -> Result<()> {
    let descriptor = build_descriptor(&config.github, &config.repo, options).await?;
    descriptor::emit(&descriptor, out)
}

/// Fetches the latest release once and builds one entry per platform of the
/// requested variant, one platform at a time.
#[tracing::instrument(skip(github))]
pub async fn build_descriptor<G: GetReleases + ?Sized>(
    github: &G,
    repo: &GitHubRepo,
    options: &GenerateOptions,
) -> Result<Descriptor> {
    let release = github.get_latest_release(repo).await?;
    info!(
        "Using release {} ({}) of {}",
        release.name, release.tag_name, repo
    );

    let mut platforms = BTreeMap::new();
    for (platform, config) in platform::for_variant(options.free_threaded) {
        let asset = AssetPicker::new(DISTRIBUTION, &options.version, platform, config)
            .pick(&release)?;
        info!("{}: {}", platform, asset.name);

        let entry = descriptor::platform_descriptor(github, platform, config, asset).await?;
        platforms.insert(platform.name.to_string(), entry);
    }

    Ok(Descriptor {
        name: options.descriptor_name(),
        platforms,
    })
}
