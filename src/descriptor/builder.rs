use anyhow::{Context, Result};
use log::debug;

use crate::github::{GetReleases, ReleaseAsset};
use crate::platform::{Platform, PlatformConfig};

use super::{ArchiveFormat, Arg0, HashAlgorithm, PlatformDescriptor, Provider};

/// The asset's URL does not end in an archive format `dotslash` can unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFormatError {
    pub platform: Platform,
    pub url: String,
}

impl std::fmt::Display for UnsupportedFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let supported: Vec<&str> = ArchiveFormat::ALL
            .iter()
            .map(|format| format.extension())
            .collect();
        write!(
            f,
            "Asset for {} isn't supported by dotslash (expected one of {}): {}",
            self.platform,
            supported.join(", "),
            self.url
        )
    }
}

impl std::error::Error for UnsupportedFormatError {}

/// Builds the descriptor entry for one selected asset.
///
/// The archive format is checked before the digest sidecar is requested, so
/// an unsupported asset never costs a network round trip.
#[tracing::instrument(skip(github, config, asset), fields(asset = %asset.name))]
pub async fn platform_descriptor<G: GetReleases + ?Sized>(
    github: &G,
    platform: &Platform,
    config: &PlatformConfig,
    asset: &ReleaseAsset,
) -> Result<PlatformDescriptor> {
    let url = &asset.browser_download_url;
    let format = ArchiveFormat::from_url(url).ok_or_else(|| UnsupportedFormatError {
        platform: *platform,
        url: url.clone(),
    })?;

    let digest = github
        .get_asset_digest(url)
        .await
        .with_context(|| format!("Failed to build descriptor for {}", platform))?;
    debug!("{}: {} sha256={}", platform, asset.name, digest);

    Ok(PlatformDescriptor {
        arg0: Some(Arg0::UnderlyingExecutable),
        digest,
        format,
        hash: HashAlgorithm::Sha256,
        path: config.path.to_string(),
        providers: vec![Provider { url: url.clone() }],
        size: asset.size,
    })
}
