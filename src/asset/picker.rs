use crate::github::{DIGEST_SUFFIX, Release, ReleaseAsset};
use crate::platform::{Platform, PlatformConfig};

/// Why no single asset could be chosen for a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NoMatch {
        version: String,
        platform: Platform,
        release: String,
    },
    Ambiguous {
        version: String,
        platform: Platform,
        config: PlatformConfig,
        candidates: Vec<String>,
    },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::NoMatch {
                version,
                platform,
                release,
            } => write!(
                f,
                "No assets found for version {}, platform {} in release {}",
                version, platform, release
            ),
            SelectionError::Ambiguous {
                version,
                platform,
                config,
                candidates,
            } => write!(
                f,
                "More than one asset matches {} for version {}, platform {}. Candidates: {}",
                config,
                version,
                platform,
                candidates.join(", ")
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Selects the asset for one (version, platform) pair.
pub struct AssetPicker<'a> {
    prefix: String,
    version: &'a str,
    platform: &'a Platform,
    config: &'a PlatformConfig,
}

impl<'a> AssetPicker<'a> {
    pub fn new(
        distribution: &str,
        version: &'a str,
        platform: &'a Platform,
        config: &'a PlatformConfig,
    ) -> Self {
        Self {
            prefix: format!("{}-{}.", distribution, version),
            version,
            platform,
            config,
        }
    }

    /// Check if an asset name belongs to this version and platform
    fn matches(&self, name: &str) -> bool {
        if !name.starts_with(&self.prefix) || name.ends_with(DIGEST_SUFFIX) {
            return false;
        }

        name.contains(self.config.marker)
            && self.config.flavor.is_none_or(|flavor| name.contains(flavor))
    }

    /// Returns the one matching asset, or an error when there are none or several.
    pub fn pick<'r>(&self, release: &'r Release) -> Result<&'r ReleaseAsset, SelectionError> {
        let mut candidates: Vec<&ReleaseAsset> = release
            .assets
            .iter()
            .filter(|a| self.matches(&a.name))
            .collect();

        match candidates.len() {
            0 => Err(SelectionError::NoMatch {
                version: self.version.to_string(),
                platform: *self.platform,
                release: release.name.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(SelectionError::Ambiguous {
                version: self.version.to_string(),
                platform: *self.platform,
                config: *self.config,
                candidates: candidates.iter().map(|a| a.name.clone()).collect(),
            }),
        }
    }
}
