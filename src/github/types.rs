use serde::{Deserialize, Serialize};

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub state: String,
    pub size: u64,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct Release {
    pub name: String,
    pub tag_name: String,
    pub draft: bool,
    pub prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}
