//! GitHub release API access.

mod client;
mod repo;
mod types;

#[cfg(test)]
pub use client::MockGetReleases;
pub use client::{DIGEST_SUFFIX, GetReleases, GitHub};
pub use repo::GitHubRepo;
pub use types::{Release, ReleaseAsset};
