use anyhow::{Result, anyhow};
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

/// The repository publishing the standalone CPython builds.
impl Default for GitHubRepo {
    fn default() -> Self {
        Self {
            owner: "astral-sh".to_string(),
            repo: "python-build-standalone".to_string(),
        }
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!(
                "Invalid repository format '{}'. Expected 'owner/repo'.",
                s
            ))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
