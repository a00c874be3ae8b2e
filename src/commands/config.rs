use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    github::{GetReleases, GitHub, GitHubRepo},
    http::HttpClient,
};

const USER_AGENT: &str = concat!("pbs-dotslash/", env!("PBS_DOTSLASH_VERSION"));

pub struct Config<G: GetReleases> {
    pub github: G,
    pub repo: GitHubRepo,
}

impl Config<GitHub> {
    pub fn new(
        repo: Option<&str>,
        api_url: Option<String>,
        github_token: Option<String>,
    ) -> Result<Self> {
        let repo = match repo {
            Some(repo) => repo.parse::<GitHubRepo>()?,
            None => GitHubRepo::default(),
        };

        let mut headers = HeaderMap::new();
        if let Some(token) = github_token.filter(|t| !t.is_empty()) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GITHUB_TOKEN contains invalid header characters")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication ({} chars)", token.len());
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        let github = GitHub::new(HttpClient::new(client), api_url);

        Ok(Self { github, repo })
    }
}
