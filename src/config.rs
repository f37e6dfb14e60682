use crate::client::{Client, ClientBuilder, Result};
use serde::Deserialize;
use std::{env, fs, path::Path};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Token sent as `Authorization: token <token>`. Required for watching and unwatching.
    pub github_api_token: Option<String>,

    /// Override for GitHub Enterprise, defaults to https://api.github.com/
    pub base_url: Option<String>,

    pub user_agent: Option<String>,

    /// Default owner for operations that may fall back to the client's context
    pub owner: Option<String>,

    /// Default repository for operations that may fall back to the client's context
    pub repo: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Reads `GITHUB_API_TOKEN`, `GITHUB_API_URL`, `GITHUB_USER_AGENT`, `GITHUB_OWNER` and
    /// `GITHUB_REPO`. Unset or empty variables are left as `None`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            github_api_token: var("GITHUB_API_TOKEN"),
            base_url: var("GITHUB_API_URL"),
            user_agent: var("GITHUB_USER_AGENT"),
            owner: var("GITHUB_OWNER"),
            repo: var("GITHUB_REPO"),
        }
    }

    pub fn build_client(&self) -> Result<Client> {
        ClientBuilder::from_config(self).build()
    }
}
