//! Error type for Github Client

use serde::Deserialize;
use std::{borrow::Cow, io};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Io error")]
    Io(#[from] io::Error),

    #[error("reqwest error")]
    Reqwest(#[from] reqwest::Error),

    #[error("json error")]
    Json(#[from] serde_json::Error),

    #[error("toml parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("`{0}`")]
    Message(Cow<'static, str>),

    /// A required path parameter was empty. No request was sent.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A path parameter can't be sent as a single path segment. No request was sent.
    #[error("invalid parameter `{0}`: `{1}`")]
    InvalidParameter(&'static str, String),

    #[error("not found: {0:?}")]
    NotFound(GithubClientError),

    #[error("`{0}` `{1:?}`")]
    GithubClientError(reqwest::StatusCode, GithubClientError),

    #[error("RateLimit")]
    RateLimit,

    #[error("AbuseLimit")]
    AbuseLimit,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// The HTTP status reported by Github, if this error came from a response
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::NotFound(_) => Some(reqwest::StatusCode::NOT_FOUND),
            Error::GithubClientError(status, _) => Some(*status),
            Error::RateLimit | Error::AbuseLimit => Some(reqwest::StatusCode::FORBIDDEN),
            Error::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}

impl From<&'static str> for Error {
    fn from(error: &'static str) -> Self {
        Error::Message(error.into())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Message(error.into())
    }
}

// Github Error Responses
// https://developer.github.com/v3/#client-errors
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GithubClientError {
    pub message: Option<String>,
    pub errors: Option<Vec<GithubClientErrorType>>,
    pub documentation_url: Option<String>,
}

impl GithubClientError {
    // Github doesn't always send json on failure (e.g. proxies in front of GHE), so keep whatever
    // text we got as the message
    pub(super) fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| GithubClientError {
            message: if body.is_empty() {
                None
            } else {
                Some(body.to_owned())
            },
            ..Default::default()
        })
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GithubClientErrorType {
    Message(String),
    Code {
        resource: String,
        field: String,
        code: String,
    },
}
