use crate::{Config, Params};
use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{header, Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde_json::Value;

mod activity;
mod error;
mod pagination;
mod rate_limit;
mod transport;

pub use activity::{ActivityClient, WatchingClient};
pub use error::{Error, GithubClientError, GithubClientErrorType, Result};
pub use pagination::{Pagination, PaginationOptions};
pub use rate_limit::Rate;
pub use transport::Transport;

// Constants
const DEFAULT_BASE_URL: &str = "https://api.github.com/";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const HEADER_LINK: &str = "Link";
const HEADER_RATE_LIMIT: &str = "X-RateLimit-Limit";
const HEADER_RATE_REMAINING: &str = "X-RateLimit-Remaining";
const HEADER_RATE_RESET: &str = "X-RateLimit-Reset";

const MEDIA_TYPE_V3: &str = "application/vnd.github.v3+json";

#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    github_api_token: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            github_api_token: config.github_api_token.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn github_api_token<S: Into<String>>(mut self, github_api_token: S) -> Self {
        self.github_api_token = Some(github_api_token.into());
        self
    }

    /// Owner used by operations which allow falling back to the client's context
    pub fn owner<S: Into<String>>(mut self, owner: S) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Repository used by operations which allow falling back to the client's context
    pub fn repo<S: Into<String>>(mut self, repo: S) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_owned());

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(MEDIA_TYPE_V3));

        if let Some(token) = &self.github_api_token {
            let mut value = header::HeaderValue::from_str(&format!("token {}", token))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = ReqwestClient::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Client {
            base_url,
            user_agent,
            authenticated: self.github_api_token.is_some(),
            owner: non_blank(self.owner),
            repo: non_blank(self.repo),
            client,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[derive(Debug)]
pub struct Client {
    /// Base URL to use for API requests. Defaults to the public GitHub API,
    /// but can be overridden for use with GitHub Enterprise. Must always be
    /// terminated with a trailing slash.
    base_url: String,

    /// User agent string sent when communicating with GitHub APIs
    user_agent: String,

    /// Whether requests carry an API token
    authenticated: bool,

    /// Default owner and repository for this client
    owner: Option<String>,
    repo: Option<String>,

    /// Client used to make http requests
    client: ReqwestClient,
}

impl Client {
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether this client sends an API token. Watching and unwatching require one.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, url);
        self.client.request(method, &url)
    }

    async fn send(&self, method: Method, url: &str, params: &Params) -> Result<Response<Value>> {
        debug!("Github Request: {} {}{}", method, self.base_url, url);
        trace!("Github Request params: {:?}", params);

        let with_body = method == Method::PUT;
        let mut request = self.request(method, url);
        if !params.is_empty() {
            request = if with_body {
                request.json(params)
            } else {
                request.query(params)
            };
        }

        let response = request.send().await?;
        self.process_response(response).await
    }

    // Process a response recieved from Github. This checks for things like hitting rate limits,
    // etc., and then deserializes the json response.
    async fn process_response(&self, response: reqwest::Response) -> Result<Response<Value>> {
        debug!("Github Response: {:#?}", response);

        let status = response.status();
        let pagination = Pagination::from_headers(response.headers());
        let rate = Rate::from_headers(response.headers());
        let rate_exhausted = Rate::is_exhausted(response.headers());
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(error_for_status(status, rate_exhausted, &payload));
        }

        // 204 No Content and friends
        let data = if payload.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&payload)?
        };

        Ok(Response::new(pagination, rate, data))
    }

    pub fn activity(&self) -> ActivityClient<'_> {
        ActivityClient::new(self)
    }
}

fn error_for_status(status: StatusCode, rate_exhausted: bool, payload: &str) -> Error {
    let error = GithubClientError::from_body(payload);

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(error),
        StatusCode::FORBIDDEN if rate_exhausted => Error::RateLimit,
        StatusCode::FORBIDDEN if is_abuse_limit(&error) => Error::AbuseLimit,
        _ => Error::GithubClientError(status, error),
    }
}

// https://developer.github.com/v3/#abuse-rate-limits
fn is_abuse_limit(error: &GithubClientError) -> bool {
    error
        .message()
        .map(str::to_lowercase)
        .map_or(false, |m| m.contains("abuse") || m.contains("secondary rate limit"))
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, path: &str, params: &Params) -> Result<Response<Value>> {
        self.send(Method::GET, path, params).await
    }

    async fn put(&self, path: &str, params: &Params) -> Result<Response<Value>> {
        self.send(Method::PUT, path, params).await
    }

    async fn delete(&self, path: &str, params: &Params) -> Result<Response<Value>> {
        self.send(Method::DELETE, path, params).await
    }
}

/// A decoded payload along with the paging and rate limit information Github sent with it
#[derive(Debug, Clone)]
pub struct Response<T> {
    pagination: Pagination,
    rate: Rate,
    data: T,
}

impl<T> Response<T> {
    pub fn new(pagination: Pagination, rate: Rate, data: T) -> Self {
        Self {
            pagination,
            rate,
            data,
        }
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> (Pagination, Rate, T) {
        (self.pagination, self.rate, self.data)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response::new(self.pagination, self.rate, f(self.data))
    }
}
