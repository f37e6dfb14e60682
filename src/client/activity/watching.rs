use crate::{
    client::{Client, Error, Response, Result, Transport},
    Params,
};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS};
use serde_json::Value;

// Characters which would end or split a path segment, plus `%` so that caller input is never
// mistaken for an existing escape.
//
// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// `WatchingClient` handles communication with the repository watching (subscription) methods of
/// the GitHub API.
///
/// Watching a repository registers the user to receive notifications on new discussions, as well
/// as events in the user's activity feed.
///
/// Owner, repository and user names are percent-encoded into a single path segment each. Names
/// which a url parser would collapse (`.` and `..`) are rejected before any request is made.
///
/// GitHub API docs: https://developer.github.com/v3/activity/watching/
pub struct WatchingClient<'a, T: Transport + ?Sized = Client> {
    inner: &'a T,
    owner: Option<&'a str>,
    repo: Option<&'a str>,
}

impl<'a, T: Transport + ?Sized> WatchingClient<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            inner: transport,
            owner: None,
            repo: None,
        }
    }

    /// Default owner and repository used by [`list`](Self::list) when it is given blank ones
    pub fn with_context(mut self, owner: Option<&'a str>, repo: Option<&'a str>) -> Self {
        self.owner = owner;
        self.repo = repo;
        self
    }

    /// List watchers
    ///
    /// A blank `owner` or `repo` falls back to the client's default owner or repository. Only one
    /// page is fetched per call:
    ///
    /// ```no_run
    /// # async fn run(client: github_activity::Client) -> github_activity::client::Result<()> {
    /// use github_activity::{client::PaginationOptions, Params};
    ///
    /// let watching = client.activity().watching();
    /// let mut page = 1;
    /// loop {
    ///     let params: Params = PaginationOptions::page(page).per_page(100).into();
    ///     let response = watching.list("octocat", "hello-world", params).await?;
    ///     for watcher in response.data() {
    ///         println!("{}", watcher["login"]);
    ///     }
    ///     if !response.pagination().has_next() {
    ///         break;
    ///     }
    ///     page += 1;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// GitHub API docs: https://developer.github.com/v3/activity/watching/#list-watchers
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        params: Params,
    ) -> Result<Response<Vec<Value>>> {
        let owner = segment("owner", resolve(owner, self.owner))?;
        let repo = segment("repo", resolve(repo, self.repo))?;
        let params = self.inner.normalizer().normalize(params);

        let url = format!("repos/{}/{}/subscribers", owner, repo);
        let response = self.inner.get(&url, &params).await?;

        into_collection(response)
    }

    /// Alias of [`list`](Self::list)
    pub async fn all(
        &self,
        owner: &str,
        repo: &str,
        params: Params,
    ) -> Result<Response<Vec<Value>>> {
        self.list(owner, repo, params).await
    }

    /// List watchers, handing each one to `f` in the order Github returned them
    pub async fn list_each<F>(
        &self,
        owner: &str,
        repo: &str,
        params: Params,
        f: F,
    ) -> Result<Response<()>>
    where
        F: FnMut(Value),
    {
        let response = self.list(owner, repo, params).await?;
        Ok(for_each(response, f))
    }

    /// List repositories being watched.
    ///
    /// When `params` carries a `user` it is removed and the repositories watched by that user are
    /// listed, otherwise the ones watched by the authenticated user.
    ///
    /// GitHub API docs: https://developer.github.com/v3/activity/watching/#list-repositories-being-watched
    pub async fn watched(&self, params: Params) -> Result<Response<Vec<Value>>> {
        let mut params = self.inner.normalizer().normalize(params);

        let url = match params.take_user() {
            Some(user) => format!("users/{}/subscriptions", segment("user", &user)?),
            None => "user/subscriptions".to_owned(),
        };
        let response = self.inner.get(&url, &params).await?;

        into_collection(response)
    }

    /// List repositories being watched, handing each one to `f` in the order Github returned them
    pub async fn watched_each<F>(&self, params: Params, f: F) -> Result<Response<()>>
    where
        F: FnMut(Value),
    {
        let response = self.watched(params).await?;
        Ok(for_each(response, f))
    }

    /// Check if the authenticated user is watching a repository.
    ///
    /// Only a "not found" from Github means the repository isn't watched, every other failure is
    /// returned as is.
    ///
    /// GitHub API docs: https://developer.github.com/v3/activity/watching/#get-a-repository-subscription
    pub async fn is_watching(&self, owner: &str, repo: &str, params: Params) -> Result<bool> {
        let url = subscription_url(owner, repo)?;
        let params = self.inner.normalizer().normalize(params);

        match self.inner.get(&url, &params).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => {
                debug!("not watching {}/{}", owner, repo);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Watch a repository. Requires an authenticated client.
    ///
    /// GitHub API docs: https://developer.github.com/v3/activity/watching/#set-a-repository-subscription
    pub async fn watch(&self, owner: &str, repo: &str, params: Params) -> Result<Response<Value>> {
        let url = subscription_url(owner, repo)?;
        let params = self.inner.normalizer().normalize(params);

        self.inner.put(&url, &params).await
    }

    /// Stop watching a repository. Requires an authenticated client.
    ///
    /// GitHub API docs: https://developer.github.com/v3/activity/watching/#delete-a-repository-subscription
    pub async fn unwatch(
        &self,
        owner: &str,
        repo: &str,
        params: Params,
    ) -> Result<Response<Value>> {
        let url = subscription_url(owner, repo)?;
        let params = self.inner.normalizer().normalize(params);

        self.inner.delete(&url, &params).await
    }
}

fn subscription_url(owner: &str, repo: &str) -> Result<String> {
    let owner = segment("owner", owner)?;
    let repo = segment("repo", repo)?;
    Ok(format!("user/subscriptions/{}/{}", owner, repo))
}

fn segment<'s>(name: &'static str, value: &'s str) -> Result<PercentEncode<'s>> {
    if value.trim().is_empty() {
        return Err(Error::MissingParameter(name));
    }
    // `%2e` counts as a dot too, so these can't be escaped into a literal segment
    if value == "." || value == ".." {
        return Err(Error::InvalidParameter(name, value.to_owned()));
    }

    Ok(utf8_percent_encode(value, PATH_SEGMENT))
}

fn resolve<'s>(value: &'s str, fallback: Option<&'s str>) -> &'s str {
    match fallback {
        Some(fallback) if value.trim().is_empty() => fallback,
        _ => value,
    }
}

fn into_collection(response: Response<Value>) -> Result<Response<Vec<Value>>> {
    let (pagination, rate, data) = response.into_parts();
    let collection = match data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(format!("expected a json array, got: {}", other).into());
        }
    };

    Ok(Response::new(pagination, rate, collection))
}

fn for_each<F: FnMut(Value)>(response: Response<Vec<Value>>, f: F) -> Response<()> {
    response.map(|items| items.into_iter().for_each(f))
}
