use crate::client::Client;

mod watching;

pub use watching::WatchingClient;

/// `ActivityClient` handles communication with the activity related methods of the GitHub API.
///
/// GitHub API docs: https://developer.github.com/v3/activity/
pub struct ActivityClient<'a> {
    inner: &'a Client,
}

impl<'a> ActivityClient<'a> {
    pub(in crate::client) fn new(client: &'a Client) -> Self {
        Self { inner: client }
    }

    pub fn watching(&self) -> WatchingClient<'a> {
        WatchingClient::new(self.inner).with_context(self.inner.owner(), self.inner.repo())
    }
}
