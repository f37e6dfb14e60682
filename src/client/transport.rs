use crate::{
    client::{Response, Result},
    KeyNormalizer, Normalizer, Params,
};
use async_trait::async_trait;
use serde_json::Value;

/// Performs authenticated requests against the Github API and decodes the json payload.
///
/// Paths are relative to the API base url and carry no leading slash, e.g.
/// `repos/octocat/hello-world/subscribers`. Implementations must report a missing resource as
/// [`Error::NotFound`](crate::client::Error::NotFound) so callers can tell it apart from every
/// other failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, params: &Params) -> Result<Response<Value>>;

    async fn put(&self, path: &str, params: &Params) -> Result<Response<Value>>;

    async fn delete(&self, path: &str, params: &Params) -> Result<Response<Value>>;

    /// Normalizer applied to caller supplied parameters before each request
    fn normalizer(&self) -> &dyn Normalizer {
        &KeyNormalizer
    }
}
