//! Client for Github's v3 activity API: repository watching (subscriptions)
//! https://developer.github.com/v3/activity/watching/
//!
//! ```no_run
//! # async fn run() -> github_activity::client::Result<()> {
//! use github_activity::{Client, Params};
//!
//! let client = Client::builder().github_api_token("<token>").build()?;
//! let watching = client.activity().watching();
//!
//! if !watching.is_watching("octocat", "hello-world", Params::new()).await? {
//!     watching
//!         .watch("octocat", "hello-world", Params::new().with("subscribed", true))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
mod config;
mod params;

pub use client::{Client, ClientBuilder, Response};
pub use config::Config;
pub use params::{KeyNormalizer, Normalizer, ParamValue, Params, USER_KEY};
