//! # projwiz-github
//!
//! Client for the hosted-repository REST API (GitHub v3 shape).
//!
//! The lenient methods ([`GitHubClient::get_identity`],
//! [`GitHubClient::list_repositories`], and friends) never fail: transport
//! errors and non-2xx responses are logged and surface as `None` or an
//! empty list. A credential that is empty or still the sample placeholder
//! short-circuits without touching the network.
//!
//! ```no_run
//! use projwiz_github::GitHubClient;
//!
//! # async fn example() -> projwiz_github::Result<()> {
//! let client = GitHubClient::new("https://api.github.com")?;
//! if let Some(login) = client.get_identity("ghp_example").await {
//!     println!("authenticated as {}", login);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod error;
mod types;

pub use client::{GitHubClient, USER_AGENT};
pub use error::{Error, Result};
pub use types::{Branch, CreateRepositoryRequest, CreatedRepository, Identity, Repository};
