use async_trait::async_trait;

use crate::error::ExtractError;

mod request;

pub use self::request::{RequestFetcher, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Source of raw page markup.
///
/// Failures are reported as [`ExtractError::Fetch`] before any parsing is
/// attempted.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError>;
}
