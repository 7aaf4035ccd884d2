use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use super::Fetcher;
use crate::config::FetchSettings;
use crate::error::ExtractError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WolfgangBot/1.0)";

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ExtractError> {
        Self::with_user_agent(timeout, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_settings(settings: &FetchSettings) -> Result<Self, ExtractError> {
        Self::with_user_agent(
            Some(Duration::from_secs(settings.timeout_secs)),
            &settings.user_agent,
        )
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!("RequestFetcher: Received {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(None).unwrap();
        let body = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/blocked")
            .with_status(403)
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(Some(Duration::from_secs(5))).unwrap();
        let result = fetcher.fetch(&format!("{}/blocked", server.url())).await;
        assert!(matches!(result, Err(ExtractError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_fetch_error() {
        let fetcher = RequestFetcher::new(Some(Duration::from_secs(2))).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/recipe").await;
        assert!(matches!(result, Err(ExtractError::Fetch(_))));
    }
}
