// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;
use crate::services::{Page, PageFetcher};

/// Create a configured blocking HTTP client.
pub fn create_client(config: &FetcherConfig) -> Result<Client> {
    let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(timeout)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;
    Ok(client)
}

/// Fetches pages over HTTP and parses them as HTML.
///
/// Non-2xx responses are not errors: their bodies are parsed like any other.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with a client configured from `config`.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Page> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AppError::fetch(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered {}; parsing body anyway", url, status);
        }

        let text = response
            .text()
            .map_err(|e| AppError::fetch(url.as_str(), e))?;
        Ok(Page::parse(url.clone(), &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_default() {
        assert!(create_client(&FetcherConfig::default()).is_ok());
    }

    #[test]
    fn test_create_client_without_timeout() {
        let config = FetcherConfig {
            timeout_secs: 0,
            ..FetcherConfig::default()
        };
        assert!(HttpFetcher::from_config(&config).is_ok());
    }
}
