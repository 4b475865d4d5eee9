use crate::core::{CatalogSource, ConfigProvider, HeritageSite, NarrationService};
use crate::domain::model::{AudioClip, NarrationRequest};
use crate::utils::error::{Result, TrailError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;

fn ensure_success(response: Response, endpoint: &str) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status from {}: {}", endpoint, status);
    if !status.is_success() {
        return Err(TrailError::StatusError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// GETs the site list from the catalog endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.catalog_endpoint(), config.catalog_timeout())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_sites(&self) -> Result<Vec<HeritageSite>> {
        tracing::debug!("Fetching heritage sites from: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .send()
            .await?;

        let sites: Vec<HeritageSite> = ensure_success(response, &self.endpoint)?.json().await?;
        tracing::debug!("Catalog endpoint returned {} sites", sites.len());
        Ok(sites)
    }
}

/// POSTs `{site_name, full_history}` to the narration webhook. A 2xx body is
/// the audio clip; anything else is an error.
#[derive(Debug, Clone)]
pub struct WebhookNarrator {
    client: Client,
    webhook: String,
    timeout: Duration,
}

impl WebhookNarrator {
    pub fn new(webhook: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            webhook: webhook.into(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.narration_webhook(), config.narration_timeout())
    }
}

#[async_trait]
impl NarrationService for WebhookNarrator {
    async fn request_narration(&self, request: &NarrationRequest) -> Result<AudioClip> {
        tracing::debug!("Requesting narration for '{}' from {}", request.site_name, self.webhook);
        let response = self
            .client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(response, &self.webhook)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(TrailError::EmptyAudioError {
                site: request.site_name.clone(),
            });
        }

        tracing::debug!(
            "Received {} bytes of {} for '{}'",
            bytes.len(),
            content_type.as_deref().unwrap_or("audio"),
            request.site_name
        );
        Ok(AudioClip::new(bytes.to_vec(), content_type.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_catalog_source_parses_sites() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/heritage-sites");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name": "Victoria Memorial", "lat": 22.5448, "lng": 88.3426},
                    {"id": 2, "name": "Howrah Bridge", "lat": 22.585, "lng": 88.3478,
                     "history_details": "Opened in 1943"}
                ]));
        });

        let source = HttpCatalogSource::new(server.url("/heritage-sites"), Duration::from_secs(5));
        let sites = source.fetch_sites().await.unwrap();

        api_mock.assert();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].history_details.as_deref(), Some("Opened in 1943"));
    }

    #[tokio::test]
    async fn test_catalog_source_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/heritage-sites");
            then.status(502);
        });

        let source = HttpCatalogSource::new(server.url("/heritage-sites"), Duration::from_secs(5));
        let result = source.fetch_sites().await;
        assert!(matches!(result, Err(TrailError::StatusError { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_catalog_source_rejects_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/heritage-sites");
            then.status(200).body("<html>maintenance</html>");
        });

        let source = HttpCatalogSource::new(server.url("/heritage-sites"), Duration::from_secs(5));
        assert!(source.fetch_sites().await.is_err());
    }

    #[tokio::test]
    async fn test_narrator_posts_site_name_and_history() {
        let server = MockServer::start();
        let webhook = server.mock(|when, then| {
            when.method(POST)
                .path("/narrate-heritage")
                .json_body(serde_json::json!({
                    "site_name": "Howrah Bridge",
                    "full_history": "Opened in 1943"
                }));
            then.status(200)
                .header("Content-Type", "audio/wav")
                .body(vec![82u8, 73, 70, 70]);
        });

        let narrator = WebhookNarrator::new(server.url("/narrate-heritage"), Duration::from_secs(5));
        let request = NarrationRequest {
            site_name: "Howrah Bridge".to_string(),
            full_history: Some("Opened in 1943".to_string()),
        };
        let clip = narrator.request_narration(&request).await.unwrap();

        webhook.assert();
        assert_eq!(clip.bytes, b"RIFF".to_vec());
        assert_eq!(clip.extension(), "wav");
    }

    #[tokio::test]
    async fn test_narrator_empty_body_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/narrate-heritage");
            then.status(200);
        });

        let narrator = WebhookNarrator::new(server.url("/narrate-heritage"), Duration::from_secs(5));
        let request = NarrationRequest {
            site_name: "Kalighat Temple".to_string(),
            full_history: None,
        };
        let result = narrator.request_narration(&request).await;
        assert!(matches!(result, Err(TrailError::EmptyAudioError { .. })));
    }
}
