//! Primary subtitle catalog client.
//!
//! The primary catalog answers a single JSON search per content id with
//! `{ "subtitles": [ { "id", "url", "lang" }, ... ] }`, already ordered by
//! descending download count.

use super::{CatalogAdapter, ContentRef, SubtitleCandidate};
use crate::Result;
use crate::error::DualSubError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    subtitles: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: String,
    url: String,
    lang: String,
}

/// Client for the primary catalog.
#[derive(Debug, Clone)]
pub struct PrimaryCatalog {
    client: Client,
    base_url: String,
}

impl PrimaryCatalog {
    /// Create a client with the catalog query timeout applied to every
    /// request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DualSubError::upstream(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn search_url(&self, content: &ContentRef) -> String {
        let base = self.base_url.trim_end_matches('/');
        match (content.season, content.episode) {
            (Some(season), Some(episode)) => format!(
                "{}/subtitles/series/{}:{}:{}.json",
                base, content.id, season, episode
            ),
            _ => format!("{}/subtitles/movie/{}.json", base, content.id),
        }
    }
}

#[async_trait]
impl CatalogAdapter for PrimaryCatalog {
    fn name(&self) -> &'static str {
        "primary"
    }

    async fn search(&self, content: &ContentRef) -> Result<Vec<SubtitleCandidate>> {
        let url = self.search_url(content);
        log::debug!("primary catalog query: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DualSubError::upstream(format!("primary catalog: {e}")))?;
        if !response.status().is_success() {
            return Err(DualSubError::upstream(format!(
                "primary catalog returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| DualSubError::upstream(format!("primary catalog body: {e}")))?;

        Ok(body
            .subtitles
            .into_iter()
            .map(|entry| SubtitleCandidate {
                id: entry.id,
                url: entry.url,
                language: entry.lang,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_search_url_shapes() {
        let catalog =
            PrimaryCatalog::new("http://catalog.test/", Duration::from_secs(10)).unwrap();
        assert_eq!(
            catalog.search_url(&ContentRef::movie("tt0111161")),
            "http://catalog.test/subtitles/movie/tt0111161.json"
        );
        assert_eq!(
            catalog.search_url(&ContentRef::episode("tt0903747", 2, 13)),
            "http://catalog.test/subtitles/series/tt0903747:2:13.json"
        );
    }

    #[tokio::test]
    async fn test_search_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subtitles/movie/tt0111161.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subtitles": [
                    {"id": "1", "url": "http://dl.test/1.srt", "lang": "eng"},
                    {"id": "2", "url": "http://dl.test/2.srt", "lang": "ger"}
                ]
            })))
            .mount(&server)
            .await;

        let catalog = PrimaryCatalog::new(server.uri(), Duration::from_secs(10)).unwrap();
        let candidates = catalog.search(&ContentRef::movie("tt0111161")).await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].language, "eng");
        assert_eq!(candidates[1].url, "http://dl.test/2.srt");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = PrimaryCatalog::new(server.uri(), Duration::from_secs(10)).unwrap();
        let result = catalog.search(&ContentRef::movie("tt1")).await;
        assert!(matches!(
            result,
            Err(DualSubError::UpstreamUnavailable { .. })
        ));
    }
}
