//! Japanese specialist catalog client.
//!
//! Anime subtitles live in a dedicated catalog that the general ones barely
//! cover. It is only consulted when one of the requested languages is
//! Japanese; its results are merged into the candidate set by language
//! field. The response is a flat array of file entries, every one of them
//! Japanese.

use super::{CatalogAdapter, ContentRef, SubtitleCandidate};
use crate::Result;
use crate::error::DualSubError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SpecialistEntry {
    id: String,
    url: String,
    #[serde(default)]
    name: String,
}

/// Client for the Japanese specialist catalog.
#[derive(Debug, Clone)]
pub struct JapaneseCatalog {
    client: Client,
    base_url: String,
}

impl JapaneseCatalog {
    /// Create a client with the catalog query timeout.
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
                "{}/entries/{}/{}/{}.json",
                base, content.id, season, episode
            ),
            _ => format!("{}/entries/{}.json", base, content.id),
        }
    }
}

#[async_trait]
impl CatalogAdapter for JapaneseCatalog {
    fn name(&self) -> &'static str {
        "japanese"
    }

    async fn search(&self, content: &ContentRef) -> Result<Vec<SubtitleCandidate>> {
        let url = self.search_url(content);
        log::debug!("japanese catalog query: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DualSubError::upstream(format!("japanese catalog: {e}")))?;
        if !response.status().is_success() {
            return Err(DualSubError::upstream(format!(
                "japanese catalog returned {}",
                response.status()
            )));
        }

        let entries: Vec<SpecialistEntry> = response
            .json()
            .await
            .map_err(|e| DualSubError::upstream(format!("japanese catalog body: {e}")))?;

        Ok(entries
            .into_iter()
            // SRT only; the pipeline does not convert containers.
            .filter(|entry| entry.name.is_empty() || entry.name.ends_with(".srt"))
            .map(|entry| SubtitleCandidate {
                id: entry.id,
                url: entry.url,
                language: "jpn".to_string(),
            })
            .collect())
    }
}
