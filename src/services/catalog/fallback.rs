//! Fallback subtitle catalog client.
//!
//! The fallback catalog speaks an older flat-array dialect and refuses
//! queries without a session cookie obtained from a landing page. The
//! cookie is process-scoped state owned by this adapter alone: one refresh
//! is forced when a query comes back 403 or 404, then the query is retried
//! once.

use super::{CatalogAdapter, ContentRef, SubtitleCandidate};
use crate::Result;
use crate::error::DualSubError;
use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Deserialize)]
struct FallbackEntry {
    #[serde(rename = "IDSubtitleFile")]
    id: String,
    #[serde(rename = "SubDownloadLink")]
    download_link: String,
    #[serde(rename = "SubFormat")]
    format: String,
    #[serde(rename = "SubLanguageID")]
    language: String,
    #[serde(rename = "SubDownloadsCnt", default)]
    downloads: String,
}

/// Session cookie cache, owned by the adapter (never shared with the core).
#[derive(Debug, Default)]
struct SessionState {
    cookie: Mutex<Option<String>>,
}

/// Client for the fallback catalog.
pub struct FallbackCatalog {
    client: Client,
    base_url: String,
    landing_url: String,
    session: SessionState,
}

impl FallbackCatalog {
    /// Create a client; `landing_url` is fetched once per session to obtain
    /// the cookie the search endpoint requires.
    pub fn new(
        base_url: impl Into<String>,
        landing_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DualSubError::upstream(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            landing_url: landing_url.into(),
            session: SessionState::default(),
        })
    }

    fn search_url(&self, content: &ContentRef) -> String {
        let base = self.base_url.trim_end_matches('/');
        let imdb = content.id.trim_start_matches("tt");
        match (content.season, content.episode) {
            (Some(season), Some(episode)) => format!(
                "{}/search/imdbid-{}/season-{}/episode-{}",
                base, imdb, season, episode
            ),
            _ => format!("{}/search/imdbid-{}", base, imdb),
        }
    }

    /// Return the cached cookie, fetching the landing page when the cache
    /// is empty or a refresh is forced.
    async fn session_cookie(&self, force_refresh: bool) -> Result<String> {
        let mut guard = self.session.cookie.lock().await;
        if !force_refresh {
            if let Some(cookie) = guard.as_ref() {
                return Ok(cookie.clone());
            }
        }

        log::debug!("fetching fallback catalog session cookie");
        let response = self
            .client
            .get(&self.landing_url)
            .send()
            .await
            .map_err(|e| DualSubError::upstream(format!("fallback landing page: {e}")))?;

        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .collect::<Vec<_>>()
            .join("; ");

        *guard = Some(cookie.clone());
        Ok(cookie)
    }

    async fn query(&self, url: &str, cookie: &str) -> Result<Response> {
        self.client
            .get(url)
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(|e| DualSubError::upstream(format!("fallback catalog: {e}")))
    }
}

#[async_trait]
impl CatalogAdapter for FallbackCatalog {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn search(&self, content: &ContentRef) -> Result<Vec<SubtitleCandidate>> {
        let url = self.search_url(content);
        log::debug!("fallback catalog query: {url}");

        let cookie = self.session_cookie(false).await?;
        let mut response = self.query(&url, &cookie).await?;

        // A stale cookie shows up as 403/404; refresh once and retry.
        if matches!(
            response.status(),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        ) {
            log::debug!("fallback catalog rejected cookie; refreshing session");
            let cookie = self.session_cookie(true).await?;
            response = self.query(&url, &cookie).await?;
        }

        if !response.status().is_success() {
            return Err(DualSubError::upstream(format!(
                "fallback catalog returned {}",
                response.status()
            )));
        }

        let mut entries: Vec<FallbackEntry> = response
            .json()
            .await
            .map_err(|e| DualSubError::upstream(format!("fallback catalog body: {e}")))?;

        // Only SRT payloads feed the parser; order by download count.
        entries.retain(|entry| entry.format.eq_ignore_ascii_case("srt"));
        entries.sort_by_key(|entry| {
            std::cmp::Reverse(entry.downloads.trim().parse::<u64>().unwrap_or(0))
        });

        Ok(entries
            .into_iter()
            .map(|entry| SubtitleCandidate {
                id: entry.id,
                url: entry.download_link,
                language: entry.language,
            })
            .collect())
    }
}
