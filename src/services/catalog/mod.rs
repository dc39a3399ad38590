//! Upstream subtitle catalog adapters.
//!
//! A catalog answers one question: which subtitle files exist for a given
//! movie or episode, in which languages, at which URLs. The
//! [`CatalogAdapter`] trait abstracts over the primary catalog, the
//! cookie-guarded fallback catalog, and the Japanese specialist catalog;
//! the orchestrator composes them.

pub mod fallback;
pub mod japanese;
pub mod primary;

use crate::Result;
use async_trait::async_trait;

pub use fallback::FallbackCatalog;
pub use japanese::JapaneseCatalog;
pub use primary::PrimaryCatalog;

/// Identifies a movie or a series episode in upstream catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    /// Catalog content id (e.g. an IMDb id like `tt0111161`).
    pub id: String,
    /// Season number for series content.
    pub season: Option<u32>,
    /// Episode number for series content.
    pub episode: Option<u32>,
}

impl ContentRef {
    /// Reference a movie.
    pub fn movie<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            season: None,
            episode: None,
        }
    }

    /// Reference a series episode.
    pub fn episode<S: Into<String>>(id: S, season: u32, episode: u32) -> Self {
        Self {
            id: id.into(),
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// True when both a season and an episode number are present.
    pub fn is_series(&self) -> bool {
        self.season.is_some() && self.episode.is_some()
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => write!(f, "{} S{}E{}", self.id, s, e),
            _ => write!(f, "{}", self.id),
        }
    }
}

/// One downloadable subtitle a catalog knows about.
///
/// Candidates are returned in the catalog's own rank order (descending
/// download count); the orchestrator relies on that order for main-language
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCandidate {
    /// Catalog-scoped identifier.
    pub id: String,
    /// Direct download URL for the subtitle bytes.
    pub url: String,
    /// Catalog language field (usually a 3-letter code).
    pub language: String,
}

/// A searchable upstream subtitle catalog.
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Short adapter name for logging.
    fn name(&self) -> &'static str;

    /// List every subtitle the catalog has for the content, in rank order.
    async fn search(&self, content: &ContentRef) -> Result<Vec<SubtitleCandidate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_ref_display() {
        assert_eq!(ContentRef::movie("tt0111161").to_string(), "tt0111161");
        assert_eq!(
            ContentRef::episode("tt0903747", 2, 13).to_string(),
            "tt0903747 S2E13"
        );
    }

    #[test]
    fn test_is_series() {
        assert!(!ContentRef::movie("tt1").is_series());
        assert!(ContentRef::episode("tt1", 1, 1).is_series());
    }
}
