//! The per-request merge pipeline.
//!
//! One request names a movie or episode and two languages. The pipeline
//! queries the catalogs, picks the first main-language candidate that
//! survives fetch, strict decode, language verification, and parsing, then
//! runs up to N translation candidates through the same chain, merges each
//! against the main track, and serializes one artifact per success.
//!
//! Candidate failures are logged and skipped; request-level failures
//! surface as an empty outcome with a short cache TTL. An artifact is only
//! ever produced whole.

use crate::Result;
use crate::config::Settings;
use crate::core::encoding::SubtitleDecoder;
use crate::core::formats::{CueTrack, ads, srt};
use crate::core::language::{LanguageTag, LanguageVerifier, Verdict};
use crate::core::merge::MergeEngine;
use crate::error::DualSubError;
use crate::services::catalog::{
    CatalogAdapter, ContentRef, FallbackCatalog, JapaneseCatalog, PrimaryCatalog,
    SubtitleCandidate,
};
use crate::services::download::SubtitleFetcher;
use futures::StreamExt;
use futures::stream;
use std::collections::HashSet;
use std::time::Duration;

/// Cache directives attached to a pipeline outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Seconds the result may be served from cache.
    pub max_age_secs: u64,
    /// Seconds a stale result may be served while revalidating.
    pub stale_revalidate_secs: u64,
}

impl CachePolicy {
    /// Policy for a request that produced artifacts.
    pub const HIT: CachePolicy = CachePolicy {
        max_age_secs: 21_600,
        stale_revalidate_secs: 86_400,
    };
    /// Short policy for empty results, so transient failures retry soon.
    pub const MISS: CachePolicy = CachePolicy {
        max_age_secs: 60,
        stale_revalidate_secs: 60,
    };
}

/// One finished bilingual subtitle.
#[derive(Debug, Clone)]
pub struct MergedArtifact {
    /// File name following the artifact naming scheme.
    pub file_name: String,
    /// Language pair label, `{main}+{translation}`.
    pub label: String,
    /// Complete serialized SRT content.
    pub content: String,
}

/// Result of running the pipeline for one request.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Successfully merged artifacts, in catalog order.
    pub artifacts: Vec<MergedArtifact>,
    /// Cache directives for the response.
    pub cache: CachePolicy,
    /// The request-level failure behind an empty outcome, when there is one.
    pub failure: Option<DualSubError>,
}

/// A merge request: what to merge and into which language pair.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// The movie or episode.
    pub content: ContentRef,
    /// Main (top line) language.
    pub main: LanguageTag,
    /// Translation (italic second line) language.
    pub translation: LanguageTag,
}

/// The orchestrator. Owns the catalogs and the per-stage engines; holds no
/// per-request state.
pub struct MergePipeline {
    decoder: SubtitleDecoder,
    verifier: LanguageVerifier,
    fetcher: SubtitleFetcher,
    primary: Box<dyn CatalogAdapter>,
    fallback: Box<dyn CatalogAdapter>,
    japanese: Option<Box<dyn CatalogAdapter>>,
    merge_threshold_ms: u64,
    max_translation_candidates: usize,
}

impl MergePipeline {
    /// Build a pipeline from explicit parts. Tests use this to point the
    /// adapters at mock servers.
    pub fn new(
        primary: Box<dyn CatalogAdapter>,
        fallback: Box<dyn CatalogAdapter>,
        japanese: Option<Box<dyn CatalogAdapter>>,
        fetcher: SubtitleFetcher,
        merge_threshold_ms: u64,
        max_translation_candidates: usize,
    ) -> Self {
        Self {
            decoder: SubtitleDecoder::new(),
            verifier: LanguageVerifier::new(),
            fetcher,
            primary,
            fallback,
            japanese,
            merge_threshold_ms,
            max_translation_candidates,
        }
    }

    /// Build a pipeline from configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let catalog_timeout = Duration::from_secs(settings.network.catalog_timeout_secs);
        let download_timeout = Duration::from_secs(settings.network.download_timeout_secs);

        let primary = PrimaryCatalog::new(&settings.catalogs.primary_url, catalog_timeout)?;
        let fallback = FallbackCatalog::new(
            &settings.catalogs.fallback_url,
            &settings.catalogs.fallback_landing_url,
            catalog_timeout,
        )?;
        let japanese = settings
            .catalogs
            .japanese_url
            .as_ref()
            .map(|url| JapaneseCatalog::new(url, catalog_timeout))
            .transpose()?
            .map(|catalog| Box::new(catalog) as Box<dyn CatalogAdapter>);
        let fetcher = SubtitleFetcher::new(download_timeout, settings.network.max_subtitle_bytes)?;

        Ok(Self::new(
            Box::new(primary),
            Box::new(fallback),
            japanese,
            fetcher,
            settings.merge.threshold_ms,
            settings.merge.max_translation_candidates,
        ))
    }

    /// Run one request to completion.
    ///
    /// Never returns an error: request-level failures become an empty
    /// outcome with [`CachePolicy::MISS`] and the failure attached.
    pub async fn run(&self, request: &PipelineRequest) -> PipelineOutcome {
        match self.execute(request).await {
            Ok(artifacts) if !artifacts.is_empty() => PipelineOutcome {
                artifacts,
                cache: CachePolicy::HIT,
                failure: None,
            },
            Ok(_) => PipelineOutcome {
                artifacts: Vec::new(),
                cache: CachePolicy::MISS,
                failure: None,
            },
            Err(failure) => {
                log::warn!("request {} failed: {failure}", request.content);
                PipelineOutcome {
                    artifacts: Vec::new(),
                    cache: CachePolicy::MISS,
                    failure: Some(failure),
                }
            }
        }
    }

    async fn execute(&self, request: &PipelineRequest) -> Result<Vec<MergedArtifact>> {
        if request.main == request.translation {
            return Err(DualSubError::SameLanguage {
                language: request.main.to_string(),
            });
        }
        for tag in [&request.main, &request.translation] {
            if tag.is_skippable() {
                return Err(DualSubError::SkippedLanguage {
                    language: tag.to_string(),
                });
            }
        }

        let candidates = self.collect_candidates(request).await?;
        log::debug!(
            "{}: {} candidate(s) across catalogs",
            request.content,
            candidates.len()
        );

        let main_track = self.select_main_track(request, &candidates).await?;
        let artifacts = self
            .build_translations(request, &candidates, &main_track)
            .await;
        Ok(artifacts)
    }

    /// Query the primary catalog; fall back to the secondary when neither
    /// requested language is present; add the Japanese specialist when one
    /// of the languages is Japanese.
    async fn collect_candidates(
        &self,
        request: &PipelineRequest,
    ) -> Result<Vec<SubtitleCandidate>> {
        let (mut candidates, primary_error) = match self.primary.search(&request.content).await {
            Ok(found) => (found, None),
            Err(error) => {
                log::warn!("primary catalog failed: {error}");
                (Vec::new(), Some(error))
            }
        };

        let has_main = candidates
            .iter()
            .any(|c| request.main.matches(&c.language));
        let has_translation = candidates
            .iter()
            .any(|c| request.translation.matches(&c.language));

        if !has_main && !has_translation {
            match self.fallback.search(&request.content).await {
                Ok(found) => candidates.extend(found),
                Err(fallback_error) => {
                    if primary_error.is_some() {
                        return Err(DualSubError::upstream(format!(
                            "primary and fallback catalogs both failed: {fallback_error}"
                        )));
                    }
                    log::warn!("fallback catalog failed: {fallback_error}");
                }
            }
        }

        let wants_japanese = request.main.matches("jpn") || request.translation.matches("jpn");
        if wants_japanese {
            if let Some(japanese) = &self.japanese {
                match japanese.search(&request.content).await {
                    Ok(found) => candidates.extend(found),
                    Err(error) => log::warn!("japanese catalog failed: {error}"),
                }
            }
        }

        Ok(candidates)
    }

    /// First main-language candidate, in catalog rank order, that survives
    /// the whole fetch/decode/verify/parse chain.
    async fn select_main_track(
        &self,
        request: &PipelineRequest,
        candidates: &[SubtitleCandidate],
    ) -> Result<CueTrack> {
        for candidate in candidates
            .iter()
            .filter(|c| request.main.matches(&c.language))
        {
            match self.load_track(&candidate.url, &request.main).await {
                Ok(track) => {
                    log::info!(
                        "main track: candidate {} ({} cues)",
                        candidate.id,
                        track.len()
                    );
                    return Ok(track);
                }
                Err(error) => {
                    log::debug!("main candidate {} skipped: {error}", candidate.id);
                }
            }
        }
        Err(DualSubError::NoMainCandidate {
            language: request.main.to_string(),
        })
    }

    /// Process up to N distinct-URL translation candidates concurrently,
    /// emitting artifacts in catalog order. Failures skip silently.
    async fn build_translations(
        &self,
        request: &PipelineRequest,
        candidates: &[SubtitleCandidate],
        main_track: &CueTrack,
    ) -> Vec<MergedArtifact> {
        let mut seen_urls = HashSet::new();
        let selected: Vec<&SubtitleCandidate> = candidates
            .iter()
            .filter(|c| request.translation.matches(&c.language))
            .filter(|c| seen_urls.insert(c.url.clone()))
            .take(self.max_translation_candidates)
            .collect();

        let results: Vec<(String, Result<String>)> = stream::iter(selected)
            .map(|candidate| async move {
                (
                    candidate.id.clone(),
                    self.merge_candidate(request, candidate, main_track).await,
                )
            })
            .buffered(self.max_translation_candidates.max(1))
            .collect()
            .await;

        let label = format!("{}+{}", request.main, request.translation);
        let mut artifacts = Vec::new();
        for (candidate_id, result) in results {
            match result {
                Ok(content) => {
                    let version = artifacts.len() + 1;
                    artifacts.push(MergedArtifact {
                        file_name: artifact_file_name(
                            &request.content,
                            &request.main,
                            &request.translation,
                            version,
                        ),
                        label: label.clone(),
                        content,
                    });
                }
                Err(error) if error.is_candidate_failure() => {
                    log::debug!("translation candidate {candidate_id} skipped: {error}");
                }
                Err(error) => {
                    log::warn!("translation candidate {candidate_id} skipped: {error}");
                }
            }
        }
        artifacts
    }

    /// Fetch, validate, merge, and serialize one translation candidate.
    async fn merge_candidate(
        &self,
        request: &PipelineRequest,
        candidate: &SubtitleCandidate,
        main_track: &CueTrack,
    ) -> Result<String> {
        let translation_track = self
            .load_track(&candidate.url, &request.translation)
            .await?;
        let merged =
            MergeEngine::new(self.merge_threshold_ms).merge(main_track, &translation_track);
        if merged.is_empty() {
            return Err(DualSubError::EmptyMerge);
        }
        Ok(srt::serialize(&merged))
    }

    /// The shared per-candidate chain: fetch bytes, strict decode, verify
    /// language, parse, scrub ads.
    async fn load_track(&self, url: &str, expected: &LanguageTag) -> Result<CueTrack> {
        let bytes = self.fetcher.fetch(url).await?;
        let decoded = self.decoder.decode_strict(&bytes, Some(expected))?;
        match self.verifier.verify(&decoded.text, expected) {
            Verdict::Match | Verdict::RelatedMatch => {}
            Verdict::Reject { detected } => {
                return Err(DualSubError::language_mismatch(
                    expected.as_str(),
                    detected.unwrap_or_else(|| "unknown".to_string()),
                ));
            }
        }
        let track = srt::parse(&decoded.text)?;
        Ok(ads::scrub(track))
    }
}

/// Artifact file name: `{id}[_S{season}E{episode}]_{main}_{trans}_v{n}.srt`.
fn artifact_file_name(
    content: &ContentRef,
    main: &LanguageTag,
    translation: &LanguageTag,
    version: usize,
) -> String {
    let mut name: String = content
        .id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if let (Some(season), Some(episode)) = (content.season, content.episode) {
        name.push_str(&format!("_S{season}E{episode}"));
    }
    format!("{name}_{main}_{translation}_v{version}.srt")
}
