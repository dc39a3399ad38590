//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`$XDG_CONFIG_HOME/dualsub/config.toml` unless overridden), then
//! `DUALSUB_*` environment variables (`DUALSUB_MERGE__THRESHOLD_MS=700`).
//! Only the orchestrator reads configuration; the core stages take their
//! inputs as plain arguments and their thresholds as compile-time
//! constants.

use crate::Result;
use crate::error::DualSubError;
use serde::Deserialize;
use std::path::PathBuf;

/// Language pair selected by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanguageSettings {
    /// Main (top line) language tag.
    pub main_language: String,
    /// Translation (italic second line) language tag.
    pub translation_language: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            main_language: "en".to_string(),
            translation_language: "es".to_string(),
        }
    }
}

/// Merge engine tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Proximity window for cue alignment, in milliseconds.
    pub threshold_ms: u64,
    /// Maximum translation candidates tried per request.
    pub max_translation_candidates: usize,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            threshold_ms: 500,
            max_translation_candidates: 4,
        }
    }
}

/// Network limits for catalog queries and subtitle downloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Catalog query timeout in seconds.
    pub catalog_timeout_secs: u64,
    /// Per-subtitle download timeout in seconds.
    pub download_timeout_secs: u64,
    /// Maximum accepted subtitle size in bytes.
    pub max_subtitle_bytes: usize,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            catalog_timeout_secs: 10,
            download_timeout_secs: 15,
            max_subtitle_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Upstream catalog endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Primary catalog base URL.
    pub primary_url: String,
    /// Fallback catalog base URL.
    pub fallback_url: String,
    /// Landing URL fetched once to obtain the fallback session cookie.
    pub fallback_landing_url: String,
    /// Japanese specialist catalog base URL; `None` disables it.
    pub japanese_url: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            primary_url: "https://opensubtitles-v3.strem.io".to_string(),
            fallback_url: "https://rest.opensubtitles.org".to_string(),
            fallback_landing_url: "https://www.opensubtitles.org".to_string(),
            japanese_url: None,
        }
    }
}

/// Where finished artifacts are published.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage backend: `local`, `blob`, or `object-store`.
    pub destination: String,
    /// Output directory for the `local` backend.
    pub output_dir: PathBuf,
    /// External base URL under which stored artifacts are reachable.
    pub base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            destination: "local".to_string(),
            output_dir: PathBuf::from("subtitles"),
            base_url: "http://127.0.0.1:7000/subtitles".to_string(),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language pair.
    pub languages: LanguageSettings,
    /// Merge tuning.
    pub merge: MergeSettings,
    /// Network limits.
    pub network: NetworkSettings,
    /// Catalog endpoints.
    pub catalogs: CatalogSettings,
    /// Artifact storage.
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from the default config file location plus
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load settings from an explicit config file path (when it exists)
    /// plus environment overrides.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if path.exists() {
                builder = builder.add_source(config::File::from(path));
            }
        }
        builder = builder.add_source(
            config::Environment::with_prefix("DUALSUB")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.merge.max_translation_candidates == 0 {
            return Err(DualSubError::config(
                "merge.max_translation_candidates must be at least 1",
            ));
        }
        if self.network.max_subtitle_bytes == 0 {
            return Err(DualSubError::config(
                "network.max_subtitle_bytes must be positive",
            ));
        }
        if !matches!(
            self.storage.destination.as_str(),
            "local" | "blob" | "object-store"
        ) {
            return Err(DualSubError::config(format!(
                "unknown storage.destination '{}'",
                self.storage.destination
            )));
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/dualsub/config.toml` (or platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dualsub").join("config.toml"))
}
