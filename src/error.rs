//! Error types for the DualSub subtitle pipeline.
//!
//! This module defines the `DualSubError` enum covering all error conditions
//! that can occur during encoding salvage, language verification, cue
//! parsing, merging, catalog access, and artifact storage.
//!
//! Candidate-level errors (decode, language mismatch, parse failure, empty
//! merge, download) are recoverable: the orchestrator skips the candidate
//! and moves on. Request-level errors (no main candidate, same language,
//! skipped language, upstream unavailable) end the request with an empty
//! result and a short cache TTL.
use thiserror::Error;

/// Represents all possible errors in the DualSub pipeline.
///
/// # Examples
///
/// ```rust
/// use dualsub::error::{DualSubError, DualSubResult};
///
/// fn example() -> DualSubResult<()> {
///     Err(DualSubError::parse_failure(3, "timestamp line malformed"))
/// }
/// ```
///
/// # Exit Codes
///
/// Each error variant maps to an exit code via `DualSubError::exit_code`.
#[derive(Error, Debug)]
pub enum DualSubError {
    /// I/O operation failed during file system access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error due to invalid or missing settings.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Decoding left replacement characters in the text after every salvage
    /// attempt; the candidate cannot be trusted.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure
        message: String,
    },

    /// The decoded text is not in the expected language (nor a related one).
    #[error("Language mismatch: expected '{expected}', detected '{detected}'")]
    LanguageMismatch {
        /// The language the caller asked for
        expected: String,
        /// What the trigram detector identified ("unknown" when undetected)
        detected: String,
    },

    /// The subtitle text could not be parsed as SRT.
    ///
    /// `line` is the 1-based line number where parsing stopped.
    #[error("Subtitle parse error at line {line}: {message}")]
    ParseFailure {
        /// 1-based line number of the offending input line
        line: usize,
        /// Detailed error message describing the issue
        message: String,
    },

    /// Merging produced zero cues; the candidate yields no usable artifact.
    #[error("Merge produced an empty cue stream")]
    EmptyMerge,

    /// Every main-language candidate failed decode, verification, or parse.
    #[error("No usable subtitle found for main language '{language}'")]
    NoMainCandidate {
        /// The main language tag that was requested
        language: String,
    },

    /// Main and translation language are identical; merging is pointless.
    #[error("Main and translation language are both '{language}'")]
    SameLanguage {
        /// The duplicated language tag
        language: String,
    },

    /// The requested language is in the skip-set (premixed bilingual).
    #[error("Language '{language}' is not mergeable")]
    SkippedLanguage {
        /// The skipped language tag
        language: String,
    },

    /// Both the primary and the fallback catalog failed.
    #[error("Upstream catalogs unavailable: {message}")]
    UpstreamUnavailable {
        /// Description of the last upstream failure
        message: String,
    },

    /// Subtitle byte download failed (HTTP status, timeout, or size cap).
    #[error("Download error: {message}")]
    Download {
        /// Description of the download failure
        message: String,
    },

    /// Artifact storage failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Catch-all error variant wrapping any other failure.
    #[error("Unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

// Convert reqwest errors into download errors; the orchestrator treats
// them as per-candidate or per-catalog failures depending on the call site.
impl From<reqwest::Error> for DualSubError {
    fn from(err: reqwest::Error) -> Self {
        DualSubError::Download {
            message: err.to_string(),
        }
    }
}

// Convert config crate error to configuration error
impl From<config::ConfigError> for DualSubError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(path) => DualSubError::Config {
                message: format!("Configuration file not found: {}", path),
            },
            config::ConfigError::Message(msg) => DualSubError::Config { message: msg },
            _ => DualSubError::Config {
                message: format!("Configuration error: {}", err),
            },
        }
    }
}

impl From<serde_json::Error> for DualSubError {
    fn from(err: serde_json::Error) -> Self {
        DualSubError::UpstreamUnavailable {
            message: format!("Malformed catalog response: {}", err),
        }
    }
}

/// Specialized `Result` type for DualSub operations.
pub type DualSubResult<T> = Result<T, DualSubError>;

impl DualSubError {
    /// Create a configuration error with the given message.
    pub fn config<S: Into<String>>(message: S) -> Self {
        DualSubError::Config {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualsub::error::DualSubError;
    /// let err = DualSubError::decode("replacement characters after repair");
    /// assert!(err.to_string().contains("Decode error"));
    /// ```
    pub fn decode<S: Into<String>>(message: S) -> Self {
        DualSubError::Decode {
            message: message.into(),
        }
    }

    /// Create a language mismatch error.
    pub fn language_mismatch<S1, S2>(expected: S1, detected: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        DualSubError::LanguageMismatch {
            expected: expected.into(),
            detected: detected.into(),
        }
    }

    /// Create a parse failure at the given 1-based input line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualsub::error::DualSubError;
    /// let err = DualSubError::parse_failure(7, "expected cue number");
    /// assert!(err.to_string().contains("line 7"));
    /// ```
    pub fn parse_failure<S: Into<String>>(line: usize, message: S) -> Self {
        DualSubError::ParseFailure {
            line,
            message: message.into(),
        }
    }

    /// Create a download error with the given message.
    pub fn download<S: Into<String>>(message: S) -> Self {
        DualSubError::Download {
            message: message.into(),
        }
    }

    /// Create a storage error with the given message.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        DualSubError::Storage {
            message: message.into(),
        }
    }

    /// Create an upstream-unavailable error with the given message.
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        DualSubError::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// True for errors that fail a single candidate rather than the request.
    ///
    /// The orchestrator logs these and advances to the next candidate.
    pub fn is_candidate_failure(&self) -> bool {
        matches!(
            self,
            DualSubError::Decode { .. }
                | DualSubError::LanguageMismatch { .. }
                | DualSubError::ParseFailure { .. }
                | DualSubError::EmptyMerge
                | DualSubError::Download { .. }
        )
    }

    /// Return the corresponding exit code for this error variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualsub::error::DualSubError;
    /// assert_eq!(DualSubError::config("x").exit_code(), 2);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            DualSubError::Io(_) => 1,
            DualSubError::Config { .. } => 2,
            DualSubError::Decode { .. } => 3,
            DualSubError::LanguageMismatch { .. } => 3,
            DualSubError::ParseFailure { .. } => 4,
            DualSubError::EmptyMerge => 4,
            DualSubError::NoMainCandidate { .. } => 5,
            DualSubError::SameLanguage { .. } => 5,
            DualSubError::SkippedLanguage { .. } => 5,
            DualSubError::UpstreamUnavailable { .. } => 6,
            DualSubError::Download { .. } => 6,
            DualSubError::Storage { .. } => 7,
            _ => 1,
        }
    }

    /// Return a user-friendly error message with suggested remedies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualsub::error::DualSubError;
    /// let msg = DualSubError::config("missing key").user_friendly_message();
    /// assert!(msg.contains("Configuration error:"));
    /// ```
    pub fn user_friendly_message(&self) -> String {
        match self {
            DualSubError::Io(e) => format!("File operation error: {}", e),
            DualSubError::Config { message } => format!(
                "Configuration error: {}\nHint: run 'dualsub --help' and check the config file",
                message
            ),
            DualSubError::Decode { message } => format!(
                "Decode error: {}\nHint: the subtitle file may be corrupted or in an unsupported encoding",
                message
            ),
            DualSubError::LanguageMismatch { expected, detected } => format!(
                "Language mismatch: expected '{}' but the text reads as '{}'",
                expected, detected
            ),
            DualSubError::ParseFailure { line, message } => format!(
                "Subtitle parse error at line {}: {}\nHint: check that the file is valid SRT",
                line, message
            ),
            DualSubError::EmptyMerge => {
                "Merging produced no cues; the two subtitles do not align in time".to_string()
            }
            DualSubError::NoMainCandidate { language } => format!(
                "No usable subtitle found for main language '{}'",
                language
            ),
            DualSubError::SameLanguage { language } => format!(
                "Main and translation language are both '{}'; pick two different languages",
                language
            ),
            DualSubError::SkippedLanguage { language } => format!(
                "Language '{}' already contains two languages and cannot be merged",
                language
            ),
            DualSubError::UpstreamUnavailable { message } => format!(
                "Upstream catalogs unavailable: {}\nHint: check network connection",
                message
            ),
            DualSubError::Download { message } => format!(
                "Download error: {}\nHint: check network connection",
                message
            ),
            DualSubError::Storage { message } => format!("Storage error: {}", message),
            DualSubError::Other(err) => {
                format!("Unknown error: {}\nHint: please report this issue", err)
            }
        }
    }
}

// Unit test: DualSubError error types and helper methods
#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error_creation() {
        let error = DualSubError::config("test config error");
        assert!(matches!(error, DualSubError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_parse_failure_carries_line() {
        let error = DualSubError::parse_failure(12, "bad timestamp");
        assert!(matches!(error, DualSubError::ParseFailure { line: 12, .. }));
        let msg = error.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("bad timestamp"));
    }

    #[test]
    fn test_language_mismatch_message() {
        let error = DualSubError::language_mismatch("el", "tr");
        assert_eq!(
            error.to_string(),
            "Language mismatch: expected 'el', detected 'tr'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: DualSubError = io_error.into();
        assert!(matches!(err, DualSubError::Io(_)));
    }

    #[test]
    fn test_candidate_failure_classification() {
        assert!(DualSubError::decode("x").is_candidate_failure());
        assert!(DualSubError::parse_failure(1, "x").is_candidate_failure());
        assert!(DualSubError::EmptyMerge.is_candidate_failure());
        assert!(DualSubError::download("x").is_candidate_failure());
        assert!(
            !DualSubError::SameLanguage {
                language: "en".into()
            }
            .is_candidate_failure()
        );
        assert!(!DualSubError::upstream("x").is_candidate_failure());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DualSubError::config("test").exit_code(), 2);
        assert_eq!(DualSubError::decode("test").exit_code(), 3);
        assert_eq!(DualSubError::parse_failure(1, "test").exit_code(), 4);
        assert_eq!(DualSubError::upstream("test").exit_code(), 6);
        assert_eq!(DualSubError::storage("test").exit_code(), 7);
    }

    #[test]
    fn test_user_friendly_messages() {
        let config_error = DualSubError::config("missing key");
        let message = config_error.user_friendly_message();
        assert!(message.contains("Configuration error:"));
        assert!(message.contains("Hint"));

        let decode_error = DualSubError::decode("replacement characters");
        let message = decode_error.user_friendly_message();
        assert!(message.contains("Decode error:"));
        assert!(message.contains("encoding"));
    }
}
