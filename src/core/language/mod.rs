//! Language identification and verification.
//!
//! [`LanguageTag`] wraps the 2- or 3-letter codes used by catalogs and user
//! configuration, normalizing them through the static tables for encoding
//! and script lookup. [`verifier::LanguageVerifier`] decides whether decoded
//! text actually is in a requested language.
//!
//! # Examples
//!
//! ```rust
//! use dualsub::core::language::LanguageTag;
//!
//! let tag = LanguageTag::new("FRE");
//! assert_eq!(tag.as_str(), "fre");
//! assert_eq!(tag.two_letter(), Some("fr"));
//! assert!(tag.matches("fra"));
//! ```

pub mod tables;
pub mod verifier;

pub use verifier::{LanguageVerifier, Verdict};

/// A user- or catalog-supplied language code.
///
/// Tags are stored lowercase. A tag can be a 2-letter ISO 639-1 code or a
/// 3-letter ISO 639-2/3 code; bibliographic and terminological 3-letter
/// variants are treated as aliases of each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a tag, trimming and lowercasing the input.
    pub fn new<S: AsRef<str>>(code: S) -> Self {
        Self(code.as_ref().trim().to_ascii_lowercase())
    }

    /// The normalized tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalize to a 2-letter code for encoding and script lookup.
    ///
    /// Returns the tag itself when it is already 2 letters, the table
    /// mapping for known 3-letter codes, and `None` otherwise.
    pub fn two_letter(&self) -> Option<&str> {
        if self.0.len() == 2 {
            Some(&self.0)
        } else {
            tables::iso3_to_iso1(&self.0)
        }
    }

    /// True when this tag appears in the fixed skip-set (codes that denote
    /// premixed bilingual subtitles, which would defeat merging).
    pub fn is_skippable(&self) -> bool {
        tables::SKIPPED_TAGS.contains(&self.0.as_str())
    }

    /// Alias-aware comparison against a catalog language field.
    ///
    /// Two codes match when they are equal, members of the same alias group
    /// (`fre` vs `fra`), or normalize to the same 2-letter code.
    pub fn matches(&self, catalog_code: &str) -> bool {
        let other = catalog_code.trim().to_ascii_lowercase();
        if self.0 == other {
            return true;
        }
        if let Some(group) = tables::alias_group(&self.0) {
            if group.contains(&other.as_str()) {
                return true;
            }
        }
        let other_two = if other.len() == 2 {
            Some(other.as_str())
        } else {
            tables::iso3_to_iso1(&other)
        };
        match (self.two_letter(), other_two) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
