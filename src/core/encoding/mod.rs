//! Encoding salvage: BOM dispatch, statistical detection, mojibake repair.
//!
//! Subtitle files arrive in every encoding a quarter century of ripping
//! tools could produce: legacy codepages without any marker, UTF-16 in both
//! endiannesses, and UTF streams that were re-read as Latin-1 and re-written
//! as UTF-8 somewhere along the way (double encoding). [`SubtitleDecoder`]
//! turns any of these into clean text, or reports that the bytes cannot be
//! trusted.

pub mod bom;
pub mod decoder;
pub mod mojibake;

pub use decoder::{DecodedText, SubtitleDecoder};

/// How an encoding decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOrigin {
    /// A byte-order mark (possibly itself double-encoded) identified the
    /// encoding directly.
    Bom,
    /// A byte-frequency detector chose the encoding.
    Statistical,
    /// A codepage from the expected language's priority list repaired the
    /// text.
    LanguagePriority,
    /// A codepage from the fixed global fallback order repaired the text.
    Fallback,
}

/// An encoding decision: canonical name plus provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingGuess {
    /// Canonical encoding name (utf8, utf16le, win1251, ...).
    pub name: String,
    /// How the decision was reached.
    pub origin: GuessOrigin,
}

impl EncodingGuess {
    /// Construct a guess from a canonical name and origin.
    pub fn new<S: Into<String>>(name: S, origin: GuessOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }
}

impl std::fmt::Display for EncodingGuess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let origin = match self.origin {
            GuessOrigin::Bom => "bom",
            GuessOrigin::Statistical => "statistical",
            GuessOrigin::LanguagePriority => "language-prioritized",
            GuessOrigin::Fallback => "fallback",
        };
        write!(f, "{} ({})", self.name, origin)
    }
}
