//! The decoding pipeline: raw subtitle bytes to trustworthy text.
//!
//! Strict precedence: BOM dispatch, then statistical detection over the
//! first 1024 bytes, then mojibake repair on the decoded string, then tail
//! cleanup. Byte-identical inputs always produce byte-identical outputs;
//! nothing here consults clocks, randomness, or global state.

use crate::Result;
use crate::core::encoding::{EncodingGuess, GuessOrigin, bom, mojibake};
use crate::core::language::LanguageTag;
use crate::core::language::tables;
use crate::error::DualSubError;
use encoding_rs::UTF_8;

/// Number of leading bytes fed to the statistical detector.
const DETECTOR_SAMPLE_LEN: usize = 1024;

/// A decoded subtitle text with provenance.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded (and possibly repaired) text.
    pub text: String,
    /// The encoding that produced the final text.
    pub guess: EncodingGuess,
    /// Whether mojibake repair rewrote the text.
    pub repaired: bool,
}

/// Decodes raw subtitle bytes, salvaging legacy codepages and double
/// encodings.
///
/// # Examples
///
/// ```rust
/// use dualsub::core::encoding::SubtitleDecoder;
///
/// let decoder = SubtitleDecoder::new();
/// let bytes = [0xFF, 0xFE, 0x48, 0x00, 0x65, 0x00, 0x6C, 0x00, 0x6C, 0x00, 0x6F, 0x00];
/// let decoded = decoder.decode(&bytes, None);
/// assert_eq!(decoded.text, "Hello");
/// assert_eq!(decoded.guess.name, "utf16le");
/// ```
pub struct SubtitleDecoder;

impl SubtitleDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode lossily: always returns text, even when replacement
    /// characters survive. Used by diagnostics; the pipeline goes through
    /// [`SubtitleDecoder::decode_strict`].
    pub fn decode(&self, data: &[u8], hint: Option<&LanguageTag>) -> DecodedText {
        if data.is_empty() {
            return DecodedText {
                text: String::new(),
                guess: EncodingGuess::new("utf8", GuessOrigin::Fallback),
                repaired: false,
            };
        }

        let (text, guess) = match bom::detect(data) {
            Some(kind) => {
                log::debug!("BOM dispatch: {kind:?}");
                (
                    kind.decode(data),
                    EncodingGuess::new(kind.canonical_name(), GuessOrigin::Bom),
                )
            }
            None => self.decode_statistical(data),
        };

        let hint_two = hint.and_then(|tag| tag.two_letter());
        let (text, guess, repaired) = match mojibake::repair(&text, hint_two) {
            Some((fixed, repair_guess)) => (fixed, repair_guess, true),
            None => (text, guess, false),
        };

        DecodedText {
            text: strip_bom_remnants(text),
            guess,
            repaired,
        }
    }

    /// Decode and reject text that still contains replacement characters
    /// after every salvage attempt.
    pub fn decode_strict(&self, data: &[u8], hint: Option<&LanguageTag>) -> Result<DecodedText> {
        let decoded = self.decode(data, hint);
        if decoded.text.contains('\u{FFFD}') {
            return Err(DualSubError::decode(format!(
                "replacement characters remain after decoding as {}",
                decoded.guess
            )));
        }
        Ok(decoded)
    }

    /// No BOM: let a byte-frequency detector pick, canonicalize its label,
    /// and fall back to UTF-8 when the pick is unsupported.
    fn decode_statistical(&self, data: &[u8]) -> (String, EncodingGuess) {
        let sample = &data[..data.len().min(DETECTOR_SAMPLE_LEN)];
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(sample, data.len() <= DETECTOR_SAMPLE_LEN);
        let detected = detector.guess(None, true);

        let label = tables::canonical_label(detected.name());
        let (encoding, name) = match tables::encoding_for_name(&label) {
            Some(encoding) => (encoding, label),
            None => {
                log::debug!("detector label '{label}' unsupported; decoding as utf8");
                (UTF_8, "utf8".to_string())
            }
        };
        log::debug!("statistical detection: {name}");

        let (text, _) = encoding.decode_without_bom_handling(data);
        (
            text.into_owned(),
            EncodingGuess::new(name, GuessOrigin::Statistical),
        )
    }
}

impl Default for SubtitleDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a leading U+FEFF, and a literal `ï»¿` left behind by an earlier
/// faulty decode.
fn strip_bom_remnants(text: String) -> String {
    let stripped = text
        .strip_prefix('\u{FEFF}')
        .or_else(|| text.strip_prefix("\u{00EF}\u{00BB}\u{00BF}"));
    match stripped {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
