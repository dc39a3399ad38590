//! Post-decode language verification.
//!
//! Decoding can succeed mechanically while producing text in the wrong
//! language (mislabeled uploads) or garbage (wrong codepage that still maps
//! every byte). The verifier gates both cases: a corruption check first,
//! then trigram-based identification on a header-free sample, accepting the
//! expected language or a mutually intelligible relative.

use super::LanguageTag;
use super::tables;
use once_cell::sync::Lazy;
use regex::Regex;

/// Outcome of verifying decoded text against an expected language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Detected language equals the expected language.
    Match,
    /// Detected language is a mutually intelligible relative.
    RelatedMatch,
    /// Text is corrupted or in an unrelated language.
    Reject {
        /// The detected 2-letter code, when identification succeeded.
        detected: Option<String>,
    },
}

impl Verdict {
    /// True for `Match` and `RelatedMatch`.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verdict::Reject { .. })
    }
}

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}").unwrap()
});
static CUE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\s*$").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Minimum text length (chars) below which verification always rejects.
const MIN_TEXT_LEN: usize = 100;
/// Maximum ratio of replacement characters tolerated.
const MAX_REPLACEMENT_RATIO: f64 = 0.01;
/// Maximum ratio of C0 controls (TAB/LF/CR excluded) tolerated.
const MAX_CONTROL_RATIO: f64 = 0.01;
/// Sample size in characters fed to the trigram detector.
const SAMPLE_LEN: usize = 30_000;
/// Largest header prefix skipped before sampling.
const HEADER_SKIP_MAX: usize = 2_000;

/// Script pairs that never co-occur in a legitimate subtitle; their joint
/// presence means a codepage was applied to bytes from a different one.
#[derive(Debug, Default)]
struct ScriptPresence {
    hebrew: bool,
    arabic: bool,
    cyrillic: bool,
    thai: bool,
}

/// Validates that decoded text is in an expected language.
///
/// # Examples
///
/// ```rust
/// use dualsub::core::language::{LanguageTag, LanguageVerifier, Verdict};
///
/// let verifier = LanguageVerifier::new();
/// let text = "This is a sufficiently long English sentence, repeated to pass \
///             the length gate of the verifier. ".repeat(4);
/// assert_eq!(verifier.verify(&text, &LanguageTag::new("en")), Verdict::Match);
/// ```
pub struct LanguageVerifier;

impl LanguageVerifier {
    /// Create a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Verify `text` against `expected`.
    ///
    /// Acceptance rule: the detected 2-letter code equals the expected one
    /// (`Match`), or either lists the other in its related-language group
    /// (`RelatedMatch`). Everything else, including undetectable text and
    /// the corruption gate, is a `Reject`.
    pub fn verify(&self, text: &str, expected: &LanguageTag) -> Verdict {
        if !self.passes_corruption_gate(text) {
            return Verdict::Reject { detected: None };
        }

        let sample = self.sample(text);
        let detected = match whatlang::detect(&sample) {
            Some(info) => info.lang().code(),
            None => return Verdict::Reject { detected: None },
        };
        let detected_two = match tables::iso3_to_iso1(detected) {
            Some(code) => code,
            // The detector knows languages our tables do not; without a
            // 2-letter form there is nothing to compare against.
            None => {
                return Verdict::Reject {
                    detected: Some(detected.to_string()),
                };
            }
        };

        let expected_two = match expected.two_letter() {
            Some(code) => code,
            None => {
                return Verdict::Reject {
                    detected: Some(detected_two.to_string()),
                };
            }
        };

        if detected_two == expected_two {
            Verdict::Match
        } else if tables::are_related(detected_two, expected_two) {
            log::debug!(
                "accepting related language: detected {detected_two}, expected {expected_two}"
            );
            Verdict::RelatedMatch
        } else {
            Verdict::Reject {
                detected: Some(detected_two.to_string()),
            }
        }
    }

    fn passes_corruption_gate(&self, text: &str) -> bool {
        let mut total = 0usize;
        let mut replacements = 0usize;
        let mut controls = 0usize;
        let mut scripts = ScriptPresence::default();

        for c in text.chars() {
            total += 1;
            match c {
                '\u{FFFD}' => replacements += 1,
                '\t' | '\n' | '\r' => {}
                c if (c as u32) < 0x20 => controls += 1,
                _ => {}
            }
            match c as u32 {
                0x0590..=0x05FF => scripts.hebrew = true,
                0x0600..=0x06FF => scripts.arabic = true,
                0x0400..=0x04FF => scripts.cyrillic = true,
                0x0E00..=0x0E7F => scripts.thai = true,
                _ => {}
            }
        }

        if total < MIN_TEXT_LEN {
            return false;
        }
        if replacements as f64 / total as f64 > MAX_REPLACEMENT_RATIO {
            return false;
        }
        if controls as f64 / total as f64 > MAX_CONTROL_RATIO {
            return false;
        }
        // Impossible pairs: one legacy codepage read as another maps the
        // same byte range into two disjoint scripts.
        if scripts.thai && (scripts.hebrew || scripts.arabic || scripts.cyrillic) {
            return false;
        }
        true
    }

    /// Take up to 30 000 chars, skipping a prefix sized to avoid headers,
    /// and strip everything that is not prose: timestamps, cue numbers,
    /// markup tags, excess whitespace.
    fn sample(&self, text: &str) -> String {
        let len = text.chars().count();
        let skip = HEADER_SKIP_MAX.min(len.saturating_sub(SAMPLE_LEN));
        let window: String = text.chars().skip(skip).take(SAMPLE_LEN).collect();

        let window = TIMESTAMP_RE.replace_all(&window, " ");
        let window = CUE_NUMBER_RE.replace_all(&window, " ");
        let window = TAG_RE.replace_all(&window, " ");
        window.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for LanguageVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(text: &str) -> String {
        text.repeat(8)
    }

    #[test]
    fn test_short_text_rejected() {
        let verifier = LanguageVerifier::new();
        let verdict = verifier.verify("too short", &LanguageTag::new("en"));
        assert_eq!(verdict, Verdict::Reject { detected: None });
    }

    #[test]
    fn test_english_match() {
        let verifier = LanguageVerifier::new();
        let text = long("The quick brown fox jumps over the lazy dog near the river bank. ");
        assert_eq!(verifier.verify(&text, &LanguageTag::new("en")), Verdict::Match);
    }

    #[test]
    fn test_three_letter_expected_tag() {
        let verifier = LanguageVerifier::new();
        let text = long("The quick brown fox jumps over the lazy dog near the river bank. ");
        assert_eq!(
            verifier.verify(&text, &LanguageTag::new("eng")),
            Verdict::Match
        );
    }

    #[test]
    fn test_wrong_language_rejected() {
        let verifier = LanguageVerifier::new();
        let text = long("Der schnelle braune Fuchs springt über den faulen Hund am Flussufer. ");
        let verdict = verifier.verify(&text, &LanguageTag::new("th"));
        assert!(matches!(verdict, Verdict::Reject { detected: Some(_) }));
    }

    #[test]
    fn test_related_language_accepted() {
        let verifier = LanguageVerifier::new();
        // Russian text against Ukrainian expectation: East Slavic group.
        let text = long(
            "Быстрая коричневая лиса прыгает через ленивую собаку на берегу реки каждое утро. ",
        );
        let verdict = verifier.verify(&text, &LanguageTag::new("uk"));
        assert!(verdict.is_accepted());
    }

    #[test]
    fn test_replacement_ratio_gate() {
        let verifier = LanguageVerifier::new();
        let mut text = long("Readable English words keep flowing here without interruption. ");
        text.push_str(&"\u{FFFD}".repeat(text.chars().count() / 10));
        let verdict = verifier.verify(&text, &LanguageTag::new("en"));
        assert_eq!(verdict, Verdict::Reject { detected: None });
    }

    #[test]
    fn test_impossible_script_pair_rejected() {
        let verifier = LanguageVerifier::new();
        let mut text = long("สวัสดีครับ ยินดีต้อนรับสู่เมืองหลวงของเรา ");
        text.push_str("привет");
        let verdict = verifier.verify(&text, &LanguageTag::new("th"));
        assert_eq!(verdict, Verdict::Reject { detected: None });
    }

    #[test]
    fn test_sampling_strips_srt_noise() {
        let verifier = LanguageVerifier::new();
        let block = "12\n00:01:02,500 --> 00:01:04,000\n<i>The quick brown fox jumps over the lazy dog.</i>\n\n";
        let text = block.repeat(20);
        assert_eq!(verifier.verify(&text, &LanguageTag::new("en")), Verdict::Match);
        let sample = verifier.sample(&text);
        assert!(!sample.contains("-->"));
        assert!(!sample.contains("<i>"));
    }
}
