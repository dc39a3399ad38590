//! Text-level mojibake detection and repair.
//!
//! After a first decode the text can still be wrong in two distinct ways:
//!
//! - **Double-encoded UTF-8**: the characters form UTF-8 byte pairs mapped
//!   through Latin-1 (a lead char in `U+00C2..U+00EF` followed by a
//!   continuation char in `U+0080..U+00BF`).
//! - **Raw legacy codepage**: no such pairs, but an implausible share of
//!   characters sits in `U+0080..U+00FF`.
//!
//! Repair reinterprets the text as Latin-1 bytes and re-decodes: UTF-8
//! first, then codepages prioritized by the expected language, then a fixed
//! global order. Acceptance is measured, not assumed: a candidate must
//! erase most of the suspect pattern, thin out the high-char density, or
//! land enough characters in the expected script.

use crate::core::encoding::{EncodingGuess, GuessOrigin};
use crate::core::language::tables;
use encoding_rs::UTF_8;

/// Pattern-pair count above which text is treated as double-encoded.
const PAIR_SUSPECT_THRESHOLD: usize = 10;
/// A repair must shrink the pattern total to at most this share of the
/// pre-repair total.
const RESIDUAL_PATTERN_RATIO: f64 = 0.20;
/// High-char share above which text is a raw-legacy suspect...
const LEGACY_CHAR_RATIO: f64 = 0.10;
/// ...provided at least this many high chars are present.
const LEGACY_MIN_COUNT: usize = 50;
/// A legacy repair must shrink high-char density to at most this share of
/// its prior value.
const LEGACY_DENSITY_RATIO: f64 = 0.30;
/// Script coverage at which a hint-matching candidate is accepted outright.
const SCRIPT_COVERAGE_MIN: f64 = 0.15;

/// UTF-8 lead-byte classes tracked by the scan, as seen through Latin-1.
/// Each entry is an inclusive code-point range.
const LEAD_CLASSES: &[(u32, u32)] = &[
    (0xC2, 0xC2), // Latin special
    (0xC3, 0xC3), // Latin accented
    (0xC4, 0xC5), // extended Latin
    (0xC6, 0xCB), // IPA / modifiers
    (0xCC, 0xCF), // Greek
    (0xD0, 0xD4), // Cyrillic
    (0xD5, 0xD6), // Armenian
    (0xD7, 0xD7), // Hebrew
    (0xD8, 0xDB), // Arabic
    (0xDC, 0xDF), // Syriac / Thaana / NKo
    (0xE0, 0xEF), // 3-byte scripts (Thai, CJK)
];

/// Result of scanning a string for mojibake fingerprints.
#[derive(Debug, Clone)]
pub struct PatternScan {
    /// Lead-plus-continuation pair count per lead class.
    pub class_counts: [usize; LEAD_CLASSES.len()],
    /// Sum over all classes.
    pub pair_total: usize,
    /// Characters in `U+0080..=U+00FF`.
    pub high_chars: usize,
    /// Total characters scanned.
    pub total_chars: usize,
}

impl PatternScan {
    /// Share of characters in `U+0080..=U+00FF`.
    pub fn high_density(&self) -> f64 {
        if self.total_chars == 0 {
            0.0
        } else {
            self.high_chars as f64 / self.total_chars as f64
        }
    }
}

/// Why a string is considered mojibake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspicion {
    /// UTF-8 pairs seen through Latin-1.
    DoubleEncoded,
    /// Dense `U+0080..U+00FF` content with no pair pattern.
    RawLegacy,
}

/// Count mojibake fingerprints in `text`.
pub fn scan(text: &str) -> PatternScan {
    let mut result = PatternScan {
        class_counts: [0; LEAD_CLASSES.len()],
        pair_total: 0,
        high_chars: 0,
        total_chars: 0,
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let cp = c as u32;
        result.total_chars += 1;
        if (0x80..=0xFF).contains(&cp) {
            result.high_chars += 1;
        }
        if let Some(class) = LEAD_CLASSES
            .iter()
            .position(|&(lo, hi)| (lo..=hi).contains(&cp))
        {
            if let Some(&next) = chars.peek() {
                if (0x80..=0xBF).contains(&(next as u32)) {
                    result.class_counts[class] += 1;
                    result.pair_total += 1;
                }
            }
        }
    }
    result
}

/// Decide whether a scan warrants a repair attempt.
pub fn classify(scan: &PatternScan) -> Option<Suspicion> {
    if scan.pair_total > PAIR_SUSPECT_THRESHOLD {
        Some(Suspicion::DoubleEncoded)
    } else if scan.high_density() > LEGACY_CHAR_RATIO && scan.high_chars > LEGACY_MIN_COUNT {
        Some(Suspicion::RawLegacy)
    } else {
        None
    }
}

/// Reinterpret a string as the Latin-1 byte sequence it was decoded from.
/// Characters above `U+00FF` keep only their low byte, matching the
/// behavior of a Latin-1 write.
pub fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| (c as u32 & 0xFF) as u8).collect()
}

/// Attempt to repair suspect text.
///
/// Returns the repaired string and the encoding that produced it, or `None`
/// when the text is not suspect or no candidate met its acceptance rule
/// (in which case the caller keeps the original text).
pub fn repair(text: &str, hint: Option<&str>) -> Option<(String, EncodingGuess)> {
    let before = scan(text);
    let suspicion = classify(&before)?;
    let bytes = latin1_bytes(text);

    log::debug!(
        "mojibake suspect ({suspicion:?}): {} pattern pairs, {:.1}% high chars",
        before.pair_total,
        before.high_density() * 100.0
    );

    // UTF-8 first: the overwhelmingly common case of a single extra wrap.
    let (utf8_text, had_errors) = UTF_8.decode_without_bom_handling(&bytes);
    if !had_errors {
        let after = scan(&utf8_text);
        if (after.pair_total as f64) <= before.pair_total as f64 * RESIDUAL_PATTERN_RATIO {
            return Some((
                utf8_text.into_owned(),
                EncodingGuess::new("utf8", GuessOrigin::Statistical),
            ));
        }
    }

    let prioritized = hint.map(tables::encoding_priority).unwrap_or(&[]);
    let script = hint.and_then(tables::script_blocks);

    let mut tried: Vec<&str> = Vec::new();
    for (rank, &name) in prioritized
        .iter()
        .chain(tables::GLOBAL_FALLBACK_ENCODINGS.iter())
        .enumerate()
    {
        if name == "utf8" || tried.contains(&name) {
            continue;
        }
        tried.push(name);
        let origin = if rank < prioritized.len() {
            GuessOrigin::LanguagePriority
        } else {
            GuessOrigin::Fallback
        };

        let Some(encoding) = tables::encoding_for_name(name) else {
            continue;
        };
        let (candidate, had_errors) = encoding.decode_without_bom_handling(&bytes);
        if had_errors {
            continue;
        }

        if let Some(ranges) = script {
            if script_coverage(&candidate, ranges) >= SCRIPT_COVERAGE_MIN {
                log::debug!("repair accepted by script coverage: {name}");
                return Some((candidate.into_owned(), EncodingGuess::new(name, origin)));
            }
        }

        let after = scan(&candidate);
        let accepted = match suspicion {
            Suspicion::DoubleEncoded => {
                (after.pair_total as f64) <= before.pair_total as f64 * RESIDUAL_PATTERN_RATIO
            }
            Suspicion::RawLegacy => {
                after.high_density() <= before.high_density() * LEGACY_DENSITY_RATIO
            }
        };
        if accepted {
            log::debug!("repair accepted: {name}");
            return Some((candidate.into_owned(), EncodingGuess::new(name, origin)));
        }
    }

    log::debug!("no repair candidate accepted; keeping original text");
    None
}

/// Share of characters inside any of the given script ranges.
fn script_coverage(text: &str, ranges: &[(u32, u32)]) -> f64 {
    let mut total = 0usize;
    let mut hits = 0usize;
    for c in text.chars() {
        total += 1;
        let cp = c as u32;
        if ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp)) {
            hits += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode `text` as UTF-8, then read those bytes as Latin-1: the
    /// classic double-encoding accident.
    fn double_encode(text: &str) -> String {
        text.bytes().map(|b| char::from_u32(b as u32).unwrap()).collect()
    }

    #[test]
    fn test_scan_counts_pairs() {
        let mangled = double_encode("Привет, как дела? Это тестовый текст для проверки.");
        let scan = scan(&mangled);
        assert!(scan.pair_total > PAIR_SUSPECT_THRESHOLD);
        // Cyrillic leads land in the D0-D4 class.
        let cyrillic_class = LEAD_CLASSES.iter().position(|&r| r == (0xD0, 0xD4)).unwrap();
        assert!(scan.class_counts[cyrillic_class] > 0);
    }

    #[test]
    fn test_clean_text_not_suspect() {
        let scan = scan("A perfectly ordinary English sentence.");
        assert_eq!(classify(&scan), None);
    }

    #[test]
    fn test_double_encoded_utf8_repair() {
        let original = "Привет, как дела? Это достаточно длинный тестовый текст.";
        let mangled = double_encode(original);
        let (repaired, guess) = repair(&mangled, Some("ru")).unwrap();
        assert_eq!(repaired, original);
        assert_eq!(guess.name, "utf8");
    }

    #[test]
    fn test_thai_double_encoded_repair() {
        // Three Latin-1 pairs per Thai glyph; hint th.
        let original = "กขคง จฉชซ ฌญฎฏ ฐฑฒณ ดตถท ธนบป ผฝพฟ ภมยร";
        let mangled = double_encode(original);
        assert!(mangled.starts_with('\u{00E0}'));
        let before = scan(&mangled);
        let (repaired, _) = repair(&mangled, Some("th")).unwrap();
        assert!(repaired.contains('ก'));
        let after = scan(&repaired);
        assert!((after.pair_total as f64) <= before.pair_total as f64 * 0.2);
    }

    #[test]
    fn test_raw_legacy_codepage_repair_with_script_hint() {
        // Greek text encoded as windows-1253, decoded as Latin-1.
        let original = "Καλημέρα σας, πώς είστε σήμερα; Αυτό είναι ένα δοκιμαστικό κείμενο.";
        let (encoded, _, _) = encoding_rs::WINDOWS_1253.encode(original);
        let mangled: String = encoded.iter().map(|&b| char::from_u32(b as u32).unwrap()).collect();

        let scan_before = scan(&mangled);
        assert_eq!(classify(&scan_before), Some(Suspicion::RawLegacy));

        let (repaired, guess) = repair(&mangled, Some("el")).unwrap();
        assert_eq!(repaired, original);
        assert_eq!(guess.name, "win1253");
        assert_eq!(guess.origin, GuessOrigin::LanguagePriority);

        let greek = tables::script_blocks("el").unwrap();
        assert!(script_coverage(&repaired, greek) >= SCRIPT_COVERAGE_MIN);
    }

    #[test]
    fn test_unrepairable_text_returns_none() {
        // Suspect density but decodes nowhere useful: keep original.
        let noise: String = (0..200)
            .map(|i| char::from_u32(0x80 + (i % 0x20)).unwrap())
            .collect();
        // The string is legacy-suspect; whether repair finds a codepage
        // depends on the candidates, but it must never panic.
        let _ = repair(&noise, None);
    }

    #[test]
    fn test_latin1_round_trip() {
        let text = "caf\u{00E9}";
        assert_eq!(latin1_bytes(text), vec![b'c', b'a', b'f', 0xE9]);
    }
}
