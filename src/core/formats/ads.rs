//! Promotional-insert filtering.
//!
//! Upstream catalogs water their files with self-promotion cues. Any cue
//! containing one of the fixed keywords is dropped after parsing. Filtering
//! preserves relative order and does not renumber — merging works on the
//! filtered sequence as-is, and renumbering happens at serialization.

use crate::core::formats::CueTrack;

/// Substrings that mark a cue as a promotional insert.
pub const AD_KEYWORDS: &[&str] = &["OpenSubtitles.org", "OpenSubtitles.com", "osdb.link"];

/// True when the cue text contains any ad keyword.
pub fn is_ad_text(text: &str) -> bool {
    AD_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Drop promotional cues from a track, keeping relative order.
pub fn scrub(track: CueTrack) -> CueTrack {
    let before = track.len();
    let cues: Vec<_> = track
        .cues
        .into_iter()
        .filter(|cue| !is_ad_text(&cue.text))
        .collect();
    if cues.len() != before {
        log::debug!("ad filter dropped {} cue(s)", before - cues.len());
    }
    CueTrack::from_cues(cues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formats::Cue;

    #[test]
    fn test_ad_detection() {
        assert!(is_ad_text("Subtitles by OpenSubtitles.org"));
        assert!(is_ad_text("Please rate at osdb.link/abcd"));
        assert!(!is_ad_text("An ordinary line of dialogue"));
    }

    #[test]
    fn test_scrub_preserves_order_and_ids() {
        let track = CueTrack::from_cues(vec![
            Cue::new(1, 0, 1000, "First line"),
            Cue::new(2, 2000, 3000, "Subtitles by OpenSubtitles.org"),
            Cue::new(3, 4000, 5000, "Third line"),
        ]);
        let scrubbed = scrub(track);
        assert_eq!(scrubbed.len(), 2);
        assert_eq!(scrubbed.cues[0].index, 1);
        assert_eq!(scrubbed.cues[1].index, 3);
        assert_eq!(scrubbed.cues[1].text, "Third line");
    }
}
