//! Time-based merging of two cue tracks into one bilingual track.
//!
//! The merged track always has exactly as many cues as the main track, with
//! the main track's ids and timings. Each translation cue may be matched to
//! at most one main cue per scan position; the scan keeps a monotonic
//! cursor into the translation track so total work stays linear.

use crate::core::formats::sanitize::flatten;
use crate::core::formats::{Cue, CueTrack};

/// Default proximity window in milliseconds.
pub const DEFAULT_MERGE_THRESHOLD_MS: u64 = 500;

/// Merges a main and a translation track by time alignment.
///
/// # Examples
///
/// ```rust
/// use dualsub::core::formats::{Cue, CueTrack};
/// use dualsub::core::merge::MergeEngine;
///
/// let main = CueTrack::from_cues(vec![Cue::new(1, 1000, 3000, "Hello")]);
/// let trans = CueTrack::from_cues(vec![Cue::new(1, 1100, 3100, "Bonjour")]);
/// let merged = MergeEngine::new(500).merge(&main, &trans);
/// assert_eq!(merged.cues[0].text, "Hello\n<i>Bonjour</i>");
/// ```
pub struct MergeEngine {
    threshold_ms: u64,
}

impl MergeEngine {
    /// Create an engine with the given proximity threshold.
    pub fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    /// Merge `translation` into `main`.
    ///
    /// Output cue `i` carries main cue `i`'s id and timings. Its text is
    /// the flattened main text, with `\n<i>{translation}</i>` appended when
    /// a time-aligned counterpart exists.
    pub fn merge(&self, main: &CueTrack, translation: &CueTrack) -> CueTrack {
        let mut cursor = 0usize;
        let mut merged = Vec::with_capacity(main.len());

        for cue in &main.cues {
            let flat_main = flatten(&cue.text);
            let text = match self.find_counterpart(cue, &translation.cues, &mut cursor) {
                Some(counterpart) => {
                    let flat_trans = flatten(&counterpart.text);
                    if flat_trans.is_empty() {
                        flat_main
                    } else {
                        format!("{flat_main}\n<i>{flat_trans}</i>")
                    }
                }
                None => flat_main,
            };
            merged.push(Cue {
                index: cue.index,
                start_ms: cue.start_ms,
                end_ms: cue.end_ms,
                text,
            });
        }

        CueTrack::from_cues(merged)
    }

    /// Scan forward from the cursor for the best-aligned translation cue.
    ///
    /// Best = smallest absolute start-time difference among candidates,
    /// ties to the earlier index. The scan exits once the current
    /// translation cue starts more than one threshold past the main cue's
    /// end, and the cursor advances past cues that end more than two
    /// thresholds before the main cue starts.
    fn find_counterpart<'t>(
        &self,
        main: &Cue,
        translation: &'t [Cue],
        cursor: &mut usize,
    ) -> Option<&'t Cue> {
        let mut best: Option<(usize, u64)> = None;
        let mut i = *cursor;

        while i < translation.len() {
            let trans = &translation[i];

            // This cue is far behind every remaining main cue; never look
            // at it again. The cursor only moves forward, and only while it
            // is at the head of the scan.
            if i == *cursor && trans.end_ms + 2 * self.threshold_ms < main.start_ms {
                *cursor = i + 1;
                i += 1;
                continue;
            }

            if self.is_candidate(main, trans) {
                let diff = trans.start_ms.abs_diff(main.start_ms);
                if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                    best = Some((i, diff));
                }
            }

            // Everything past this point starts even later; no candidate
            // can improve.
            if trans.start_ms > main.end_ms + self.threshold_ms {
                break;
            }
            i += 1;
        }

        best.map(|(i, _)| &translation[i])
    }

    /// Candidate tests: start inside `[main.start, main.end)`, end inside
    /// `(main.start, main.end]`, fully contained, fully containing, or
    /// starts within the proximity threshold.
    fn is_candidate(&self, main: &Cue, trans: &Cue) -> bool {
        let starts_within = trans.start_ms >= main.start_ms && trans.start_ms < main.end_ms;
        let ends_within = trans.end_ms > main.start_ms && trans.end_ms <= main.end_ms;
        let contained = trans.start_ms >= main.start_ms && trans.end_ms <= main.end_ms;
        let containing = trans.start_ms <= main.start_ms && trans.end_ms >= main.end_ms;
        let near_start = trans.start_ms.abs_diff(main.start_ms) < self.threshold_ms;
        starts_within || ends_within || contained || containing || near_start
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_THRESHOLD_MS)
    }
}
