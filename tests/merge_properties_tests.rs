//! Merge, parse, and serialize invariants over realistic cue tracks.

use dualsub::core::formats::{Cue, CueTrack, ads, srt};
use dualsub::core::merge::MergeEngine;

fn track(cues: &[(u64, u64, &str)]) -> CueTrack {
    CueTrack::from_cues(
        cues.iter()
            .enumerate()
            .map(|(i, &(start, end, text))| Cue::new(i + 1, start, end, text))
            .collect(),
    )
}

#[test]
fn parse_serialize_round_trip() {
    let source = "1\n00:00:01,500 --> 00:00:03,000\nFirst cue\n\n\
                  2\n00:01:00,000 --> 00:01:02,250\nSecond cue\nwith two lines\n\n\
                  3\n01:00:00,000 --> 01:00:05,000\nThird cue\n";
    let parsed = srt::parse(source).unwrap();
    let reparsed = srt::parse(&srt::serialize(&parsed)).unwrap();
    assert_eq!(parsed, reparsed);
}

#[test]
fn serialize_emits_contiguous_ids() {
    // Ad scrubbing leaves an id gap; serialization closes it.
    let source = "1\n00:00:01,000 --> 00:00:02,000\nReal dialogue\n\n\
                  2\n00:00:03,000 --> 00:00:04,000\nSubtitles by OpenSubtitles.org\n\n\
                  3\n00:00:05,000 --> 00:00:06,000\nMore dialogue\n";
    let scrubbed = ads::scrub(srt::parse(source).unwrap());
    assert_eq!(scrubbed.cues[1].index, 3);

    let output = srt::serialize(&scrubbed);
    let reparsed = srt::parse(&output).unwrap();
    assert_eq!(reparsed.cues[1].index, 2);
    assert!(output.lines().next() == Some("1"));
}

#[test]
fn merge_length_and_timing_preserved() {
    let main = track(&[
        (1_000, 3_000, "one"),
        (4_000, 6_000, "two"),
        (7_000, 9_000, "three"),
        (10_000, 12_000, "four"),
    ]);
    let translation = track(&[(4_100, 5_900, "zwei"), (20_000, 21_000, "nothing near")]);

    let merged = MergeEngine::default().merge(&main, &translation);
    assert_eq!(merged.len(), main.len());
    for (m, out) in main.cues.iter().zip(merged.cues.iter()) {
        assert_eq!(m.start_ms, out.start_ms);
        assert_eq!(m.end_ms, out.end_ms);
        assert_eq!(m.index, out.index);
    }
    assert_eq!(merged.cues[1].text, "two\n<i>zwei</i>");
    assert_eq!(merged.cues[0].text, "one");
}

#[test]
fn merge_monotonicity() {
    let main = track(&[
        (0, 2_000, "a"),
        (2_000, 4_000, "b"),
        (4_000, 6_000, "c"),
        (6_000, 8_000, "d"),
    ]);
    let translation = track(&[
        (100, 1_900, "w"),
        (2_100, 3_900, "x"),
        (4_100, 5_900, "y"),
        (6_100, 7_900, "z"),
    ]);
    let merged = MergeEngine::default().merge(&main, &translation);
    assert!(
        merged
            .cues
            .windows(2)
            .all(|pair| pair[0].start_ms <= pair[1].start_ms)
    );
}

#[test]
fn merged_cue_shape() {
    let shape = regex::Regex::new(r"^[^\n]+(\n<i>[^\n]+</i>)?$").unwrap();
    let main = track(&[
        (0, 2_000, "<b>styled</b>\nmultiline"),
        (3_000, 5_000, "plain"),
        (6_000, 8_000, "unmatched\ncue"),
    ]);
    let translation = track(&[(100, 1_900, "<i>eins</i>\nzwei"), (3_050, 4_950, "drei")]);
    let merged = MergeEngine::default().merge(&main, &translation);
    for cue in &merged.cues {
        assert!(shape.is_match(&cue.text), "bad cue shape: {:?}", cue.text);
    }
}

#[test]
fn ad_keywords_never_survive() {
    let source = "1\n00:00:01,000 --> 00:00:02,000\nWatch at osdb.link/xyz\n\n\
                  2\n00:00:03,000 --> 00:00:04,000\nActual dialogue here\n\n\
                  3\n00:00:05,000 --> 00:00:06,000\nRated on OpenSubtitles.com\n";
    let main = ads::scrub(srt::parse(source).unwrap());
    let translation = track(&[(3_000, 4_000, "Echter Dialog hier")]);
    let merged = MergeEngine::default().merge(&main, &translation);

    for keyword in ads::AD_KEYWORDS {
        for cue in &merged.cues {
            assert!(!cue.text.contains(keyword));
        }
    }
    assert_eq!(merged.len(), 1);
}

#[test]
fn proximity_window_boundaries() {
    let engine = MergeEngine::new(500);
    // Exactly at the threshold: |Δstart| = 500 is not < 500.
    let main = track(&[(10_000, 10_400, "at-threshold")]);
    let translation = track(&[(10_500, 11_000, "late")]);
    let merged = engine.merge(&main, &translation);
    assert_eq!(merged.cues[0].text, "at-threshold");

    // One millisecond inside the window.
    let main = track(&[(10_000, 10_400, "inside")]);
    let translation = track(&[(10_499, 11_000, "close")]);
    let merged = engine.merge(&main, &translation);
    assert_eq!(merged.cues[0].text, "inside\n<i>close</i>");
}

#[test]
fn dense_tracks_align_pairwise() {
    // 500 aligned cue pairs; every one must match its counterpart and the
    // cursor must keep the scan linear (this finishes instantly).
    let main_cues: Vec<(u64, u64, &str)> =
        (0..500u64).map(|i| (i * 3_000, i * 3_000 + 2_500, "m")).collect();
    let trans_cues: Vec<(u64, u64, &str)> =
        (0..500u64).map(|i| (i * 3_000 + 50, i * 3_000 + 2_550, "t")).collect();
    let merged = MergeEngine::default().merge(&track(&main_cues), &track(&trans_cues));
    assert_eq!(merged.len(), 500);
    assert!(merged.cues.iter().all(|c| c.text == "m\n<i>t</i>"));
}
