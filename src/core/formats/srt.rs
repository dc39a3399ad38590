//! SubRip (.srt) parsing and serialization.
//!
//! The timestamp line is parsed by a hand-written scanner instead of a
//! regex: it is on the hot path for every cue, and the scanner reports the
//! exact column where a malformed line goes wrong. The accepted grammar is
//! `HH:MM:SS,mmm --> HH:MM:SS,mmm` with exactly two digits for hours,
//! minutes, and seconds and three for milliseconds.

use crate::Result;
use crate::core::formats::{Cue, CueTrack};
use crate::error::DualSubError;

/// Parse SRT text into a cue track.
///
/// Line endings are normalized, a leading U+FEFF is ignored, and blocks are
/// separated by one or more blank lines. Every block must carry an integer
/// id line, a timestamp line, and at least one text line; anything else is
/// a parse failure naming the offending line.
///
/// Cues are renumbered from 1 and sorted into non-decreasing start order on
/// output.
///
/// # Examples
///
/// ```rust
/// use dualsub::core::formats::srt;
///
/// let track = srt::parse("1\n00:00:01,000 --> 00:00:03,000\nHello\n").unwrap();
/// assert_eq!(track.len(), 1);
/// assert_eq!(track.cues[0].start_ms, 1000);
/// ```
pub fn parse(content: &str) -> Result<CueTrack> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let text = normalized.strip_prefix('\u{FEFF}').unwrap_or(&normalized);

    let mut cues = Vec::new();
    let mut lines = text.split('\n').enumerate().peekable();

    loop {
        while matches!(lines.peek(), Some((_, line)) if line.trim().is_empty()) {
            lines.next();
        }
        let Some((id_no, id_line)) = lines.next() else {
            break;
        };

        let trimmed = id_line.trim();
        if trimmed.parse::<u64>().is_err() {
            return Err(DualSubError::parse_failure(
                id_no + 1,
                format!("expected cue number, found '{trimmed}'"),
            ));
        }

        let Some((ts_no, ts_line)) = lines.next() else {
            return Err(DualSubError::parse_failure(
                id_no + 2,
                "missing timestamp line",
            ));
        };
        let (start_ms, end_ms) = parse_timestamp_line(ts_line.trim()).map_err(|col| {
            DualSubError::parse_failure(
                ts_no + 1,
                format!("malformed timestamp at column {}", col + 1),
            )
        })?;

        let mut text_lines: Vec<&str> = Vec::new();
        while let Some(&(_, line)) = lines.peek() {
            if line.trim().is_empty() {
                break;
            }
            text_lines.push(line);
            lines.next();
        }
        if text_lines.is_empty() {
            return Err(DualSubError::parse_failure(
                ts_no + 2,
                "cue has a number and timestamps but no text",
            ));
        }

        cues.push(Cue {
            index: 0,
            start_ms,
            end_ms,
            text: text_lines.join("\n"),
        });
    }

    if cues.is_empty() {
        return Err(DualSubError::parse_failure(1, "no cues found"));
    }

    let mut track = CueTrack::from_cues(cues);
    track.sort_and_renumber();
    Ok(track)
}

/// Serialize a cue track as SRT with sequential 1-based ids, a blank line
/// between cues, and a trailing newline after the final cue.
pub fn serialize(track: &CueTrack) -> String {
    let mut out = String::new();
    for (i, cue) in track.cues.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&format_timestamp(cue.start_ms));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(cue.end_ms));
        out.push('\n');
        out.push_str(&cue.text);
        out.push('\n');
    }
    out
}

/// Render milliseconds as `HH:MM:SS,mmm`.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Scanner state for one timestamp line. On error, returns the 0-based
/// column where scanning stopped.
struct TimestampScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TimestampScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            pos: 0,
        }
    }

    fn digits(&mut self, count: usize) -> std::result::Result<u64, usize> {
        let mut value = 0u64;
        for _ in 0..count {
            match self.bytes.get(self.pos) {
                Some(b @ b'0'..=b'9') => {
                    value = value * 10 + u64::from(b - b'0');
                    self.pos += 1;
                }
                _ => return Err(self.pos),
            }
        }
        // Exactly `count` digits: a further digit is a grammar violation.
        if matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
            return Err(self.pos);
        }
        Ok(value)
    }

    fn expect(&mut self, token: &str) -> std::result::Result<(), usize> {
        for &b in token.as_bytes() {
            if self.bytes.get(self.pos) != Some(&b) {
                return Err(self.pos);
            }
            self.pos += 1;
        }
        Ok(())
    }

    fn timestamp(&mut self) -> std::result::Result<u64, usize> {
        let hours = self.digits(2)?;
        self.expect(":")?;
        let minutes = self.digits(2)?;
        self.expect(":")?;
        let seconds = self.digits(2)?;
        self.expect(",")?;
        let millis = self.digits(3)?;
        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm`, tolerating trailing content
/// (position hints some tools append) after the second timestamp.
fn parse_timestamp_line(line: &str) -> std::result::Result<(u64, u64), usize> {
    let mut scanner = TimestampScanner::new(line);
    let start = scanner.timestamp()?;
    scanner.expect(" --> ")?;
    let end = scanner.timestamp()?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:03,000\nHello, World!\n\n2\n00:00:05,000 --> 00:00:08,000\nThis is a test subtitle.\nSecond line\n\n";

    #[test]
    fn test_parsing_basic() {
        let track = parse(SAMPLE_SRT).unwrap();
        assert_eq!(track.len(), 2);

        let first = &track.cues[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.start_ms, 1000);
        assert_eq!(first.end_ms, 3000);
        assert_eq!(first.text, "Hello, World!");

        let second = &track.cues[1];
        assert_eq!(second.index, 2);
        assert_eq!(second.text, "This is a test subtitle.\nSecond line");
    }

    #[test]
    fn test_crlf_and_bom_normalization() {
        let content = "\u{FEFF}1\r\n00:00:01,000 --> 00:00:03,000\r\nHello\r\n\r\n";
        let track = parse(content).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.cues[0].text, "Hello");
    }

    #[test]
    fn test_multiple_blank_lines_between_blocks() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n";
        let track = parse(content).unwrap();
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let track = parse(SAMPLE_SRT).unwrap();
        let serialized = serialize(&track);
        let reparsed = parse(&serialized).unwrap();
        assert_eq!(track, reparsed);
    }

    #[test]
    fn test_serialized_shape() {
        let track = parse("5\n00:00:01,000 --> 00:00:02,000\nOnly\n").unwrap();
        let out = serialize(&track);
        // Renumbered from 1, exact timestamp format, trailing newline.
        assert_eq!(out, "1\n00:00:01,000 --> 00:00:02,000\nOnly\n");
    }

    #[test]
    fn test_out_of_order_cues_sorted() {
        let content = "1\n00:00:10,000 --> 00:00:12,000\nlater\n\n2\n00:00:01,000 --> 00:00:02,000\nearlier\n";
        let track = parse(content).unwrap();
        assert_eq!(track.cues[0].text, "earlier");
        assert_eq!(track.cues[0].index, 1);
    }

    #[test]
    fn test_invalid_cue_number() {
        let err = parse("not-a-number\n00:00:01,000 --> 00:00:03,000\nText\n").unwrap_err();
        assert!(matches!(err, DualSubError::ParseFailure { line: 1, .. }));
    }

    #[test]
    fn test_invalid_timestamp_reports_line() {
        let err = parse("1\n00:00:01 --> 00:00:03\nText\n").unwrap_err();
        match err {
            DualSubError::ParseFailure { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("column"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_text_is_failure() {
        let err = parse("1\n00:00:01,000 --> 00:00:03,000\n\n").unwrap_err();
        assert!(matches!(err, DualSubError::ParseFailure { .. }));
    }

    #[test]
    fn test_empty_input_is_failure() {
        assert!(parse("").is_err());
        assert!(parse("\n\n\n").is_err());
    }

    #[test]
    fn test_timestamp_grammar_is_strict() {
        // Three-digit hours violate the two-digit rule.
        assert!(parse("1\n000:00:01,000 --> 00:00:03,000\nText\n").is_err());
        // Dot instead of comma for millis.
        assert!(parse("1\n00:00:01.000 --> 00:00:03,000\nText\n").is_err());
        // Single-space arrow.
        assert!(parse("1\n00:00:01,000 -> 00:00:03,000\nText\n").is_err());
    }

    #[test]
    fn test_trailing_position_hint_tolerated() {
        let track =
            parse("1\n00:00:01,000 --> 00:00:03,000 X1:100 X2:200\nText\n").unwrap();
        assert_eq!(track.cues[0].end_ms, 3000);
    }

    #[test]
    fn test_timestamp_edge_of_day() {
        let track = parse("1\n23:59:59,999 --> 23:59:59,999\nEnd of day\n").unwrap();
        let cue = &track.cues[0];
        let expected = 23 * 3_600_000 + 59 * 60_000 + 59 * 1_000 + 999;
        assert_eq!(cue.start_ms, expected);
        assert_eq!(cue.end_ms, expected);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
        assert_eq!(format_timestamp(3_661_005), "01:01:01,005");
    }
}
