//! Byte-order-mark dispatch, including double-encoded BOMs.
//!
//! A double-encoded BOM is the fingerprint of a UTF stream that was read as
//! Latin-1 and re-encoded to UTF-8: `FF FE` becomes `C3 BF C3 BE`, `FE FF`
//! becomes `C3 BE C3 BF`, and `EF BB BF` becomes `C3 AF C2 BB C2 BF`. The
//! prefixes are tested in a fixed order; the first match wins, and the
//! double-encoded forms are tested before their plain counterparts so a
//! wrapped stream is never mistaken for mojibake body text.

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};

/// The BOM variants the decoder recognizes, in dispatch precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    /// `C3 BF C3 BE`: UTF-16 LE BOM that was itself double-encoded.
    DoubleEncodedUtf16Le,
    /// `FF FE`: UTF-16 LE.
    Utf16Le,
    /// `C3 BE C3 BF`: UTF-16 BE BOM that was itself double-encoded.
    DoubleEncodedUtf16Be,
    /// `FE FF`: UTF-16 BE.
    Utf16Be,
    /// `C3 AF C2 BB C2 BF`: UTF-8 BOM that was itself double-encoded.
    DoubleEncodedUtf8,
    /// `EF BB BF`: UTF-8 with BOM.
    Utf8,
}

impl BomKind {
    /// Canonical name of the encoding this BOM announces.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            BomKind::DoubleEncodedUtf16Le | BomKind::Utf16Le => "utf16le",
            BomKind::DoubleEncodedUtf16Be | BomKind::Utf16Be => "utf16be",
            BomKind::DoubleEncodedUtf8 | BomKind::Utf8 => "utf8",
        }
    }

    /// True for the double-encoded variants.
    pub fn is_double_encoded(&self) -> bool {
        matches!(
            self,
            BomKind::DoubleEncodedUtf16Le
                | BomKind::DoubleEncodedUtf16Be
                | BomKind::DoubleEncodedUtf8
        )
    }

    /// Decode the full buffer according to this BOM, lossily.
    ///
    /// For the double-encoded UTF-16 forms the whole buffer is first read
    /// as UTF-8 and mapped back to Latin-1 bytes to undo the extra wrap;
    /// the BOM itself is then skipped and the payload decoded. The
    /// double-encoded UTF-8 form only skips its 6-byte prefix here; the
    /// still-wrapped body is left to the mojibake repair stage.
    pub fn decode(&self, data: &[u8]) -> String {
        match self {
            BomKind::DoubleEncodedUtf16Le => {
                let unwrapped = undo_latin1_wrap(data);
                decode_skipping(&unwrapped, 2, UTF_16LE)
            }
            BomKind::Utf16Le => decode_skipping(data, 2, UTF_16LE),
            BomKind::DoubleEncodedUtf16Be => {
                let unwrapped = undo_latin1_wrap(data);
                decode_skipping(&unwrapped, 2, UTF_16BE)
            }
            BomKind::Utf16Be => decode_skipping(data, 2, UTF_16BE),
            BomKind::DoubleEncodedUtf8 => decode_skipping(data, 6, UTF_8),
            BomKind::Utf8 => decode_skipping(data, 3, UTF_8),
        }
    }
}

/// Test the buffer prefix against the known BOMs in fixed precedence order.
pub fn detect(data: &[u8]) -> Option<BomKind> {
    const DOUBLE_UTF16LE: &[u8] = &[0xC3, 0xBF, 0xC3, 0xBE];
    const DOUBLE_UTF16BE: &[u8] = &[0xC3, 0xBE, 0xC3, 0xBF];
    const DOUBLE_UTF8: &[u8] = &[0xC3, 0xAF, 0xC2, 0xBB, 0xC2, 0xBF];

    if data.starts_with(DOUBLE_UTF16LE) {
        Some(BomKind::DoubleEncodedUtf16Le)
    } else if data.starts_with(&[0xFF, 0xFE]) {
        Some(BomKind::Utf16Le)
    } else if data.starts_with(DOUBLE_UTF16BE) {
        Some(BomKind::DoubleEncodedUtf16Be)
    } else if data.starts_with(&[0xFE, 0xFF]) {
        Some(BomKind::Utf16Be)
    } else if data.starts_with(DOUBLE_UTF8) {
        Some(BomKind::DoubleEncodedUtf8)
    } else if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(BomKind::Utf8)
    } else {
        None
    }
}

/// Read the buffer as UTF-8 and map every resulting char back to its low
/// Latin-1 byte, reversing a Latin-1 read / UTF-8 write round trip.
fn undo_latin1_wrap(data: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(data)
        .chars()
        .map(|c| (c as u32 & 0xFF) as u8)
        .collect()
}

fn decode_skipping(data: &[u8], skip: usize, encoding: &'static encoding_rs::Encoding) -> String {
    let payload = data.get(skip..).unwrap_or(&[]);
    let (text, _) = encoding.decode_without_bom_handling(payload);
    text.into_owned()
}
