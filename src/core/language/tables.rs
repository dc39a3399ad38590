//! Static language and encoding tables.
//!
//! Three cross-referenced maps drive the pipeline: ISO-639-3 to ISO-639-1
//! codes (with macrolanguage rollups), language to legacy-codepage priority
//! lists, and language to script block ranges. Alias groups cover the
//! bibliographic/terminological 3-letter split (`fre`/`fra`), and related
//! language groups express mutual intelligibility for verification.
//!
//! All tables are process-wide constants; nothing here is configurable.

use encoding_rs::{
    BIG5, EUC_JP, EUC_KR, Encoding, GB18030, GBK, ISO_2022_JP, ISO_8859_2, ISO_8859_3,
    ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8, ISO_8859_10, ISO_8859_13,
    ISO_8859_14, ISO_8859_15, ISO_8859_16, KOI8_R, KOI8_U, SHIFT_JIS, UTF_8, UTF_16BE, UTF_16LE,
    WINDOWS_874, WINDOWS_1250, WINDOWS_1251, WINDOWS_1252, WINDOWS_1253, WINDOWS_1254,
    WINDOWS_1255, WINDOWS_1256, WINDOWS_1257, WINDOWS_1258,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Language tags that can never be merged: they already contain two
/// languages (the premixed bilingual code used by some catalogs).
pub const SKIPPED_TAGS: &[&str] = &["ze"];

/// ISO 639-3 (and 639-2 bibliographic) to ISO 639-1, including the
/// macrolanguage rollups the trigram detector needs (`cmn`/`yue`/`wuu` to
/// `zh`, `khk` to `mn`, `arb` to `ar`, `pes` to `fa`, `nob`/`nno` to `no`).
const ISO3_TO_1: &[(&str, &str)] = &[
    ("afr", "af"),
    ("aka", "ak"),
    ("alb", "sq"),
    ("amh", "am"),
    ("ara", "ar"),
    ("arb", "ar"),
    ("arm", "hy"),
    ("aze", "az"),
    ("azj", "az"),
    ("baq", "eu"),
    ("bel", "be"),
    ("ben", "bn"),
    ("bod", "bo"),
    ("bos", "bs"),
    ("bul", "bg"),
    ("bur", "my"),
    ("cat", "ca"),
    ("ces", "cs"),
    ("chi", "zh"),
    ("cmn", "zh"),
    ("cym", "cy"),
    ("cze", "cs"),
    ("dan", "da"),
    ("deu", "de"),
    ("dut", "nl"),
    ("ell", "el"),
    ("eng", "en"),
    ("epo", "eo"),
    ("est", "et"),
    ("eus", "eu"),
    ("fas", "fa"),
    ("fin", "fi"),
    ("fra", "fr"),
    ("fre", "fr"),
    ("geo", "ka"),
    ("ger", "de"),
    ("gle", "ga"),
    ("glg", "gl"),
    ("gre", "el"),
    ("guj", "gu"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("hye", "hy"),
    ("ice", "is"),
    ("ind", "id"),
    ("isl", "is"),
    ("ita", "it"),
    ("jav", "jv"),
    ("jpn", "ja"),
    ("kan", "kn"),
    ("kat", "ka"),
    ("kaz", "kk"),
    ("khk", "mn"),
    ("khm", "km"),
    ("kor", "ko"),
    ("lao", "lo"),
    ("lat", "la"),
    ("lav", "lv"),
    ("lit", "lt"),
    ("mac", "mk"),
    ("mal", "ml"),
    ("mao", "mi"),
    ("mar", "mr"),
    ("may", "ms"),
    ("mkd", "mk"),
    ("mlt", "mt"),
    ("mon", "mn"),
    ("mri", "mi"),
    ("msa", "ms"),
    ("mya", "my"),
    ("nep", "ne"),
    ("nld", "nl"),
    ("nno", "no"),
    ("nob", "no"),
    ("nor", "no"),
    ("ori", "or"),
    ("pan", "pa"),
    ("per", "fa"),
    ("pes", "fa"),
    ("pob", "pt"),
    ("pol", "pl"),
    ("por", "pt"),
    ("ron", "ro"),
    ("rum", "ro"),
    ("rus", "ru"),
    ("scc", "sr"),
    ("scr", "hr"),
    ("sin", "si"),
    ("slk", "sk"),
    ("slo", "sk"),
    ("slv", "sl"),
    ("sna", "sn"),
    ("spa", "es"),
    ("sqi", "sq"),
    ("srp", "sr"),
    ("swa", "sw"),
    ("swe", "sv"),
    ("swh", "sw"),
    ("tam", "ta"),
    ("tel", "te"),
    ("tgl", "tl"),
    ("tha", "th"),
    ("tib", "bo"),
    ("tuk", "tk"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("urd", "ur"),
    ("uzb", "uz"),
    ("vie", "vi"),
    ("wel", "cy"),
    ("wuu", "zh"),
    ("ydd", "yi"),
    ("yor", "yo"),
    ("yue", "zh"),
    ("zho", "zh"),
    ("zsm", "ms"),
    ("zul", "zu"),
];

static ISO3_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ISO3_TO_1.iter().copied().collect());

/// Map a 3-letter code to its 2-letter form, if one is known.
pub fn iso3_to_iso1(code: &str) -> Option<&'static str> {
    ISO3_MAP.get(code).copied()
}

/// Alias groups: every member refers to the same language when filtering
/// catalog results (bibliographic vs. terminological 3-letter variants,
/// plus a few legacy catalog codes such as `scc`/`scr` and `pob`).
const ALIAS_GROUPS: &[&[&str]] = &[
    &["bo", "tib", "bod"],
    &["cs", "cze", "ces"],
    &["cy", "wel", "cym"],
    &["de", "ger", "deu"],
    &["el", "gre", "ell"],
    &["eu", "baq", "eus"],
    &["fa", "per", "fas", "pes"],
    &["fr", "fre", "fra"],
    &["hr", "scr", "hrv"],
    &["hy", "arm", "hye"],
    &["is", "ice", "isl"],
    &["ka", "geo", "kat"],
    &["mi", "mao", "mri"],
    &["mk", "mac", "mkd"],
    &["ms", "may", "msa"],
    &["my", "bur", "mya"],
    &["nl", "dut", "nld"],
    &["pt", "por", "pob"],
    &["ro", "rum", "ron"],
    &["sk", "slo", "slk"],
    &["sq", "alb", "sqi"],
    &["sr", "scc", "srp"],
    &["zh", "chi", "zho", "cmn"],
];

static ALIAS_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for group in ALIAS_GROUPS {
        for code in *group {
            map.insert(*code, *group);
        }
    }
    map
});

/// Return the alias group containing `code`, if any.
pub fn alias_group(code: &str) -> Option<&'static [&'static str]> {
    ALIAS_MAP.get(code).copied()
}

/// Legacy-codepage candidates per 2-letter language, most likely first.
/// Consulted by the mojibake repair loop before the global fallback order.
const ENCODING_PRIORITY: &[(&str, &[&str])] = &[
    ("ar", &["win1256", "iso88596"]),
    ("be", &["win1251", "iso88595"]),
    ("bg", &["win1251", "iso88595"]),
    ("bs", &["win1250", "iso88592"]),
    ("ca", &["win1252", "iso88591", "iso885915"]),
    ("cs", &["win1250", "iso88592"]),
    ("da", &["win1252", "iso88591", "iso885915"]),
    ("de", &["win1252", "iso88591", "iso885915"]),
    ("el", &["win1253", "iso88597"]),
    ("en", &["win1252", "iso88591"]),
    ("es", &["win1252", "iso88591", "iso885915"]),
    ("et", &["win1257", "iso885913"]),
    ("eu", &["win1252", "iso88591"]),
    ("fa", &["win1256"]),
    ("fi", &["win1252", "iso88591", "iso885915"]),
    ("fr", &["win1252", "iso88591", "iso885915"]),
    ("gl", &["win1252", "iso88591"]),
    ("he", &["win1255", "iso88598"]),
    ("hr", &["win1250", "iso88592"]),
    ("hu", &["win1250", "iso88592"]),
    ("is", &["win1252", "iso88591"]),
    ("it", &["win1252", "iso88591", "iso885915"]),
    ("ja", &["shiftjis", "eucjp", "iso2022jp"]),
    ("ko", &["euckr", "cp949"]),
    ("lt", &["win1257", "iso885913"]),
    ("lv", &["win1257", "iso885913"]),
    ("mk", &["win1251", "iso88595"]),
    ("nl", &["win1252", "iso88591", "iso885915"]),
    ("no", &["win1252", "iso88591", "iso885915"]),
    ("pl", &["win1250", "iso88592"]),
    ("pt", &["win1252", "iso88591", "iso885915"]),
    ("ro", &["win1250", "iso88592", "iso885916"]),
    ("ru", &["win1251", "iso88595", "koi8r"]),
    ("sk", &["win1250", "iso88592"]),
    ("sl", &["win1250", "iso88592"]),
    ("sq", &["win1250", "iso88591"]),
    ("sr", &["win1251", "win1250", "iso88592"]),
    ("sv", &["win1252", "iso88591", "iso885915"]),
    ("th", &["win874", "tis620"]),
    ("tr", &["win1254", "iso88599"]),
    ("uk", &["win1251", "koi8u", "iso88595"]),
    ("ur", &["win1256"]),
    ("vi", &["win1258"]),
    ("zh", &["gbk", "gb2312", "big5"]),
];

static ENCODING_PRIORITY_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| ENCODING_PRIORITY.iter().copied().collect());

/// Codepage priority list for a 2-letter language (empty when unknown).
pub fn encoding_priority(lang: &str) -> &'static [&'static str] {
    ENCODING_PRIORITY_MAP.get(lang).copied().unwrap_or(&[])
}

/// Fixed global fallback order tried after the language-prioritized list.
pub const GLOBAL_FALLBACK_ENCODINGS: &[&str] = &[
    "win1252", "win1250", "win1251", "win1253", "win1254", "win1255", "win1256", "win1257",
    "iso88592", "iso88595", "iso88597", "iso88599", "koi8r", "win874", "gbk", "big5", "shiftjis",
    "euckr",
];

/// Unicode code-point ranges (inclusive) characteristic of each language's
/// primary script. Used to validate legacy-codepage repair.
const SCRIPT_BLOCKS: &[(&str, &[(u32, u32)])] = &[
    ("am", &[(0x1200, 0x137F)]),
    ("ar", &[(0x0600, 0x06FF), (0x0750, 0x077F)]),
    ("be", &[(0x0400, 0x04FF)]),
    ("bg", &[(0x0400, 0x04FF)]),
    ("bn", &[(0x0980, 0x09FF)]),
    ("el", &[(0x0370, 0x03FF)]),
    ("fa", &[(0x0600, 0x06FF), (0x0750, 0x077F)]),
    ("gu", &[(0x0A80, 0x0AFF)]),
    ("he", &[(0x0590, 0x05FF)]),
    ("hi", &[(0x0900, 0x097F)]),
    ("hy", &[(0x0530, 0x058F)]),
    ("ja", &[(0x3040, 0x309F), (0x30A0, 0x30FF), (0x4E00, 0x9FFF)]),
    ("ka", &[(0x10A0, 0x10FF)]),
    ("km", &[(0x1780, 0x17FF)]),
    ("kn", &[(0x0C80, 0x0CFF)]),
    ("ko", &[(0xAC00, 0xD7AF), (0x1100, 0x11FF), (0x3130, 0x318F)]),
    ("lo", &[(0x0E80, 0x0EFF)]),
    ("mk", &[(0x0400, 0x04FF)]),
    ("ml", &[(0x0D00, 0x0D7F)]),
    ("mn", &[(0x0400, 0x04FF)]),
    ("mr", &[(0x0900, 0x097F)]),
    ("my", &[(0x1000, 0x109F)]),
    ("ne", &[(0x0900, 0x097F)]),
    ("pa", &[(0x0A00, 0x0A7F)]),
    ("ru", &[(0x0400, 0x04FF)]),
    ("si", &[(0x0D80, 0x0DFF)]),
    ("sr", &[(0x0400, 0x04FF)]),
    ("ta", &[(0x0B80, 0x0BFF)]),
    ("te", &[(0x0C00, 0x0C7F)]),
    ("th", &[(0x0E00, 0x0E7F)]),
    ("uk", &[(0x0400, 0x04FF)]),
    ("ur", &[(0x0600, 0x06FF), (0x0750, 0x077F)]),
    ("yi", &[(0x0590, 0x05FF)]),
    ("zh", &[(0x4E00, 0x9FFF), (0x3400, 0x4DBF)]),
];

static SCRIPT_BLOCK_MAP: Lazy<HashMap<&'static str, &'static [(u32, u32)]>> =
    Lazy::new(|| SCRIPT_BLOCKS.iter().copied().collect());

/// Script block ranges for a 2-letter language, if its primary script is
/// distinguishable from basic Latin.
pub fn script_blocks(lang: &str) -> Option<&'static [(u32, u32)]> {
    SCRIPT_BLOCK_MAP.get(lang).copied()
}

/// Mutually intelligible relatives per 2-letter code. Asymmetric entries
/// are permitted (Catalan accepts Spanish, not the reverse via this entry).
const RELATED_LANGUAGES: &[(&str, &[&str])] = &[
    // South Slavic (Latin script cluster)
    ("bs", &["hr", "sr", "sl"]),
    ("hr", &["bs", "sr", "sl"]),
    ("sr", &["bs", "hr", "sl"]),
    ("sl", &["hr", "bs", "sr"]),
    // West Slavic
    ("cs", &["sk"]),
    ("sk", &["cs"]),
    // Scandinavian
    ("da", &["no", "sv"]),
    ("no", &["da", "sv"]),
    ("sv", &["da", "no"]),
    // Iberian Romance
    ("es", &["pt", "gl", "ca"]),
    ("pt", &["es", "gl"]),
    ("gl", &["es", "pt"]),
    ("ca", &["es"]),
    // Malay - Indonesian
    ("ms", &["id"]),
    ("id", &["ms"]),
    // East Slavic
    ("ru", &["uk", "be"]),
    ("uk", &["ru", "be"]),
    ("be", &["ru", "uk"]),
];

static RELATED_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| RELATED_LANGUAGES.iter().copied().collect());

/// Languages related to `lang` (empty when it has no group).
pub fn related_languages(lang: &str) -> &'static [&'static str] {
    RELATED_MAP.get(lang).copied().unwrap_or(&[])
}

/// True when `a` and `b` are mutually intelligible in either direction.
pub fn are_related(a: &str, b: &str) -> bool {
    related_languages(a).contains(&b) || related_languages(b).contains(&a)
}

/// Canonicalize an encoding label from a statistical detector or a table:
/// lowercase, separators removed, `windows-` collapsed to `win`, ASCII
/// treated as UTF-8.
///
/// # Examples
///
/// ```rust
/// use dualsub::core::language::tables::canonical_label;
///
/// assert_eq!(canonical_label("windows-1254"), "win1254");
/// assert_eq!(canonical_label("ISO-8859-9"), "iso88599");
/// assert_eq!(canonical_label("us-ascii"), "utf8");
/// assert_eq!(canonical_label("Shift_JIS"), "shiftjis");
/// ```
pub fn canonical_label(label: &str) -> String {
    let mut name: String = label
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if let Some(rest) = name.strip_prefix("windows") {
        name = format!("win{}", rest);
    }
    match name.as_str() {
        "ascii" | "usascii" => "utf8".to_string(),
        // GB18030 is a superset of GBK; decode it as such.
        "gb18030" => "gbk".to_string(),
        _ => name,
    }
}

/// Resolve a canonical encoding name to its `encoding_rs` decoder.
///
/// ISO-8859-1 intentionally resolves to windows-1252 (its WHATWG superset),
/// ISO-8859-11 and TIS-620 to windows-874, and CP949 to EUC-KR, matching
/// how these encodings are unified on the web.
pub fn encoding_for_name(name: &str) -> Option<&'static Encoding> {
    let encoding = match name {
        "utf8" => UTF_8,
        "utf16le" => UTF_16LE,
        "utf16be" => UTF_16BE,
        "win1250" => WINDOWS_1250,
        "win1251" => WINDOWS_1251,
        "win1252" | "iso88591" => WINDOWS_1252,
        "win1253" => WINDOWS_1253,
        "win1254" | "iso88599" => WINDOWS_1254,
        "win1255" => WINDOWS_1255,
        "win1256" => WINDOWS_1256,
        "win1257" => WINDOWS_1257,
        "win1258" => WINDOWS_1258,
        "win874" | "tis620" | "iso885911" => WINDOWS_874,
        "iso88592" => ISO_8859_2,
        "iso88593" => ISO_8859_3,
        "iso88594" => ISO_8859_4,
        "iso88595" => ISO_8859_5,
        "iso88596" => ISO_8859_6,
        "iso88597" => ISO_8859_7,
        "iso88598" => ISO_8859_8,
        "iso885910" => ISO_8859_10,
        "iso885913" => ISO_8859_13,
        "iso885914" => ISO_8859_14,
        "iso885915" => ISO_8859_15,
        "iso885916" => ISO_8859_16,
        "koi8r" => KOI8_R,
        "koi8u" => KOI8_U,
        "gbk" | "gb2312" => GBK,
        "gb18030" => GB18030,
        "big5" => BIG5,
        "shiftjis" => SHIFT_JIS,
        "eucjp" => EUC_JP,
        "iso2022jp" => ISO_2022_JP,
        "euckr" | "cp949" => EUC_KR,
        _ => return None,
    };
    Some(encoding)
}
