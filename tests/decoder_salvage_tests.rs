//! End-to-end decoder salvage scenarios: BOM precedence, double-encoded
//! streams, legacy codepages, and the purity guarantee.

use dualsub::core::encoding::{GuessOrigin, SubtitleDecoder};
use dualsub::core::language::{LanguageTag, LanguageVerifier, Verdict};

/// Encode text as UTF-8, then pretend those bytes were Latin-1 and encode
/// them as UTF-8 again: the classic double-encoding accident.
fn double_encode(text: &str) -> Vec<u8> {
    let latin1_read: String = text
        .bytes()
        .map(|b| char::from_u32(b as u32).unwrap())
        .collect();
    latin1_read.into_bytes()
}

#[test]
fn utf16le_bom_hello() {
    let bytes = [
        0xFF, 0xFE, 0x48, 0x00, 0x65, 0x00, 0x6C, 0x00, 0x6C, 0x00, 0x6F, 0x00,
    ];
    let decoded = SubtitleDecoder::new().decode(&bytes, None);
    assert_eq!(decoded.text, "Hello");
    assert_eq!(decoded.guess.name, "utf16le");
    assert_eq!(decoded.guess.origin, GuessOrigin::Bom);
}

#[test]
fn bom_precedence_over_statistics() {
    // A long ASCII payload the statistical detector would love; the FF FE
    // prefix must still force UTF-16 LE.
    let mut bytes = vec![0xFF, 0xFE];
    for b in "The statistical detector never sees this buffer first.".bytes() {
        bytes.push(b);
        bytes.push(0x00);
    }
    let decoded = SubtitleDecoder::new().decode(&bytes, None);
    assert_eq!(decoded.guess.name, "utf16le");
    assert!(decoded.text.starts_with("The statistical"));
}

#[test]
fn double_encoded_utf16le_bom_is_unwrapped() {
    let mut original = vec![0xFF, 0xFE];
    for b in "Subtitle payload".bytes() {
        original.push(b);
        original.push(0x00);
    }
    // Read the UTF-16 bytes as Latin-1, write them back out as UTF-8.
    let wrapped: Vec<u8> = original
        .iter()
        .map(|&b| char::from_u32(b as u32).unwrap())
        .collect::<String>()
        .into_bytes();
    // Sanity: the wrapped buffer begins with the double-encoded BOM.
    assert_eq!(&wrapped[..4], &[0xC3, 0xBF, 0xC3, 0xBE]);

    let decoded = SubtitleDecoder::new().decode(&wrapped, None);
    assert!(!decoded.text.starts_with("ÿþ"));
    assert_eq!(decoded.text, "Subtitle payload");
}

#[test]
fn thai_double_encoded_utf8() {
    let original = "กขคง จฉชซ ฌญฎฏ ฐฑฒณ ดตถท ธนบป ผฝพฟ ภมยร ลวศษ สหฬอ ฮะัา";
    let bytes = double_encode(original);
    // Three Latin-1 pairs per Thai glyph: the ก fingerprint.
    assert_eq!(&bytes[..6], &[0xC3, 0xA0, 0xC2, 0xB8, 0xC2, 0x81]);

    let decoded = SubtitleDecoder::new().decode(&bytes, Some(&LanguageTag::new("th")));
    assert!(decoded.text.contains('\u{0E01}'));
    assert!(decoded.repaired);
}

#[test]
fn windows1253_greek_salvage_and_verification() {
    let original = "Καλημέρα σας, πώς είστε σήμερα; Αυτό είναι ένα αρκετά μεγάλο κείμενο \
                    υποτίτλων για τον έλεγχο της γλώσσας. Οι υπότιτλοι συνεχίζουν με \
                    περισσότερες προτάσεις ώστε ο ανιχνευτής να έχει αρκετό υλικό.";
    let (encoded, _, _) = encoding_rs::WINDOWS_1253.encode(original);

    let decoder = SubtitleDecoder::new();
    let decoded = decoder.decode(&encoded, Some(&LanguageTag::new("el")));

    let greek = decoded
        .text
        .chars()
        .filter(|&c| ('\u{0370}'..='\u{03FF}').contains(&c))
        .count();
    let total = decoded.text.chars().count();
    assert!(greek as f64 / total as f64 >= 0.15);

    let verdict = LanguageVerifier::new().verify(&decoded.text, &LanguageTag::new("el"));
    assert_eq!(verdict, Verdict::Match);
}

#[test]
fn no_replacement_leak() {
    // Whatever the decoder returns in strict mode never carries U+FFFD.
    let samples: Vec<Vec<u8>> = vec![
        b"plain ascii".to_vec(),
        vec![0xFF, 0xFE, 0x48, 0x00],
        double_encode("Привет как дела сегодня вечером в кинотеатре"),
        vec![0xC0, 0xC1, 0xF5, 0xF6, 0xFF, 0xFE, 0xFD],
    ];
    let decoder = SubtitleDecoder::new();
    for bytes in samples {
        if let Ok(decoded) = decoder.decode_strict(&bytes, None) {
            assert!(!decoded.text.contains('\u{FFFD}'));
        }
    }
}

#[test]
fn decoder_purity() {
    let decoder = SubtitleDecoder::new();
    let hint = LanguageTag::new("ru");
    let inputs: Vec<Vec<u8>> = vec![
        double_encode("Длинный русский текст для проверки воспроизводимости декодера."),
        vec![0xFF, 0xFE, 0x41, 0x00, 0x42, 0x00],
        b"plain text with no tricks at all".to_vec(),
    ];
    for bytes in inputs {
        let first = decoder.decode(&bytes, Some(&hint));
        let second = decoder.decode(&bytes, Some(&hint));
        assert_eq!(first.text, second.text);
        assert_eq!(first.guess, second.guess);
        assert_eq!(first.repaired, second.repaired);
    }
}

#[test]
fn related_language_acceptance() {
    // Croatian text against a Bosnian expectation: South Slavic group.
    let text = "Brzi smeđi lisac skače preko lijenog psa pokraj rijeke svakog jutra. \
                Danas je lijep dan i svi su sretni zbog toga. Sutra ćemo ponovno ići \
                u šetnju pokraj rijeke i gledati ptice kako lete iznad vode."
        .repeat(2);
    let verdict = LanguageVerifier::new().verify(&text, &LanguageTag::new("bs"));
    assert!(verdict.is_accepted());
}
