//! `merge`: run the local pipeline on two subtitle files.
//!
//! This is the offline counterpart of the fetch pipeline: same decode,
//! parse, scrub, merge, and serialize stages, minus the catalogs. Language
//! verification only runs when `--verify` is given; without it, the
//! language flags act purely as decoding hints.

use crate::Result;
use crate::cli::MergeArgs;
use crate::cli::ui::print_success;
use crate::core::encoding::SubtitleDecoder;
use crate::core::formats::{CueTrack, ads, srt};
use crate::core::language::{LanguageTag, LanguageVerifier};
use crate::core::merge::{DEFAULT_MERGE_THRESHOLD_MS, MergeEngine};
use crate::error::DualSubError;
use std::path::{Path, PathBuf};

/// Execute the merge command.
pub async fn execute(args: MergeArgs) -> Result<()> {
    let main_hint = args.main_language.as_deref().map(LanguageTag::new);
    let translation_hint = args.translation_language.as_deref().map(LanguageTag::new);

    let main_track = load_track(&args.main_file, main_hint.as_ref(), args.verify).await?;
    let translation_track =
        load_track(&args.translation_file, translation_hint.as_ref(), args.verify).await?;

    let threshold = args.threshold_ms.unwrap_or(DEFAULT_MERGE_THRESHOLD_MS);
    let merged = MergeEngine::new(threshold).merge(&main_track, &translation_track);
    if merged.is_empty() {
        return Err(DualSubError::EmptyMerge);
    }

    let output = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.main_file));
    tokio::fs::write(&output, srt::serialize(&merged)).await?;
    print_success(&format!(
        "merged {} cue(s) into {}",
        merged.len(),
        output.display()
    ));
    Ok(())
}

async fn load_track(
    path: &Path,
    hint: Option<&LanguageTag>,
    verify: bool,
) -> Result<CueTrack> {
    let bytes = tokio::fs::read(path).await?;
    let decoder = SubtitleDecoder::new();
    let decoded = decoder.decode_strict(&bytes, hint)?;
    log::debug!("{}: decoded as {}", path.display(), decoded.guess);

    if verify {
        if let Some(expected) = hint {
            let verdict = LanguageVerifier::new().verify(&decoded.text, expected);
            if !verdict.is_accepted() {
                return Err(DualSubError::language_mismatch(
                    expected.as_str(),
                    "unexpected content",
                ));
            }
        }
    }

    let track = srt::parse(&decoded.text)?;
    Ok(ads::scrub(track))
}

fn derive_output_path(main_file: &Path) -> PathBuf {
    let stem = main_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("merged");
    main_file.with_file_name(format!("{stem}.dual.srt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("/subs/film.en.srt")),
            PathBuf::from("/subs/film.en.dual.srt")
        );
        assert_eq!(
            derive_output_path(Path::new("film.srt")),
            PathBuf::from("film.dual.srt")
        );
    }
}
