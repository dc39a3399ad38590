//! `detect-encoding`: diagnose subtitle files without the pipeline gates.
//!
//! Uses the lossy decoder entry point so even badly corrupted files report
//! something; language verification is deliberately suppressed here.

use crate::Result;
use crate::cli::DetectEncodingArgs;
use crate::core::encoding::SubtitleDecoder;
use crate::core::language::LanguageTag;

/// Execute the detect-encoding command.
pub async fn execute(args: DetectEncodingArgs) -> Result<()> {
    let decoder = SubtitleDecoder::new();
    let hint = args.language.as_deref().map(LanguageTag::new);

    for file in &args.files {
        let bytes = tokio::fs::read(file).await?;
        let decoded = decoder.decode(&bytes, hint.as_ref());

        let replacements = decoded.text.chars().filter(|&c| c == '\u{FFFD}').count();
        let detected = whatlang::detect(&decoded.text)
            .map(|info| info.lang().code().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "{}: {}{}, language {}, {} replacement char(s)",
            file.display(),
            decoded.guess,
            if decoded.repaired { ", repaired" } else { "" },
            detected,
            replacements,
        );
        if args.verbose {
            let sample: String = decoded.text.chars().take(200).collect();
            println!("  sample: {}", sample.replace('\n', " "));
        }
    }
    Ok(())
}
