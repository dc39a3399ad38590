use clap::Args;
use std::path::PathBuf;

/// Arguments for the `merge` subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Subtitle file providing the top line of each cue
    #[arg(long, value_name = "FILE")]
    pub main_file: PathBuf,

    /// Subtitle file providing the italic second line
    #[arg(long, value_name = "FILE")]
    pub translation_file: PathBuf,

    /// Output path (defaults to the main file with a .dual.srt suffix)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Proximity window for cue alignment, in milliseconds
    #[arg(long)]
    pub threshold_ms: Option<u64>,

    /// Expected language of the main file (decoding hint)
    #[arg(long)]
    pub main_language: Option<String>,

    /// Expected language of the translation file (decoding hint)
    #[arg(long)]
    pub translation_language: Option<String>,

    /// Verify that each file is in its expected language before merging
    #[arg(long, requires = "main_language", requires = "translation_language")]
    pub verify: bool,
}
