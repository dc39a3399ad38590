use clap::Args;
use std::path::PathBuf;

/// Arguments for the `detect-encoding` subcommand.
#[derive(Args, Debug)]
pub struct DetectEncodingArgs {
    /// Subtitle files to analyze
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Expected language tag, used to prioritize repair codepages
    #[arg(long)]
    pub language: Option<String>,

    /// Print a text sample alongside the analysis
    #[arg(short, long)]
    pub verbose: bool,
}
