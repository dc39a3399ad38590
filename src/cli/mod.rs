//! Command-line interface for the DualSub subtitle middleware.
//!
//! The CLI is built using `clap` and follows a subcommand pattern:
//! - `fetch` - Run the full pipeline against the upstream catalogs
//! - `merge` - Merge two local subtitle files into one bilingual SRT
//! - `detect-encoding` - Diagnose encoding and language of subtitle files
//! - `generate-completion` - Shell completion script generation
//!
//! # Examples
//!
//! ```bash
//! # Fetch and merge subtitles for a movie
//! dualsub fetch --content-id tt0111161 --main en --translation de
//!
//! # Merge two local files
//! dualsub merge --main-file film.en.srt --translation-file film.de.srt
//!
//! # Diagnose a file's encoding
//! dualsub detect-encoding --language el weird.srt
//! ```

mod detect_encoding_args;
mod fetch_args;
mod generate_completion_args;
mod merge_args;
pub mod ui;

use clap::{CommandFactory, Parser, Subcommand};
pub use detect_encoding_args::DetectEncodingArgs;
pub use fetch_args::FetchArgs;
pub use generate_completion_args::GenerateCompletionArgs;
pub use merge_args::MergeArgs;
use std::path::PathBuf;

/// Main CLI application structure defining the top-level interface.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(about = "Dual-language subtitle fetching and merging")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the DualSub CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch subtitles from upstream catalogs and produce merged artifacts
    Fetch(FetchArgs),

    /// Merge two local subtitle files into one bilingual SRT
    Merge(MergeArgs),

    /// Detect and report character encoding of subtitle files
    DetectEncoding(DetectEncodingArgs),

    /// Generate shell completion scripts
    GenerateCompletion(GenerateCompletionArgs),
}

/// Executes the DualSub CLI with parsed arguments.
///
/// Routes the selected subcommand to its handler; errors propagate to
/// `main` for exit-code mapping.
pub async fn run() -> crate::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => crate::commands::fetch_command::execute(args, cli.config).await,
        Commands::Merge(args) => crate::commands::merge_command::execute(args).await,
        Commands::DetectEncoding(args) => {
            crate::commands::detect_encoding_command::execute(args).await
        }
        Commands::GenerateCompletion(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "dualsub",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
