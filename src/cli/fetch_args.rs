use clap::Args;

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Content id understood by the catalogs (e.g. tt0111161)
    #[arg(long)]
    pub content_id: String,

    /// Season number for series content
    #[arg(long, requires = "episode")]
    pub season: Option<u32>,

    /// Episode number for series content
    #[arg(long, requires = "season")]
    pub episode: Option<u32>,

    /// Main language tag (overrides configuration)
    #[arg(long)]
    pub main: Option<String>,

    /// Translation language tag (overrides configuration)
    #[arg(long)]
    pub translation: Option<String>,
}
