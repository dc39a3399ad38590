use clap::Args;
use clap_complete::Shell;

/// Arguments for the `generate-completion` subcommand.
#[derive(Args, Debug)]
pub struct GenerateCompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
