//! `fetch`: run the full pipeline against the upstream catalogs.

use crate::Result;
use crate::cli::FetchArgs;
use crate::cli::ui::{print_success, print_warning};
use crate::config::{Settings, default_config_path};
use crate::core::language::LanguageTag;
use crate::error::DualSubError;
use crate::services::catalog::ContentRef;
use crate::services::pipeline::{MergePipeline, PipelineRequest};
use crate::services::storage::{ArtifactStore, LocalDirStore};
use std::path::PathBuf;

/// Execute the fetch command.
pub async fn execute(args: FetchArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load_from(config_path.or_else(default_config_path))?;

    let main = LanguageTag::new(
        args.main
            .as_deref()
            .unwrap_or(&settings.languages.main_language),
    );
    let translation = LanguageTag::new(
        args.translation
            .as_deref()
            .unwrap_or(&settings.languages.translation_language),
    );
    let content = match (args.season, args.episode) {
        (Some(season), Some(episode)) => ContentRef::episode(&args.content_id, season, episode),
        _ => ContentRef::movie(&args.content_id),
    };

    let store = build_store(&settings)?;
    let pipeline = MergePipeline::from_settings(&settings)?;
    let request = PipelineRequest {
        content,
        main,
        translation,
    };

    log::info!(
        "fetching {} as {}+{}",
        request.content,
        request.main,
        request.translation
    );
    let outcome = pipeline.run(&request).await;

    if let Some(failure) = outcome.failure {
        return Err(failure);
    }
    if outcome.artifacts.is_empty() {
        print_warning("no translation candidate produced a merged subtitle");
        return Ok(());
    }

    for artifact in &outcome.artifacts {
        let url = store.store(&artifact.file_name, &artifact.content).await?;
        print_success(&format!("{} [{}] -> {url}", artifact.file_name, artifact.label));
    }
    Ok(())
}

/// Only the local backend ships with the CLI; remote blob and object
/// stores are wired in by the deployment behind the same trait.
fn build_store(settings: &Settings) -> Result<Box<dyn ArtifactStore>> {
    match settings.storage.destination.as_str() {
        "local" => Ok(Box::new(LocalDirStore::new(
            &settings.storage.output_dir,
            &settings.storage.base_url,
        ))),
        other => Err(DualSubError::config(format!(
            "storage destination '{other}' is not available in the CLI; use 'local'"
        ))),
    }
}
