//! Extract command handler: pending page URLs to per-type download lists.

use anyhow::{Context, Result};
use civitai_core::{AppendLog, Config, OutputLists, ResolutionPipeline, UrlResolver};

use super::api_client;

pub async fn run_extract_command(config: &Config, show_progress: bool) -> Result<()> {
    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_client(config)?),
        &config.pending_file,
        OutputLists::from_config(config),
    )
    .with_concurrency(config.resolve_concurrency)
    .with_progress(show_progress);

    let mut processed = AppendLog::open(&config.processed_log)
        .with_context(|| format!("failed to open {}", config.processed_log.display()))?;
    let summary = pipeline
        .run(&mut processed)
        .await
        .with_context(|| format!("failed to process {}", config.pending_file.display()))?;

    println!(
        "Resolved {} URL(s): {} checkpoint, {} LoRA, {} other.",
        summary.resolved, summary.checkpoints, summary.loras, summary.unknown
    );
    if summary.skipped > 0 {
        println!("Skipped {} already processed URL(s).", summary.skipped);
    }
    if summary.failed > 0 {
        println!(
            "{} URL(s) failed and remain in {}.",
            summary.failed,
            config.pending_file.display()
        );
    }
    Ok(())
}
