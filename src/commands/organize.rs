//! Organize command handler.

use std::path::Path;

use anyhow::{Context, Result};
use civitai_core::{Config, Organizer, Prompter};

use super::{api_client, choose_folder};

pub async fn run_organize_command(
    config: &Config,
    folder: Option<&Path>,
    prompter: &mut dyn Prompter,
    show_progress: bool,
) -> Result<()> {
    let Some(folder) = choose_folder(folder, &config.workspace, prompter)? else {
        return Ok(());
    };

    let organizer =
        Organizer::new(api_client(config)?, &config.organize_root).with_progress(show_progress);
    let summary = organizer
        .organize_folder(&folder)
        .await
        .with_context(|| format!("failed to organize {}", folder.display()))?;

    println!(
        "Processed {} file(s): {} moved, {} unclassified, {} left in place.",
        summary.processed, summary.moved, summary.unclassified, summary.failed_moves
    );
    if summary.unreadable > 0 {
        println!("{} file(s) could not be read.", summary.unreadable);
    }
    Ok(())
}
