//! Lookup command handler: local files back to model page URLs.

use std::path::Path;

use anyhow::{Context, Result};
use civitai_core::{Config, Prompter, ReverseLookup};

use super::{api_client, choose_folder};

pub async fn run_lookup_command(
    config: &Config,
    folder: Option<&Path>,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let Some(folder) = choose_folder(folder, &config.workspace, prompter)? else {
        return Ok(());
    };

    let lookup = ReverseLookup::new(
        api_client(config)?,
        &config.lookup_found_list,
        &config.lookup_not_found_list,
    );
    let summary = lookup
        .run(&folder)
        .await
        .with_context(|| format!("failed to look up {}", folder.display()))?;

    println!(
        "Scanned {} file(s). URLs saved to {} ({} found).",
        summary.scanned,
        config.lookup_found_list.display(),
        summary.found
    );
    println!(
        "Files not found saved to {} ({}).",
        config.lookup_not_found_list.display(),
        summary.not_found
    );
    Ok(())
}
