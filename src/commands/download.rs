//! Download command handler: drains category lists.

use std::iter;

use anyhow::{Context, Result};
use civitai_core::{
    Category, Config, DownloadClient, DownloadRunner, DownloadTarget, Downloader, FailureLog,
    Prompter, StoreError,
};

pub async fn run_download_command(
    config: &Config,
    category: Option<Category>,
    prompter: &mut dyn Prompter,
    show_progress: bool,
) -> Result<()> {
    let client = DownloadClient::new(config.api_key.clone())
        .context("failed to build download client")?
        .with_progress(show_progress);
    let runner = DownloadRunner::new(Downloader::new(
        client,
        FailureLog::new(&config.failure_log),
    ));

    if let Some(category) = category {
        return run_category(&runner, config.target(category), false).await;
    }

    let options: Vec<String> = Category::ALL
        .iter()
        .map(|c| c.label().to_string())
        .chain(iter::once("Exit".to_string()))
        .collect();
    loop {
        let choice = prompter.select("Select a category to download", &options)?;
        let Some(&category) = Category::ALL.get(choice) else {
            println!("Exiting.");
            return Ok(());
        };
        run_category(&runner, config.target(category), true).await?;
    }
}

/// Runs one category. From the menu, a missing list is reported and the menu
/// continues.
async fn run_category(
    runner: &DownloadRunner,
    target: &DownloadTarget,
    from_menu: bool,
) -> Result<()> {
    match runner.process_category(target).await {
        Ok(summary) => {
            println!(
                "{}: downloaded {}, failed {}, skipped {} of {}.",
                target.category.label(),
                summary.downloaded,
                summary.failed,
                summary.skipped,
                summary.total
            );
            Ok(())
        }
        Err(StoreError::Missing { path }) if from_menu => {
            println!("{} not found.", path.display());
            Ok(())
        }
        Err(error) => {
            Err(error).with_context(|| format!("failed to download {}", target.category))
        }
    }
}
