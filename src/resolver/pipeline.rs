//! Drains the pending URL list into per-type download lists.

use std::collections::HashSet;
use std::path::PathBuf;

use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::{ModelType, ResolvedDownload, UrlResolver};
use crate::config::Config;
use crate::store::{self, ProcessedStore, StoreError};

/// Output list per model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLists {
    /// Receives checkpoint download URLs.
    pub checkpoint: PathBuf,
    /// Receives LoRA download URLs.
    pub lora: PathBuf,
    /// Receives everything else.
    pub unknown: PathBuf,
}

impl OutputLists {
    /// Output lists as laid out by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        use crate::config::Category;
        Self {
            checkpoint: config.target(Category::Checkpoints).list.clone(),
            lora: config.target(Category::Loras).list.clone(),
            unknown: config.unknown_list.clone(),
        }
    }

    /// The list a model type is routed to.
    #[must_use]
    pub fn for_type(&self, model_type: ModelType) -> &PathBuf {
        match model_type {
            ModelType::Checkpoint => &self.checkpoint,
            ModelType::Lora => &self.lora,
            ModelType::Unknown => &self.unknown,
        }
    }
}

/// Counts from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// URLs resolved and routed this run.
    pub resolved: usize,
    /// URLs skipped because they were already processed.
    pub skipped: usize,
    /// URLs that failed and stay pending.
    pub failed: usize,
    /// Size of the rewritten pending list.
    pub remaining: usize,
    /// Resolved URLs routed to the checkpoint list.
    pub checkpoints: usize,
    /// Resolved URLs routed to the LoRA list.
    pub loras: usize,
    /// Resolved URLs routed to the unknown list.
    pub unknown: usize,
}

/// Resolves every pending URL and routes results to [`OutputLists`].
///
/// Remote calls may overlap up to `concurrency`, but results are applied to
/// the output lists and the processed store strictly in pending-list order
/// from a single task.
#[derive(Debug)]
pub struct ResolutionPipeline {
    resolver: UrlResolver,
    pending: PathBuf,
    outputs: OutputLists,
    concurrency: usize,
    show_progress: bool,
}

impl ResolutionPipeline {
    /// Creates a pipeline reading `pending` and writing `outputs`.
    #[must_use]
    pub fn new(resolver: UrlResolver, pending: impl Into<PathBuf>, outputs: OutputLists) -> Self {
        Self {
            resolver,
            pending: pending.into(),
            outputs,
            concurrency: 1,
            show_progress: false,
        }
    }

    /// Sets the maximum number of in-flight resolutions (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Enables the terminal progress bar.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs the pipeline once.
    ///
    /// URLs already in `processed`, or repeated earlier in the same list, are
    /// dropped without a remote call. Failed URLs are written back to the
    /// pending list; everything else is removed from it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the pending list is missing or any list or
    /// the processed store cannot be written. Resolution failures are not
    /// errors; they are counted and retained.
    pub async fn run(
        &self,
        processed: &mut dyn ProcessedStore,
    ) -> Result<ResolutionSummary, StoreError> {
        let urls = store::read_urls(&self.pending)?;
        info!(count = urls.len(), pending = %self.pending.display(), "resolving URLs");

        let mut summary = ResolutionSummary::default();
        let mut seen = HashSet::new();
        let mut to_resolve = Vec::new();
        for url in urls {
            if processed.contains(&url) || !seen.insert(url.clone()) {
                info!(%url, "skipping already processed URL");
                summary.skipped += 1;
            } else {
                to_resolve.push(url);
            }
        }

        let progress = self.progress_bar(to_resolve.len());
        let resolver = &self.resolver;
        let mut results = stream::iter(to_resolve)
            .map(move |url| async move {
                let result = resolver.resolve(&url).await;
                (url, result)
            })
            .buffered(self.concurrency);

        let mut remaining = Vec::new();
        while let Some((url, result)) = results.next().await {
            progress.set_message(truncate_for_display(&url));
            match result {
                Ok(resolved) => {
                    self.route(&resolved, processed)?;
                    summary.resolved += 1;
                    match resolved.model_type {
                        ModelType::Checkpoint => summary.checkpoints += 1,
                        ModelType::Lora => summary.loras += 1,
                        ModelType::Unknown => summary.unknown += 1,
                    }
                }
                Err(error) => {
                    warn!(%url, kind = ?error.kind(), error = %error, "resolution failed; keeping URL pending");
                    summary.failed += 1;
                    remaining.push(url);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        processed.flush()?;
        store::write_urls(&self.pending, &remaining)?;
        summary.remaining = remaining.len();

        info!(
            resolved = summary.resolved,
            skipped = summary.skipped,
            failed = summary.failed,
            remaining = summary.remaining,
            "resolution complete"
        );
        Ok(summary)
    }

    fn route(
        &self,
        resolved: &ResolvedDownload,
        processed: &mut dyn ProcessedStore,
    ) -> Result<(), StoreError> {
        let target = self.outputs.for_type(resolved.model_type);
        store::append_url(target, &resolved.download_url)?;
        // The origin URL, not the download URL, gates future runs.
        processed.add(&resolved.origin_url)?;
        Ok(())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

fn truncate_for_display(url: &str) -> String {
    const MAX: usize = 30;
    if url.chars().count() <= MAX {
        url.to_string()
    } else {
        let head: String = url.chars().take(MAX).collect();
        format!("{head}...")
    }
}
