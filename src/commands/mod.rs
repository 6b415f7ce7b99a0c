//! CLI command handlers.

mod audit;
mod download;
mod extract;
mod lookup;
mod organize;

pub use audit::run_audit_command;
pub use download::run_download_command;
pub use extract::run_extract_command;
pub use lookup::run_lookup_command;
pub use organize::run_organize_command;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use civitai_core::{CivitaiClient, Config, ModelApi, Prompter};

fn api_client(config: &Config) -> Result<Arc<dyn ModelApi>> {
    let client = CivitaiClient::new(&config.api_base_url).context("failed to build API client")?;
    Ok(Arc::new(client))
}

/// Returns `explicit`, or asks for a custom path or the workspace.
///
/// `None` means the choice was invalid; the caller exits after the message.
fn choose_folder(
    explicit: Option<&Path>,
    workspace: &Path,
    prompter: &mut dyn Prompter,
) -> Result<Option<PathBuf>> {
    let folder = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let options = [
                "Provide a custom folder path".to_string(),
                "Use workspace directory".to_string(),
            ];
            match prompter.select("Select an option", &options)? {
                0 => PathBuf::from(prompter.input("Enter the folder path")?.trim().trim_matches('"')),
                _ => workspace.to_path_buf(),
            }
        }
    };

    if folder.is_dir() {
        Ok(Some(folder))
    } else {
        println!("Not a folder: {}. Exiting.", folder.display());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civitai_core::prompt::{ScriptedAnswer, ScriptedPrompter};
    use tempfile::TempDir;

    #[test]
    fn test_choose_folder_explicit_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::default();
        let chosen = choose_folder(Some(dir.path()), Path::new("/ws"), &mut prompter).unwrap();
        assert_eq!(chosen, Some(dir.path().to_path_buf()));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_choose_folder_custom_path_strips_quotes() {
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::new([
            ScriptedAnswer::Select(0),
            ScriptedAnswer::Input(format!("\"{}\"", dir.path().display())),
        ]);
        let chosen = choose_folder(None, Path::new("/ws"), &mut prompter).unwrap();
        assert_eq!(chosen, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_choose_folder_workspace() {
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::new([ScriptedAnswer::Select(1)]);
        let chosen = choose_folder(None, dir.path(), &mut prompter).unwrap();
        assert_eq!(chosen, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_choose_folder_invalid_path_is_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let mut prompter = ScriptedPrompter::default();
        let chosen = choose_folder(Some(&missing), dir.path(), &mut prompter).unwrap();
        assert_eq!(chosen, None);
    }
}
