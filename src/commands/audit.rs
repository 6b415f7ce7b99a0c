//! Audit command handler: duplicate detection and confirmed deletion.

use anyhow::{Result, bail};
use civitai_core::audit::{AuditTarget, PREDEFINED_TARGETS, predefined_targets};
use civitai_core::{Config, Prompter, audit, delete_duplicates};

use crate::cli::AuditArgs;

const ALL_TARGETS: &str = "all";
const CUSTOM_TARGET: &str = "custom";

pub fn run_audit_command(
    config: &Config,
    args: &AuditArgs,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let targets = match (&args.target, &args.log, &args.folder) {
        (Some(name), _, _) => named_targets(config, name)?,
        (None, Some(log), Some(folder)) => vec![AuditTarget {
            name: CUSTOM_TARGET.to_string(),
            log: log.clone(),
            folder: folder.clone(),
        }],
        _ => menu_targets(config, prompter)?,
    };

    for target in &targets {
        audit_target(target, prompter)?;
    }
    Ok(())
}

fn named_targets(config: &Config, name: &str) -> Result<Vec<AuditTarget>> {
    if name.eq_ignore_ascii_case(ALL_TARGETS) {
        return Ok(predefined_targets(config));
    }
    match PREDEFINED_TARGETS.iter().find(|t| t.eq_ignore_ascii_case(name)) {
        Some(target) => Ok(vec![AuditTarget::predefined(config, target)]),
        None => bail!(
            "unknown audit target '{name}' (expected one of {}, {ALL_TARGETS})",
            PREDEFINED_TARGETS.join(", ")
        ),
    }
}

fn menu_targets(config: &Config, prompter: &mut dyn Prompter) -> Result<Vec<AuditTarget>> {
    let options: Vec<String> = PREDEFINED_TARGETS
        .iter()
        .chain([ALL_TARGETS, CUSTOM_TARGET].iter())
        .map(ToString::to_string)
        .collect();
    let choice = prompter.select("Select option", &options)?;

    Ok(match PREDEFINED_TARGETS.get(choice) {
        Some(name) => vec![AuditTarget::predefined(config, name)],
        None if choice == PREDEFINED_TARGETS.len() => predefined_targets(config),
        None => {
            let log = prompter.input("Enter the path to your log file")?;
            let folder = prompter.input("Enter the path to the folder to check")?;
            vec![AuditTarget::custom(&log, &folder)]
        }
    })
}

/// Audits one target. Missing or unreadable inputs are reported and skipped.
fn audit_target(target: &AuditTarget, prompter: &mut dyn Prompter) -> Result<()> {
    println!("\nProcessing {}...", target.name.to_uppercase());
    println!("{}", "-".repeat(30));

    let report = match audit(&target.log, &target.folder) {
        Ok(report) => report,
        Err(error) => {
            println!("Error: {error}");
            return Ok(());
        }
    };

    if report.is_empty() {
        println!("No duplicates found.");
        return Ok(());
    }

    println!("Found duplicate files:");
    for (i, path) in report.paths.iter().enumerate() {
        println!("{}. {}", i + 1, path.display());
    }
    println!("Total duplicates found: {}", report.duplicates.len());

    if !prompter.confirm("Do you want to delete these duplicate files?")? {
        println!("No files were deleted.");
        return Ok(());
    }
    if !prompter.confirm("Are you sure? This cannot be undone!")? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let deletion = delete_duplicates(&report.paths);
    for path in &deletion.deleted {
        println!("Deleted: {}", path.display());
    }
    for failure in &deletion.failures {
        println!("Error deleting {}: {}", failure.path.display(), failure.error);
    }
    println!("Successfully deleted {} file(s).", deletion.deleted.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civitai_core::prompt::{ScriptedAnswer, ScriptedPrompter};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn seed_pony(workspace: &Path) -> std::path::PathBuf {
        let folder = workspace.join("loras/pony");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("dup.safetensors"), b"d").unwrap();
        fs::write(folder.join("keep.safetensors"), b"k").unwrap();
        fs::write(workspace.join("pony.txt"), "old/dup.safetensors\n").unwrap();
        folder
    }

    fn no_args() -> AuditArgs {
        AuditArgs {
            target: None,
            log: None,
            folder: None,
        }
    }

    #[test]
    fn test_double_confirmation_deletes() {
        let dir = TempDir::new().unwrap();
        let folder = seed_pony(dir.path());
        let config = Config::with_workspace(dir.path());
        let mut prompter = ScriptedPrompter::new([
            ScriptedAnswer::Select(2),
            ScriptedAnswer::Confirm(true),
            ScriptedAnswer::Confirm(true),
        ]);

        run_audit_command(&config, &no_args(), &mut prompter).unwrap();

        assert!(!folder.join("dup.safetensors").exists());
        assert!(folder.join("keep.safetensors").exists());
    }

    #[test]
    fn test_second_confirmation_declined_keeps_files() {
        let dir = TempDir::new().unwrap();
        let folder = seed_pony(dir.path());
        let config = Config::with_workspace(dir.path());
        let mut prompter = ScriptedPrompter::new([
            ScriptedAnswer::Confirm(true),
            ScriptedAnswer::Confirm(false),
        ]);
        let args = AuditArgs {
            target: Some("pony".to_string()),
            ..no_args()
        };

        run_audit_command(&config, &args, &mut prompter).unwrap();

        assert!(folder.join("dup.safetensors").exists());
        assert_eq!(prompter.asked().len(), 2);
    }

    #[test]
    fn test_all_continues_past_missing_targets() {
        let dir = TempDir::new().unwrap();
        let folder = seed_pony(dir.path());
        let config = Config::with_workspace(dir.path());
        let mut prompter = ScriptedPrompter::new([
            ScriptedAnswer::Select(PREDEFINED_TARGETS.len()),
            ScriptedAnswer::Confirm(false),
        ]);

        run_audit_command(&config, &no_args(), &mut prompter).unwrap();

        assert!(folder.join("dup.safetensors").exists());
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_custom_menu_entry_prompts_for_paths() {
        let dir = TempDir::new().unwrap();
        let folder = seed_pony(dir.path());
        let config = Config::with_workspace(dir.path());
        let mut prompter = ScriptedPrompter::new([
            ScriptedAnswer::Select(PREDEFINED_TARGETS.len() + 1),
            ScriptedAnswer::Input(format!("\"{}\"", dir.path().join("pony.txt").display())),
            ScriptedAnswer::Input(folder.display().to_string()),
            ScriptedAnswer::Confirm(false),
        ]);

        run_audit_command(&config, &no_args(), &mut prompter).unwrap();

        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_unknown_target_is_error() {
        let dir = TempDir::new().unwrap();
        let config = Config::with_workspace(dir.path());
        let args = AuditArgs {
            target: Some("sd3".to_string()),
            ..no_args()
        };
        let mut prompter = ScriptedPrompter::default();
        assert!(run_audit_command(&config, &args, &mut prompter).is_err());
    }
}
