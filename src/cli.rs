//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use civitai_core::Category;

/// Resolve, download, and organize checkpoint and LoRA files from Civitai.
///
/// Every command reads and writes flat files in the configured workspace.
/// Without an explicit choice, commands fall back to interactive menus.
#[derive(Parser, Debug)]
#[command(name = "civitai")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file (default: $XDG_CONFIG_HOME/civitai-toolkit/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Toolkit passes.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve pending model page URLs into per-type download lists
    Extract,

    /// Download every URL in a category list
    Download(DownloadArgs),

    /// Sort .safetensors files into base-model folders by content hash
    Organize(FolderArgs),

    /// Recover model page URLs for local .safetensors files
    Lookup(FolderArgs),

    /// Find and optionally delete files already recorded in a log
    Audit(AuditArgs),
}

/// Arguments for `download`.
#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// Category to download (checkpoints, loras, others); omit for the menu
    #[arg(long)]
    pub category: Option<Category>,
}

/// Arguments for folder-scanning commands.
#[derive(ClapArgs, Debug)]
pub struct FolderArgs {
    /// Folder to scan; omit to choose interactively
    #[arg(long, value_name = "PATH")]
    pub folder: Option<PathBuf>,
}

/// Arguments for `audit`.
#[derive(ClapArgs, Debug)]
pub struct AuditArgs {
    /// Predefined target (flux, illustrious, pony, sd.15, sd_1.4, sdxl) or `all`
    #[arg(long, conflicts_with_all = ["log", "folder"])]
    pub target: Option<String>,

    /// Log of known filenames (requires --folder)
    #[arg(long, value_name = "PATH", requires = "folder")]
    pub log: Option<PathBuf>,

    /// Folder to check (requires --log)
    #[arg(long, value_name = "PATH", requires = "log")]
    pub folder: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_extract_parses() {
        let args = Args::try_parse_from(["civitai", "extract"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.no_progress);
        assert!(matches!(args.command, Command::Extract));
    }

    #[test]
    fn test_cli_subcommand_required() {
        let result = Args::try_parse_from(["civitai"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["civitai", "-v", "extract"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["civitai", "-vv", "extract"]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["civitai", "extract", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["civitai", "-q", "extract"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["civitai", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["civitai", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["civitai", "--invalid-flag", "extract"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_config_and_no_progress() {
        let args =
            Args::try_parse_from(["civitai", "--config", "/tmp/c.toml", "--no-progress", "extract"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(args.no_progress);
    }

    #[test]
    fn test_cli_download_category() {
        let args = Args::try_parse_from(["civitai", "download", "--category", "LoRAs"]).unwrap();
        match args.command {
            Command::Download(download) => assert_eq!(download.category, Some(Category::Loras)),
            other => panic!("expected download, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_download_unknown_category_rejected() {
        let result = Args::try_parse_from(["civitai", "download", "--category", "vae"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_organize_folder() {
        let args = Args::try_parse_from(["civitai", "organize", "--folder", "/models"]).unwrap();
        match args.command {
            Command::Organize(folder) => assert_eq!(folder.folder, Some(PathBuf::from("/models"))),
            other => panic!("expected organize, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_audit_custom_pair() {
        let args =
            Args::try_parse_from(["civitai", "audit", "--log", "a.txt", "--folder", "loras/a"])
                .unwrap();
        match args.command {
            Command::Audit(audit) => {
                assert_eq!(audit.log, Some(PathBuf::from("a.txt")));
                assert_eq!(audit.folder, Some(PathBuf::from("loras/a")));
                assert!(audit.target.is_none());
            }
            other => panic!("expected audit, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_audit_log_requires_folder() {
        let result = Args::try_parse_from(["civitai", "audit", "--log", "a.txt"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_audit_target_conflicts_with_log() {
        let result = Args::try_parse_from([
            "civitai", "audit", "--target", "pony", "--log", "a.txt", "--folder", "b",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
