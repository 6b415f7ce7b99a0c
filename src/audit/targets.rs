//! Predefined audit targets laid out under the workspace.

use std::path::PathBuf;

use crate::config::Config;

/// Base-model folders audited by default, in menu order.
pub const PREDEFINED_TARGETS: [&str; 6] = ["flux", "illustrious", "pony", "sd.15", "sd_1.4", "sdxl"];

/// A log/folder pair to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    /// Display name.
    pub name: String,
    /// Log of known filenames.
    pub log: PathBuf,
    /// Folder to check.
    pub folder: PathBuf,
}

impl AuditTarget {
    /// Target `name` with log `<workspace>/<name>.txt` and folder
    /// `<audit_folder_root>/<name>`.
    #[must_use]
    pub fn predefined(config: &Config, name: &str) -> Self {
        Self {
            name: name.to_string(),
            log: config.workspace.join(format!("{name}.txt")),
            folder: config.audit_folder_root.join(name),
        }
    }

    /// A user-supplied pair. Surrounding double quotes and whitespace are
    /// stripped from both paths, as left by drag-and-drop into a terminal.
    #[must_use]
    pub fn custom(log: &str, folder: &str) -> Self {
        Self {
            name: "custom".to_string(),
            log: PathBuf::from(strip_quotes(log)),
            folder: PathBuf::from(strip_quotes(folder)),
        }
    }
}

/// Every predefined target in menu order.
#[must_use]
pub fn predefined_targets(config: &Config) -> Vec<AuditTarget> {
    PREDEFINED_TARGETS
        .iter()
        .map(|name| AuditTarget::predefined(config, name))
        .collect()
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}
