//! Configuration for every component: workspace layout, API endpoint, and credential.
//!
//! A [`Config`] is built from defaults, optionally overlaid with a TOML file
//! ([`FileConfig`]) and the `CIVITAI_API_KEY` environment variable, then passed
//! by reference to each component at construction.
//!
//! Relative paths are resolved against [`Config::workspace`].

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Default remote API host.
pub const DEFAULT_API_BASE_URL: &str = "https://civitai.com";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "CIVITAI_API_KEY";

/// Upper bound for `resolve_concurrency`.
pub const MAX_RESOLVE_CONCURRENCY: usize = 16;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A recognized key carries a value outside its allowed range.
    #[error("invalid config value for `{key}`: {reason}")]
    Invalid {
        /// The offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// One of the three fixed download categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Full base-model weights.
    Checkpoints,
    /// Supplementary adapter weights.
    Loras,
    /// Everything else.
    Others,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 3] = [Self::Checkpoints, Self::Loras, Self::Others];

    /// Stable lowercase name used for default file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkpoints => "checkpoints",
            Self::Loras => "loras",
            Self::Others => "others",
        }
    }

    /// Capitalized label for menus.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Checkpoints => "Checkpoints",
            Self::Loras => "Loras",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}' (expected checkpoints, loras, others)"))
    }
}

/// Pending list, destination folder, and downloaded log for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Which category this target serves.
    pub category: Category,
    /// Newline-delimited URL list consumed by the downloader.
    pub list: PathBuf,
    /// Folder downloaded files are written to.
    pub folder: PathBuf,
    /// Log of URLs already downloaded.
    pub log: PathBuf,
}

/// Fully resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// Root directory for all flat files and category folders.
    pub workspace: PathBuf,
    /// Remote API host, without trailing slash.
    pub api_base_url: String,
    /// Bearer credential for the download endpoint.
    pub api_key: Option<String>,
    /// Input list of model page URLs.
    pub pending_file: PathBuf,
    /// Log of page URLs already resolved.
    pub processed_log: PathBuf,
    /// Pipe-delimited log of failed downloads.
    pub failure_log: PathBuf,
    /// Resolver output for model types outside checkpoints/loras.
    pub unknown_list: PathBuf,
    /// Destination root for organized files.
    pub organize_root: PathBuf,
    /// Parent folder of duplicate audit targets.
    pub audit_folder_root: PathBuf,
    /// Reverse lookup output: model page URLs.
    pub lookup_found_list: PathBuf,
    /// Reverse lookup output: files whose hash was not found.
    pub lookup_not_found_list: PathBuf,
    /// Bounded worker count for URL resolution.
    pub resolve_concurrency: usize,
    targets: BTreeMap<Category, DownloadTarget>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace", &self.workspace)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("pending_file", &self.pending_file)
            .field("processed_log", &self.processed_log)
            .field("resolve_concurrency", &self.resolve_concurrency)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Builds the default layout rooted at `workspace`.
    #[must_use]
    pub fn with_workspace(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        let targets = Category::ALL
            .into_iter()
            .map(|category| {
                let name = category.as_str();
                let target = DownloadTarget {
                    category,
                    list: workspace.join(format!("{name}.txt")),
                    folder: workspace.join(name),
                    log: workspace.join(format!("{name}_downloaded.log")),
                };
                (category, target)
            })
            .collect();

        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            pending_file: workspace.join("urls.txt"),
            processed_log: workspace.join("processed_urls.log"),
            failure_log: workspace.join("failed_downloads.txt"),
            unknown_list: workspace.join("none.txt"),
            organize_root: workspace.join("checkpoints"),
            audit_folder_root: workspace.join("loras"),
            lookup_found_list: workspace.join("loras_download.txt"),
            lookup_not_found_list: workspace.join("loras_hash_not_found.txt"),
            resolve_concurrency: 1,
            targets,
            workspace,
        }
    }

    /// Returns the download target for a category.
    #[must_use]
    pub fn target(&self, category: Category) -> &DownloadTarget {
        // Every category is inserted by `with_workspace` and never removed.
        &self.targets[&category]
    }

    /// Overlays values from a parsed config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn apply_file(mut self, file: FileConfig) -> Result<Self, ConfigError> {
        if let Some(workspace) = file.workspace {
            // Rebuild defaults under the new root, then apply the remaining keys.
            let api_key = self.api_key.take();
            let api_base_url = std::mem::take(&mut self.api_base_url);
            self = Self::with_workspace(workspace);
            self.api_key = api_key;
            self.api_base_url = api_base_url;
        }

        if let Some(base) = file.api_base_url {
            let trimmed = base.trim().trim_end_matches('/').to_string();
            if url::Url::parse(&trimmed).is_err() {
                return Err(ConfigError::Invalid {
                    key: "api_base_url",
                    reason: format!("'{base}' is not an absolute URL"),
                });
            }
            self.api_base_url = trimmed;
        }
        if let Some(key) = file.api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(concurrency) = file.resolve_concurrency {
            if !(1..=MAX_RESOLVE_CONCURRENCY).contains(&concurrency) {
                return Err(ConfigError::Invalid {
                    key: "resolve_concurrency",
                    reason: format!("{concurrency} not in 1..={MAX_RESOLVE_CONCURRENCY}"),
                });
            }
            self.resolve_concurrency = concurrency;
        }

        let ws = self.workspace.clone();
        let join = |p: PathBuf| if p.is_absolute() { p } else { ws.join(p) };
        if let Some(p) = file.pending_file {
            self.pending_file = join(p);
        }
        if let Some(p) = file.processed_log {
            self.processed_log = join(p);
        }
        if let Some(p) = file.failure_log {
            self.failure_log = join(p);
        }
        if let Some(p) = file.unknown_list {
            self.unknown_list = join(p);
        }
        if let Some(p) = file.organize_root {
            self.organize_root = join(p);
        }
        if let Some(p) = file.audit_folder_root {
            self.audit_folder_root = join(p);
        }
        if let Some(p) = file.lookup_found_list {
            self.lookup_found_list = join(p);
        }
        if let Some(p) = file.lookup_not_found_list {
            self.lookup_not_found_list = join(p);
        }

        for (category, paths) in file.categories {
            let target = self
                .targets
                .get_mut(&category)
                .ok_or(ConfigError::Invalid {
                    key: "categories",
                    reason: format!("unknown category {category}"),
                })?;
            if let Some(p) = paths.list {
                target.list = join(p);
            }
            if let Some(p) = paths.folder {
                target.folder = join(p);
            }
            if let Some(p) = paths.log {
                target.log = join(p);
            }
        }

        Ok(self)
    }

    /// Applies the `CIVITAI_API_KEY` environment override, if set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env::var(API_KEY_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            debug!("using API key from environment");
            self.api_key = Some(key);
        }
        self
    }
}

/// TOML-backed configuration file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Root directory for flat files and category folders.
    pub workspace: Option<PathBuf>,
    /// Remote API host.
    pub api_base_url: Option<String>,
    /// Download bearer credential.
    pub api_key: Option<String>,
    /// Pending URL list.
    pub pending_file: Option<PathBuf>,
    /// Processed URL log.
    pub processed_log: Option<PathBuf>,
    /// Failure log.
    pub failure_log: Option<PathBuf>,
    /// Resolver output for unknown types.
    pub unknown_list: Option<PathBuf>,
    /// Organizer destination root.
    pub organize_root: Option<PathBuf>,
    /// Audit target parent folder.
    pub audit_folder_root: Option<PathBuf>,
    /// Reverse lookup found list.
    pub lookup_found_list: Option<PathBuf>,
    /// Reverse lookup not-found list.
    pub lookup_not_found_list: Option<PathBuf>,
    /// Resolution worker count.
    pub resolve_concurrency: Option<usize>,
    /// Per-category path overrides.
    #[serde(default)]
    pub categories: BTreeMap<Category, FileCategory>,
}

/// Per-category overrides inside `[categories.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileCategory {
    /// Pending URL list.
    pub list: Option<PathBuf>,
    /// Destination folder.
    pub folder: Option<PathBuf>,
    /// Downloaded log.
    pub log: Option<PathBuf>,
}

impl FileConfig {
    /// Parses a config file body.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid for this schema.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/civitai-toolkit/config.toml`
/// 2. `$HOME/.config/civitai-toolkit/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("civitai-toolkit")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("civitai-toolkit")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads configuration from `explicit` or the default location.
///
/// An explicit path must exist; a missing default file yields pure defaults
/// rooted at the current directory.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let base = Config::with_workspace(".");

    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_default_config_path().filter(|p| p.exists()),
    };

    let config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            base.apply_file(FileConfig::parse(&raw, &path)?)?
        }
        None => base,
    };

    Ok(config.with_env_overrides())
}
