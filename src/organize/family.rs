//! Base-model family buckets.

use std::fmt;

use crate::download::clean_filename;

/// Folder for files without a usable classification.
pub const UNCLASSIFIED_FOLDER: &str = "none";

type FamilyPredicate = fn(&str) -> bool;

/// Ordered family table. Predicates receive the lowercased base-model name;
/// the first match wins, so `sd 1.5` is checked before broader families.
const FAMILIES: &[(FamilyPredicate, &str)] = &[
    (|name: &str| name.contains("sd 1.5"), "sd.15"),
    (|name: &str| name.contains("flux"), "flux"),
    (|name: &str| name.contains("pony"), "pony"),
    (|name: &str| name.contains("sdxl"), "sdxl"),
    (|name: &str| name.contains("illustrious"), "illustrious"),
];

/// Where a classified file belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseModelBucket {
    /// One of the fixed families.
    Known(&'static str),
    /// No family matched; the lowercased base-model name is the folder.
    Inferred(String),
    /// Lookup failed or returned no base-model data.
    Unclassified,
}

impl BaseModelBucket {
    /// Buckets a base-model name from the API.
    #[must_use]
    pub fn from_base_model(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if let Some((_, label)) = FAMILIES.iter().find(|(is_match, _)| is_match(&lowered)) {
            return Self::Known(*label);
        }
        // The raw name becomes a directory, so it must be a single safe segment.
        let folder = clean_filename(&lowered);
        if folder.is_empty() || folder == "." || folder == ".." {
            Self::Unclassified
        } else {
            Self::Inferred(folder)
        }
    }

    /// Subfolder name under the organize root.
    #[must_use]
    pub fn folder_name(&self) -> &str {
        match self {
            Self::Known(label) => label,
            Self::Inferred(name) => name,
            Self::Unclassified => UNCLASSIFIED_FOLDER,
        }
    }

    /// Folders created before every organize pass.
    pub fn predefined_folders() -> impl Iterator<Item = &'static str> {
        FAMILIES
            .iter()
            .map(|(_, label)| *label)
            .chain(std::iter::once(UNCLASSIFIED_FOLDER))
    }
}

impl fmt::Display for BaseModelBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}
