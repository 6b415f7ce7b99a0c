//! Classifier/Organizer: content-hash lookups for local model files.
//!
//! [`Organizer`] renames and moves files into base-model family folders;
//! [`ReverseLookup`] recovers model page URLs for files already on disk.

mod error;
mod family;
mod hashing;
mod lookup;
mod organizer;
mod scan;

pub use error::OrganizeError;
pub use family::{BaseModelBucket, UNCLASSIFIED_FOLDER};
pub use hashing::sha256_file;
pub use lookup::{LookupSummary, ReverseLookup};
pub use organizer::{ClassificationOutcome, OrganizeSummary, Organizer};
