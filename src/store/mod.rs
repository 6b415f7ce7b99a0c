//! Flat-file persistence: processed sets, URL lists, and the failure log.
//!
//! Every persisted collection is a newline-delimited text file. There is no
//! schema versioning and no transactional update.

mod error;
mod failure_log;
mod processed;
pub mod url_list;

pub use error::StoreError;
pub use failure_log::FailureLog;
pub use processed::{AppendLog, ProcessedStore};
pub use url_list::{append_url, read_urls, remove_url, write_urls};
