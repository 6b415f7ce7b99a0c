//! Constants for the download module.

/// Connect timeout for download requests (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Per-read idle timeout for download bodies (5 minutes). Applied between
/// chunks, not to the whole transfer, so multi-gigabyte files are not cut off.
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Filename used when neither headers nor URL yield a usable name.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// Upper bound on `name(N).ext` probes before giving up on a folder.
pub const MAX_COLLISION_SUFFIX: usize = 10_000;
