//! Constants shared by several modules.

/// Crate version, `git describe --tags` when available (see `build.rs`),
/// falling back to `CARGO_PKG_VERSION` otherwise.
pub const VERSION: &str = include_str!(concat!(env!("OUT_DIR"), "/version"));

/// Milliseconds between consecutive blocks.
pub const BLOCK_INTERVAL_MS: u32 = 500;

/// Epoch (in milliseconds since the Unix epoch) that `block_timestamp` slots
/// are counted from: `2000-01-01T00:00:00.000`.
pub const BLOCK_TIMESTAMP_EPOCH: u64 = 946_684_800_000;

/// Default cap on the recursion depth of ABI type resolution and of the
/// composite (de)serializers. Bounds stack usage against adversarially
/// nested schemas or payloads.
pub const DEFAULT_RECURSION_LIMIT: u32 = 32;
