//! Input size limits shared by the exporter and the CLI.

/// Maximum size of a single input asset read into memory.
pub const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Returns `Err(len)` when `len` exceeds `max_bytes`.
pub fn check_size(len: u64, max_bytes: u64) -> Result<(), u64> {
    if len > max_bytes {
        Err(len)
    } else {
        Ok(())
    }
}
