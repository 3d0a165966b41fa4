//! Checksum chaining for dependency paths.
//!
//! Combines per-file checksums into a single 64-bit fingerprint for a
//! test's dependency chain. Two variants exist and are deliberately kept
//! distinct: [`chain_checksum`] is order-sensitive (concatenate, then
//! hash), while [`chain_checksum_xor`] is order-independent (hash each
//! pair, then XOR). Callers must pin whichever variant the backend they
//! talk to expects; the two never agree on multi-path input.

use std::collections::HashMap;

use xxhash_rust::xxh64::xxh64;

/// Combines the checksums of `source_paths` into one fingerprint by
/// concatenating `"path:checksum"` pairs in the given order, joining with
/// `"|"`, and hashing the result with xxh64.
///
/// Paths missing from `file_checksums` are silently skipped. Empty input
/// or no matching paths yields `0`.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use ti_client::checksum::chain_checksum;
///
/// let checksums = HashMap::from([("a.java".to_string(), 1), ("b.java".to_string(), 2)]);
/// let forward = chain_checksum(&["a.java".to_string(), "b.java".to_string()], &checksums);
/// let reverse = chain_checksum(&["b.java".to_string(), "a.java".to_string()], &checksums);
/// assert_ne!(forward, reverse);
/// ```
#[must_use]
pub fn chain_checksum(source_paths: &[String], file_checksums: &HashMap<String, u64>) -> u64 {
    let mut candidates = Vec::new();
    for path in source_paths {
        if let Some(checksum) = file_checksums.get(path) {
            candidates.push(format!("{path}:{checksum}"));
        }
    }

    if candidates.is_empty() {
        return 0;
    }

    xxh64(candidates.join("|").as_bytes(), 0)
}

/// Combines the checksums of `source_paths` by hashing each
/// `"path:checksum"` pair individually and folding the hashes together
/// with XOR, making the result independent of path order.
///
/// Paths missing from `file_checksums` are silently skipped. Empty input
/// or no matching paths yields `0`.
#[must_use]
pub fn chain_checksum_xor(source_paths: &[String], file_checksums: &HashMap<String, u64>) -> u64 {
    let mut combined = 0u64;
    let mut matched = false;
    for path in source_paths {
        if let Some(checksum) = file_checksums.get(path) {
            combined ^= xxh64(format!("{path}:{checksum}").as_bytes(), 0);
            matched = true;
        }
    }

    if matched {
        combined
    } else {
        0
    }
}
