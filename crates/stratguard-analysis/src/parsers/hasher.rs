//! Content hashing for cache keys.

/// xxh3 hash of the raw source bytes.
pub fn hash_content(source: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(source)
}
