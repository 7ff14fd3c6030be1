//! Content hashing for caller-side caches.
//!
//! The optimizer itself never caches. Callers that do can key entries by
//! `(content_hash(html), config.fingerprint())`.
//!
//! # Usage
//!
//! ```ignore
//! use amp_optimizer::utils::hash;
//!
//! let key = format!("{}:{}", hash::content_hash(html), config.fingerprint());
//! ```

/// Compute the blake3 digest of `data` as a lowercase hex string.
#[inline]
pub fn content_hash<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}

/// First 16 hex characters of the content hash (for display).
#[inline]
pub fn short_hash<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    content_hash(data)[..16].to_string()
}
