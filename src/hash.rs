//! Content-addressing primitives.
//!
//! Every other component identifies documents and segments by SHA-256 hex
//! digests produced here. The digests are used for deduplication, not for
//! security, but SHA-256 keeps collisions out of the picture at any
//! realistic corpus size.
//!
//! - [`file_hash`] — digest of a file's raw bytes (I/O errors propagate).
//! - [`content_hash`] — digest of a document's UTF-8 text.
//! - [`segment_hash`] — digest of a single segment's UTF-8 text.

use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Hash a file's raw bytes. Fails if the path cannot be read.
pub fn file_hash(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file for hashing: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash a document's normalized text content (UTF-8 bytes).
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash a single segment's source text.
///
/// Same digest as [`content_hash`]; kept separate so segment rows and
/// document rows can diverge later without touching call sites.
pub fn segment_hash(text: &str) -> String {
    content_hash(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_deterministic() {
        let a = content_hash("Hello world");
        let b = content_hash("Hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_content_hash_distinguishes() {
        assert_ne!(content_hash("Hello world"), content_hash("Hello world."));
    }

    #[test]
    fn test_segment_hash_matches_content_hash() {
        assert_eq!(segment_hash("Bonjour"), content_hash("Bonjour"));
    }

    #[test]
    fn test_file_hash_missing_path_errors() {
        let result = file_hash(Path::new("/nonexistent/tmem-test-file"));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_hash_matches_content_for_utf8() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "same bytes").unwrap();
        assert_eq!(file_hash(tmp.path()).unwrap(), content_hash("same bytes"));
    }
}
