//! Metadata about an uploaded data file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata about the uploaded source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name as uploaded (no directory component).
    pub file: String,
    /// SHA-256 hash of the uploaded bytes.
    pub hash: String,
    /// Upload size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe an upload that has been loaded into a table.
    pub fn new(file: impl Into<String>, bytes: &[u8], row_count: usize, column_count: usize) -> Self {
        let file = file.into();
        let file = std::path::Path::new(&file)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file);

        Self {
            file,
            hash: content_hash(bytes),
            size_bytes: bytes.len() as u64,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }

    /// Abbreviated hash for display: the first 12 characters of the digest.
    pub fn short_hash(&self) -> &str {
        let digest = self.hash.strip_prefix("sha256:").unwrap_or(&self.hash);
        match digest.char_indices().nth(12) {
            Some((end, _)) => &digest[..end],
            None => digest,
        }
    }
}

/// Compute the `sha256:<hex>` content hash of some bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_strips_directories() {
        let meta = SourceMetadata::new("/tmp/uploads/q3.csv", b"a,b\n1,2\n", 1, 2);
        assert_eq!(meta.file, "q3.csv");
        assert_eq!(meta.size_bytes, 8);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.short_hash().len(), 12);
    }

    #[test]
    fn test_short_hash_of_non_hex_hash() {
        let mut meta = SourceMetadata::new("q3.csv", b"a\n1\n", 1, 1);
        meta.hash = "a\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}".to_string();
        assert_eq!(meta.short_hash(), meta.hash);

        meta.hash = format!("sha256:{}", "\u{e9}".repeat(20));
        assert_eq!(meta.short_hash(), "\u{e9}".repeat(12));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }
}
