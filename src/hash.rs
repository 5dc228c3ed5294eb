//! BLAKE3 hashing utilities for backup integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, SetupError};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of an in-memory buffer
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(bytes).to_hex())
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| SetupError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| SetupError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Short stable identifier for a path, used to name per-repository lock files
pub fn path_key(path: &Path) -> String {
    let digest = blake3::hash(path.as_os_str().as_encoded_bytes());
    digest.to_hex()[..16].to_string()
}
