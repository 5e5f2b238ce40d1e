//! Content fingerprinting for change detection.
//!
//! Hashes are content-based rather than mtime-based so they survive
//! `git checkout`, `touch`, and archive restores (all of which reset
//! modification times without changing pixels). Files are streamed through
//! the digest in fixed-size blocks, so hashing a multi-hundred-megabyte
//! scan costs the same memory as hashing a thumbnail.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read block size for streaming hashes.
const BLOCK_SIZE: usize = 64 * 1024;

/// SHA-256 hash of a file's contents, returned as a lowercase hex string.
///
/// Reads in fixed-size blocks; memory use is independent of file size.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
