//! Master key file reader
//!
//! The unwrapped 32-byte master key is produced by an external key-unwrap
//! step and handed to this tool as a file. Accepted shapes: the raw bytes,
//! or the same key base64-encoded (surrounding ASCII whitespace tolerated).
//!
//! The key bytes are returned in a zeroizing buffer and must never be
//! logged; errors state lengths only.

use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::crypto::{InvalidKey, MASTER_KEY_LEN};

/// Read a 32-byte master key from a file.
pub fn read_master_key(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = Zeroizing::new(
        std::fs::read(path).with_context(|| format!("Failed to read key file {:?}", path))?,
    );

    if bytes.len() == MASTER_KEY_LEN {
        return Ok(bytes);
    }

    // Some export pipelines store the key base64-encoded
    if let Ok(text) = std::str::from_utf8(&bytes) {
        if let Ok(decoded) = STANDARD.decode(text.trim()) {
            let decoded = Zeroizing::new(decoded);
            if decoded.len() == MASTER_KEY_LEN {
                return Ok(decoded);
            }
        }
    }

    // Neither shape fit; surface the engine's own configuration error
    Err(InvalidKey { actual: bytes.len() }).with_context(|| {
        format!(
            "Key file {:?} holds {} bytes; expected a {}-byte AES-256 key (raw or base64)",
            path,
            bytes.len(),
            MASTER_KEY_LEN
        )
    })
}
