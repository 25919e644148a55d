//! Stored-secret blob classification
//!
//! Chromium prefixes every encrypted credential with a 3-byte ASCII scheme
//! tag. The `v10` and `v11` tags both mean AES-256-GCM with the layout:
//!
//! ```text
//! tag (3) | nonce (12) | ciphertext (n) | auth tag (16)
//! ```
//!
//! Classification is total: every byte sequence maps to exactly one variant
//! and the function never panics or indexes out of bounds.

/// Length of the ASCII scheme tag prefix
pub const SCHEME_TAG_LEN: usize = 3;

/// GCM nonce length used by Chromium
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length
pub const AUTH_TAG_LEN: usize = 16;

/// Shortest well-formed GCM blob: tag + nonce + empty ciphertext + auth tag
pub const MIN_GCM_BLOB_LEN: usize = SCHEME_TAG_LEN + NONCE_LEN + AUTH_TAG_LEN;

/// Which recognized scheme tag a GCM blob carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcmScheme {
    /// `v10` prefix
    V10,
    /// `v11` prefix
    V11,
}

/// Result of classifying a raw stored-secret blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCiphertext {
    /// AES-256-GCM blob split into the fields decryption needs
    Gcm {
        scheme: GcmScheme,
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
        auth_tag: [u8; AUTH_TAG_LEN],
    },
    /// Unrecognized, legacy, or malformed blob. Carries the observed tag
    /// bytes for diagnostic reporting; not decryptable by this engine.
    Unsupported { tag: Vec<u8> },
}

/// Classify a raw stored-secret blob.
///
/// Any input is acceptable, including the empty blob. A recognized scheme
/// tag on a blob too short to hold nonce + auth tag is treated as
/// `Unsupported` rather than underflowing field extraction.
pub fn classify(blob: &[u8]) -> ParsedCiphertext {
    let scheme = if blob.starts_with(b"v10") {
        GcmScheme::V10
    } else if blob.starts_with(b"v11") {
        GcmScheme::V11
    } else {
        return unsupported(blob);
    };

    if blob.len() < MIN_GCM_BLOB_LEN {
        return unsupported(blob);
    }

    let body = &blob[SCHEME_TAG_LEN..];
    let (nonce_bytes, rest) = body.split_at(NONCE_LEN);
    let (ciphertext, tag_bytes) = rest.split_at(rest.len() - AUTH_TAG_LEN);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);
    let mut auth_tag = [0u8; AUTH_TAG_LEN];
    auth_tag.copy_from_slice(tag_bytes);

    ParsedCiphertext::Gcm {
        scheme,
        nonce,
        ciphertext: ciphertext.to_vec(),
        auth_tag,
    }
}

fn unsupported(blob: &[u8]) -> ParsedCiphertext {
    let tag = blob.get(..SCHEME_TAG_LEN).unwrap_or(blob).to_vec();
    ParsedCiphertext::Unsupported { tag }
}

/// Hex-encode observed tag bytes for diagnostics (e.g. `763939` for `v99`)
pub fn tag_hex(tag: &[u8]) -> String {
    tag.iter().map(|b| format!("{:02x}", b)).collect()
}
