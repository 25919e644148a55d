//! Credential decryption engine for Chromium AES-256-GCM blobs
//!
//! Stateless between calls: the engine consumes an already-unwrapped master
//! key and already-materialized records, and holds neither past a call.

pub mod format;
pub mod gcm;

pub use format::{classify, tag_hex, GcmScheme, ParsedCiphertext};
pub use gcm::{
    decrypt, AesGcmProvider, CipherProvider, DecryptionFailureKind, InvalidKey, MasterKey,
    MASTER_KEY_LEN,
};
