//! Authenticated decryption of classified credential blobs
//!
//! AES-256-GCM with the 12-byte nonce and 16-byte auth tag extracted by the
//! format parser. The cipher backend is injected through [`CipherProvider`]
//! so tests can substitute a double for the real AES implementation.
//!
//! No error variant and no log line produced here may carry key material or
//! plaintext bytes; failures report structural facts only.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use thiserror::Error;

use super::format::{tag_hex, ParsedCiphertext, AUTH_TAG_LEN, NONCE_LEN};

/// Required master key length (AES-256)
pub const MASTER_KEY_LEN: usize = 32;

/// Borrowed view of the caller's 32-byte master key.
///
/// Construction validates the length; the engine never copies the key out of
/// the caller's buffer and holds no reference past the decrypt call. The
/// type deliberately has no `Debug` impl.
#[derive(Clone, Copy)]
pub struct MasterKey<'a>(&'a [u8; MASTER_KEY_LEN]);

impl<'a> MasterKey<'a> {
    /// Wrap a key buffer, rejecting any length other than 32 bytes.
    pub fn new(bytes: &'a [u8]) -> Result<Self, InvalidKey> {
        let array: &[u8; MASTER_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidKey { actual: bytes.len() })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &'a [u8; MASTER_KEY_LEN] {
        self.0
    }
}

/// Master key length mismatch. This is a caller-configuration error and is
/// fatal to a whole batch call; the message states lengths only.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("master key must be {MASTER_KEY_LEN} bytes, got {actual}")]
pub struct InvalidKey {
    pub actual: usize,
}

/// Why a single stored credential could not be recovered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptionFailureKind {
    /// Blob uses an unrecognized or legacy encoding (or is too short to
    /// carry one). The observed tag bytes are reported hex-encoded.
    #[error("unrecognized scheme tag 0x{tag_hex}")]
    UnsupportedScheme { tag_hex: String },

    /// GCM tag verification failed: wrong key, corrupted data, or tampering.
    #[error("authentication tag mismatch")]
    AuthenticationFailed,

    /// Decryption succeeded but the output is not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidEncoding,
}

impl DecryptionFailureKind {
    pub(crate) fn unsupported(tag: &[u8]) -> Self {
        Self::UnsupportedScheme { tag_hex: tag_hex(tag) }
    }
}

/// Cipher capability injected into [`decrypt`].
///
/// `open` verifies and decrypts `ciphertext` against `auth_tag`, returning
/// the plaintext bytes or `None` when verification fails. Implementations
/// must not retain the key.
pub trait CipherProvider {
    fn open(
        &self,
        key: &[u8; MASTER_KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        auth_tag: &[u8; AUTH_TAG_LEN],
    ) -> Option<Vec<u8>>;
}

/// Default provider backed by the `aes-gcm` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmProvider;

impl CipherProvider for AesGcmProvider {
    fn open(
        &self,
        key: &[u8; MASTER_KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        auth_tag: &[u8; AUTH_TAG_LEN],
    ) -> Option<Vec<u8>> {
        let cipher = Aes256Gcm::new(key.into());

        // The aead API expects ciphertext || tag in one buffer
        let mut sealed = Vec::with_capacity(ciphertext.len() + AUTH_TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(auth_tag);

        cipher.decrypt(Nonce::from_slice(nonce), sealed.as_slice()).ok()
    }
}

/// Decrypt one classified blob with the caller's master key.
///
/// `Unsupported` blobs fail immediately without touching the cipher.
pub fn decrypt<P: CipherProvider>(
    parsed: &ParsedCiphertext,
    key: MasterKey<'_>,
    provider: &P,
) -> Result<String, DecryptionFailureKind> {
    match parsed {
        ParsedCiphertext::Unsupported { tag } => {
            Err(DecryptionFailureKind::unsupported(tag))
        }
        ParsedCiphertext::Gcm {
            nonce,
            ciphertext,
            auth_tag,
            ..
        } => {
            let plaintext = provider
                .open(key.as_bytes(), nonce, ciphertext, auth_tag)
                .ok_or(DecryptionFailureKind::AuthenticationFailed)?;
            String::from_utf8(plaintext).map_err(|_| DecryptionFailureKind::InvalidEncoding)
        }
    }
}
