//! Batch credential processing with per-record failure isolation
//!
//! One entry comes out for every record that goes in, in input order. A
//! record that fails to decrypt never aborts or skips its neighbors; the
//! only whole-batch failure is a master key of the wrong length, which is
//! rejected before any record is touched.
//!
//! Records carry no ordering dependency between each other, so the loop is
//! partitioned across the rayon thread pool; input order is restored by the
//! indexed collect, not by sequencing execution.

use rayon::prelude::*;

use crate::crypto::{
    classify, decrypt, CipherProvider, DecryptionFailureKind, InvalidKey, MasterKey,
};

/// One encrypted credential row as read from the login store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCredentialRecord {
    pub url: String,
    pub username: String,
    pub encrypted_value: Vec<u8>,
}

/// Result of one record's decryption attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptionOutcome {
    Success { plaintext: String },
    Failure { reason: DecryptionFailureKind },
}

/// One batch entry: the outcome plus a back-reference to the record it came
/// from, used for reporting only
#[derive(Debug, Clone)]
pub struct BatchEntry<'a> {
    pub record: &'a RawCredentialRecord,
    pub outcome: DecryptionOutcome,
}

/// Ordered outcomes for a processed batch, same cardinality and order as the
/// input records. Nothing is dropped at this layer; filtering for a report
/// happens in the report emitter.
#[derive(Debug)]
pub struct BatchResult<'a> {
    entries: Vec<BatchEntry<'a>>,
}

/// Per-kind outcome counts, safe to log (no record contents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub recovered: usize,
    pub unsupported: usize,
    pub auth_failed: usize,
    pub bad_encoding: usize,
}

impl<'a> BatchResult<'a> {
    pub fn entries(&self) -> &[BatchEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.entries.len(),
            ..BatchSummary::default()
        };
        for entry in &self.entries {
            match &entry.outcome {
                DecryptionOutcome::Success { .. } => summary.recovered += 1,
                DecryptionOutcome::Failure { reason } => match reason {
                    DecryptionFailureKind::UnsupportedScheme { .. } => summary.unsupported += 1,
                    DecryptionFailureKind::AuthenticationFailed => summary.auth_failed += 1,
                    DecryptionFailureKind::InvalidEncoding => summary.bad_encoding += 1,
                },
            }
        }
        summary
    }
}

/// Decrypt every record independently with the given master key.
///
/// Fails fast with [`InvalidKey`] when the key is not exactly 32 bytes;
/// otherwise always returns one outcome per record. No retries: the key does
/// not change mid-batch, so a per-record failure is terminal for that record.
pub fn process<'a, P>(
    records: &'a [RawCredentialRecord],
    key_bytes: &[u8],
    provider: &P,
) -> Result<BatchResult<'a>, InvalidKey>
where
    P: CipherProvider + Sync,
{
    let key = MasterKey::new(key_bytes)?;

    let entries = records
        .par_iter()
        .map(|record| {
            let parsed = classify(&record.encrypted_value);
            let outcome = match decrypt(&parsed, key, provider) {
                Ok(plaintext) => DecryptionOutcome::Success { plaintext },
                Err(reason) => DecryptionOutcome::Failure { reason },
            };
            BatchEntry { record, outcome }
        })
        .collect();

    Ok(BatchResult { entries })
}
