//! Append-only prediction log backed by a SHA-256 hash chain.
//!
//! Every score the engine produces is recorded here for audit: write-once,
//! keyed by appointment + timestamp, never overwritten. The chain makes
//! in-memory tampering detectable via `verify_integrity()`.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. canonical JSON of the prediction record

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};
use tracing::debug;

use noshow_contracts::{
    error::{EngineError, EngineResult},
    risk::PredictionRecord,
};
use noshow_core::traits::PredictionWriter;

/// The sentinel `prev_hash` for the first entry in every chain: 64 hex
/// zeros, a value that can never be the SHA-256 of real data.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One chained entry in the prediction log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,
    pub record: PredictionRecord,
    /// Hash (hex) of the previous entry, or `GENESIS_HASH` for entry 0.
    pub prev_hash: String,
    /// Hash (hex) of this entry's canonical content.
    pub this_hash: String,
}

/// Compute the hash for one log entry.
fn hash_entry(sequence: u64, record: &PredictionRecord, prev_hash: &str) -> EngineResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| EngineError::LogWriteFailed {
        reason: format!("prediction record not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify prev-hash linkage and hash correctness for a chain of entries.
///
/// An empty chain is valid.
pub fn verify_chain(entries: &[LogEntry]) -> bool {
    let mut expected_prev = GENESIS_HASH.to_string();
    for entry in entries {
        if entry.prev_hash != expected_prev {
            return false;
        }
        match hash_entry(entry.sequence, &entry.record, &entry.prev_hash) {
            Ok(recomputed) if entry.this_hash == recomputed => {}
            _ => return false,
        }
        expected_prev = entry.this_hash.clone();
    }
    true
}

struct LogState {
    entries: Vec<LogEntry>,
    sequence: u64,
    last_hash: String,
}

/// In-memory, append-only implementation of `PredictionWriter`.
///
/// `record()` acquires an internal `Mutex`; clones share the same chain, so
/// one handle can be given to the engine while another is kept for
/// inspection.
#[derive(Clone)]
pub struct InMemoryPredictionLog {
    state: Arc<Mutex<LogState>>,
}

impl Default for InMemoryPredictionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPredictionLog {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LogState {
                entries: Vec::new(),
                sequence: 0,
                last_hash: GENESIS_HASH.to_string(),
            })),
        }
    }

    // Read paths keep working after a holder panic: `record()` never
    // panics between its state mutations, so the chain stays consistent,
    // and `verify_chain` catches anything that somehow got torn.
    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all entries written so far, in append order.
    pub fn export(&self) -> Vec<LogEntry> {
        self.state().entries.clone()
    }

    /// True when the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.state().entries)
    }
}

impl PredictionWriter for InMemoryPredictionLog {
    fn record(&self, record: &PredictionRecord) -> EngineResult<()> {
        let mut state = self.state();

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_entry(sequence, record, &prev_hash)?;

        state.entries.push(LogEntry {
            sequence,
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        debug!(
            appointment_id = %record.appointment_id,
            sequence,
            "prediction recorded"
        );

        Ok(())
    }
}
