//! Timeout decoration for the inference gateway.
//!
//! `TimeoutScorer` wraps any `RiskScorer` by composition and bounds the time
//! a batched scoring call may take. The inference timeout must be strictly
//! shorter than the overall invocation budget so the fallback estimator has
//! time to run before the caller gives up.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use noshow_contracts::{
    error::{EngineError, EngineResult},
    features::{FeatureVector, ModelScore},
    ids::AppointmentId,
};

use crate::traits::RiskScorer;

type ScoreMap = HashMap<AppointmentId, ModelScore>;

/// A `RiskScorer` that fails with `InferenceUnavailable` when the wrapped
/// scorer does not answer within the deadline.
///
/// The wrapped call runs on a worker thread. On timeout the call is
/// abandoned: scoring is read-only, so the orphaned worker has no side
/// effects, and its eventual result is dropped with the channel.
pub struct TimeoutScorer {
    inner: Arc<dyn RiskScorer>,
    timeout: Duration,
}

impl TimeoutScorer {
    pub fn new(inner: Arc<dyn RiskScorer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl RiskScorer for TimeoutScorer {
    fn score(&self, batch: &[FeatureVector]) -> EngineResult<ScoreMap> {
        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let owned: Vec<FeatureVector> = batch.to_vec();

        thread::spawn(move || {
            // The receiver may be gone after a timeout; a failed send is fine.
            let _ = tx.send(inner.score(&owned));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => {
                debug!(batch = batch.len(), "scoring completed within deadline");
                result
            }
            Err(_) => {
                warn!(
                    batch = batch.len(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "scoring deadline exceeded, abandoning call"
                );
                Err(EngineError::InferenceUnavailable {
                    reason: format!("scoring timed out after {}ms", self.timeout.as_millis()),
                })
            }
        }
    }
}
