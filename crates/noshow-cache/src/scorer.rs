//! Caching decoration for the inference gateway.
//!
//! `CachedScorer` wraps any `RiskScorer` by composition: successful model
//! responses are cached per appointment id for the configured TTL, so an
//! immediately repeated query for the same date does not re-score the batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use noshow_contracts::{
    error::EngineResult,
    features::{FeatureVector, ModelScore},
    ids::AppointmentId,
};
use noshow_core::traits::RiskScorer;

use crate::ttl::TtlCache;

/// Recommended cache TTL: shorter than the appointment data's own staleness
/// tolerance.
pub const DEFAULT_SCORE_TTL: Duration = Duration::from_secs(10 * 60);

/// A `RiskScorer` that serves cached scores and forwards only cache misses.
///
/// On inner failure, still-valid cached entries are returned and the rest of
/// the batch is simply absent from the response — the engine treats absent
/// ids as unscored and routes them to the fallback. The error propagates
/// only when nothing at all can be served.
pub struct CachedScorer {
    inner: Arc<dyn RiskScorer>,
    cache: TtlCache<AppointmentId, ModelScore>,
}

impl CachedScorer {
    pub fn new(inner: Arc<dyn RiskScorer>, ttl: Duration) -> Self {
        Self { inner, cache: TtlCache::new(ttl) }
    }

    pub fn with_default_ttl(inner: Arc<dyn RiskScorer>) -> Self {
        Self::new(inner, DEFAULT_SCORE_TTL)
    }
}

impl RiskScorer for CachedScorer {
    fn score(
        &self,
        batch: &[FeatureVector],
    ) -> EngineResult<HashMap<AppointmentId, ModelScore>> {
        let mut served: HashMap<AppointmentId, ModelScore> = HashMap::new();
        let mut misses: Vec<FeatureVector> = Vec::new();

        for feature in batch {
            match self.cache.get(&feature.appointment_id) {
                Some(score) => {
                    served.insert(feature.appointment_id, score);
                }
                None => misses.push(feature.clone()),
            }
        }

        debug!(batch = batch.len(), hits = served.len(), misses = misses.len(), "score cache lookup");

        if misses.is_empty() {
            return Ok(served);
        }

        match self.inner.score(&misses) {
            Ok(fresh) => {
                for (id, score) in fresh {
                    self.cache.insert(id, score.clone());
                    served.insert(id, score);
                }
                Ok(served)
            }
            Err(e) if !served.is_empty() => {
                // Partial coverage from cache is a normal mixed response;
                // the uncovered ids fall through to the fallback estimator.
                warn!(error = %e, cached = served.len(), uncovered = misses.len(),
                    "inner scorer failed, serving cached subset");
                Ok(served)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use noshow_contracts::{
        appointment::{NewPatientFlag, VirtualFlag},
        error::{EngineError, EngineResult},
        features::{FeatureVector, ModelScore},
        ids::AppointmentId,
        patient::{AgeBucket, Gender, PayerGroup},
    };
    use noshow_core::traits::RiskScorer;

    use super::CachedScorer;

    fn feature(id: i64) -> FeatureVector {
        FeatureVector {
            appointment_id: AppointmentId(id),
            patient_age_bucket: AgeBucket::YoungAdult,
            patient_gender: Gender::M,
            patient_zip_code: None,
            payer_group: PayerGroup::Commercial,
            portal_engaged: false,
            historical_no_show_rate: 0.0,
            historical_no_show_count: 0,
            historical_appointments: 0,
            lead_time_days: 7,
            virtual_flag: VirtualFlag::NonVirtual,
            new_patient_flag: NewPatientFlag::Established,
            day_of_week: 2,
            hour_of_day: 9,
            appointment_duration: 30,
            provider_specialty: "Cardiology".to_string(),
            department_specialty: "Cardiology".to_string(),
        }
    }

    /// Counts invocations; scores everything at a fixed probability. When
    /// `fail_after` is set, every call past that count fails.
    struct CountingScorer {
        calls: AtomicUsize,
        fail_after: Option<usize>,
    }

    impl CountingScorer {
        fn healthy() -> Self {
            Self { calls: AtomicUsize::new(0), fail_after: None }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail_after: Some(0) }
        }

        fn failing_after(n: usize) -> Self {
            Self { calls: AtomicUsize::new(0), fail_after: Some(n) }
        }
    }

    impl RiskScorer for CountingScorer {
        fn score(
            &self,
            batch: &[FeatureVector],
        ) -> EngineResult<HashMap<AppointmentId, ModelScore>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_after.is_some_and(|n| call >= n) {
                return Err(EngineError::InferenceUnavailable {
                    reason: "endpoint down".to_string(),
                });
            }
            Ok(batch
                .iter()
                .map(|f| {
                    (
                        f.appointment_id,
                        ModelScore { probability: 0.5, model_version: "v1".to_string() },
                    )
                })
                .collect())
        }
    }

    #[test]
    fn repeated_query_is_served_from_cache() {
        let inner = Arc::new(CountingScorer::healthy());
        let cached = CachedScorer::new(inner.clone(), Duration::from_secs(60));

        let batch = vec![feature(1), feature(2)];
        assert_eq!(cached.score(&batch).unwrap().len(), 2);
        assert_eq!(cached.score(&batch).unwrap().len(), 2);

        // Second query hit the cache: one inner invocation total.
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn only_misses_are_forwarded() {
        let inner = Arc::new(CountingScorer::healthy());
        let cached = CachedScorer::new(inner.clone(), Duration::from_secs(60));

        cached.score(&[feature(1)]).unwrap();
        let result = cached.score(&[feature(1), feature(2)]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn expired_entries_trigger_rescoring() {
        let inner = Arc::new(CountingScorer::healthy());
        let cached = CachedScorer::new(inner.clone(), Duration::from_millis(5));

        cached.score(&[feature(1)]).unwrap();
        std::thread::sleep(Duration::from_millis(15));
        cached.score(&[feature(1)]).unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn inner_failure_with_cached_subset_serves_partial() {
        // First call succeeds and warms the cache for id 1; the scorer
        // fails from then on.
        let inner = Arc::new(CountingScorer::failing_after(1));
        let cached = CachedScorer::new(inner, Duration::from_secs(60));
        cached.score(&[feature(1)]).unwrap();

        let result = cached.score(&[feature(1), feature(2)]).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_key(&AppointmentId(1)));
        // Id 2 is absent: the engine will route it to the fallback.
        assert!(!result.contains_key(&AppointmentId(2)));
    }

    #[test]
    fn total_failure_with_empty_cache_propagates() {
        let inner = Arc::new(CountingScorer::failing());
        let cached = CachedScorer::new(inner, Duration::from_secs(60));
        match cached.score(&[feature(1)]) {
            Err(EngineError::InferenceUnavailable { .. }) => {}
            other => panic!("expected InferenceUnavailable, got {:?}", other),
        }
    }
}
