//! Probability → risk tier classification.

use noshow_contracts::risk::{RiskTier, TIER_LOW_UPPER, TIER_MEDIUM_UPPER};

/// Map a no-show probability onto its risk tier.
///
/// The partition of [0,1] is total and non-overlapping:
/// Low < 0.30, Medium in [0.30, 0.60], High > 0.60. Both boundary values
/// classify as Medium.
pub fn classify(probability: f64) -> RiskTier {
    if probability < TIER_LOW_UPPER {
        RiskTier::Low
    } else if probability <= TIER_MEDIUM_UPPER {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_partition_the_unit_interval() {
        assert_eq!(classify(0.0), RiskTier::Low);
        assert_eq!(classify(0.29), RiskTier::Low);
        assert_eq!(classify(0.45), RiskTier::Medium);
        assert_eq!(classify(0.75), RiskTier::High);
        assert_eq!(classify(1.0), RiskTier::High);
    }

    #[test]
    fn boundary_values_fall_into_medium() {
        // Both edges of the Medium band are inclusive.
        assert_eq!(classify(0.30), RiskTier::Medium);
        assert_eq!(classify(0.60), RiskTier::Medium);
        assert_eq!(classify(0.600001), RiskTier::High);
        assert_eq!(classify(0.299999), RiskTier::Low);
    }

    #[test]
    fn every_probability_gets_exactly_one_tier() {
        // Sweep the interval at fine granularity; classification must be
        // total with no gaps at any point.
        let mut p = 0.0;
        while p <= 1.0 {
            let _ = classify(p);
            p += 0.001;
        }
    }
}
