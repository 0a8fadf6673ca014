//! Revenue magnitude tiers.

use gazette_shared::Tier;

/// Lower bounds (exclusive) for each listed tier, most severe first.
const THRESHOLDS: [(u64, Tier); 6] = [
    (10_000_000_000, Tier::Giant),
    (1_000_000_000, Tier::Large),
    (500_000_000, Tier::UpperMid),
    (200_000_000, Tier::Mid),
    (100_000_000, Tier::LowerMid),
    (50_000_000, Tier::SmallRanked),
];

/// Map a revenue magnitude (lei) to its tier. Boundaries fall into the lower tier.
pub fn classify_tier(magnitude: u64) -> Tier {
    THRESHOLDS
        .iter()
        .find(|(floor, _)| magnitude > *floor)
        .map_or(Tier::BelowThreshold, |(_, tier)| *tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representative_values() {
        assert_eq!(classify_tier(25_000_000_000), Tier::Giant);
        assert_eq!(classify_tier(2_500_000_000), Tier::Large);
        assert_eq!(classify_tier(700_000_000), Tier::UpperMid);
        assert_eq!(classify_tier(300_000_000), Tier::Mid);
        assert_eq!(classify_tier(150_000_000), Tier::LowerMid);
        assert_eq!(classify_tier(75_000_000), Tier::SmallRanked);
        assert_eq!(classify_tier(1_000), Tier::BelowThreshold);
        assert_eq!(classify_tier(0), Tier::BelowThreshold);
    }

    #[test]
    fn boundaries_fall_into_lower_tier() {
        assert_eq!(classify_tier(10_000_000_000), Tier::Large);
        assert_eq!(classify_tier(10_000_000_001), Tier::Giant);
        assert_eq!(classify_tier(1_000_000_000), Tier::UpperMid);
        assert_eq!(classify_tier(500_000_000), Tier::Mid);
        assert_eq!(classify_tier(200_000_000), Tier::LowerMid);
        assert_eq!(classify_tier(100_000_000), Tier::SmallRanked);
        assert_eq!(classify_tier(50_000_000), Tier::BelowThreshold);
        assert_eq!(classify_tier(50_000_001), Tier::SmallRanked);
    }

    #[test]
    fn tiers_are_monotonic() {
        let samples = [
            0,
            49_999_999,
            50_000_000,
            50_000_001,
            100_000_001,
            200_000_001,
            500_000_001,
            1_000_000_001,
            10_000_000_001,
            u64::MAX,
        ];
        for pair in samples.windows(2) {
            // Larger magnitude never lands in a less severe tier.
            assert!(classify_tier(pair[1]) <= classify_tier(pair[0]));
        }
        assert_eq!(classify_tier(u64::MAX), Tier::Giant);
    }
}
