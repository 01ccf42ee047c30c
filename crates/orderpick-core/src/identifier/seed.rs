//! Random suffix seeds

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::model::OrgId;

/// Per-process counter so two seeds in the same nanosecond still differ
static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produces the initial numeric suffix for a candidate
pub trait SeedSource {
    /// A value in `0..10^width`
    fn seed(&self, org_id: &OrgId, width: u32) -> u64;
}

/// Size of the suffix space for a width
pub fn suffix_space(width: u32) -> u64 {
    10u64.saturating_pow(width)
}

/// Seed derived from the wall clock, hashed with the org id
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSeed;

impl SeedSource for ClockSeed {
    fn seed(&self, org_id: &OrgId, width: u32) -> u64 {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
        let input = format!("{}:{}:{}", org_id, timestamp, counter);

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let hash = hasher.finalize();

        let value = hash
            .iter()
            .take(8)
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        value % suffix_space(width)
    }
}

/// Always the same seed, reduced into the suffix space
#[derive(Debug, Clone, Copy)]
pub struct FixedSeed(pub u64);

impl SeedSource for FixedSeed {
    fn seed(&self, _org_id: &OrgId, width: u32) -> u64 {
        self.0 % suffix_space(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_seed_fits_width() {
        let org = OrgId::from("42");
        for _ in 0..50 {
            assert!(ClockSeed.seed(&org, 6) < 1_000_000);
        }
    }

    #[test]
    fn test_clock_seeds_vary() {
        let org = OrgId::from("42");
        let seeds: std::collections::HashSet<u64> =
            (0..20).map(|_| ClockSeed.seed(&org, 6)).collect();
        assert!(seeds.len() > 1);
    }

    #[test]
    fn test_fixed_seed_wraps() {
        assert_eq!(FixedSeed(1_000_005).seed(&OrgId::from("1"), 6), 5);
    }
}
