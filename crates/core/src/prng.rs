//! Seedable Xorshift64 generator used to scatter points.
//!
//! Fields draw every initial position, velocity, radius, and opacity from
//! this generator, so a seed fully determines a field. The browser host seeds
//! it from `Math.random`, the CLI from `--seed`.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A zero seed is replaced by a fixed non-zero constant, since zero is a
/// fixed point of the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Builds a seed from a unit-interval float such as `Math.random()`.
    ///
    /// Values outside [0, 1) are folded back in; NaN maps to the fallback.
    pub fn from_unit(r: f64) -> Self {
        let r = if r.is_finite() { r.abs().fract() } else { 0.0 };
        Self::new((r * (1u64 << 53) as f64) as u64)
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1), using the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max). Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform f64 in [-span/2, span/2): a velocity component for a given speed.
    pub fn next_centered(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Changing this breaks every saved seed file.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(1234);
        let mut b = Xorshift64::new(1234);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at index {i}");
        }
    }

    #[test]
    fn next_range_with_empty_range_returns_min() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..100 {
            assert_eq!(rng.next_range(2.6, 2.6), 2.6);
        }
    }

    #[test]
    fn next_centered_matches_half_span_bounds() {
        let mut rng = Xorshift64::new(77);
        for i in 0..10_000 {
            let v = rng.next_centered(0.4);
            assert!(
                (-0.2..0.2).contains(&v),
                "next_centered(0.4) = {v} out of bounds at {i}"
            );
        }
    }

    #[test]
    fn from_unit_handles_edge_inputs() {
        for r in [0.0, 0.5, 0.999_999, 1.0, -0.25, f64::NAN, f64::INFINITY] {
            let mut rng = Xorshift64::from_unit(r);
            assert_ne!(rng.next_u64(), 0, "from_unit({r}) produced a stuck generator");
        }
    }

    #[test]
    fn from_unit_distinguishes_nearby_inputs() {
        let mut a = Xorshift64::from_unit(0.25);
        let mut b = Xorshift64::from_unit(0.26);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64(), "diverged at {i}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_range_in_bounds_for_any_seed_and_range(
                seed: u64,
                min in -1e4_f64..1e4,
                width in 1e-3_f64..1e4,
            ) {
                let max = min + width;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "next_range({min}, {max}) = {v}");
                }
            }

            #[test]
            fn next_f64_approximate_uniformity(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let idx = (rng.next_f64() * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                // Expected ~1000 per bucket; loose bound keeps this stable.
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(count >= 500, "bucket {i} has only {count}");
                }
            }
        }
    }
}
