//! Shared fixtures for the coinbars benchmarks.
//!
//! Run with: `cargo bench --package coinbars-bench`

use coinbars_types::Tick;

/// Generates `count` trades, `spacing_ms` apart, as a bounded random walk.
///
/// The walk is a fixed linear congruential sequence so runs are comparable.
#[must_use]
pub fn synthetic_ticks(count: usize, spacing_ms: i64) -> Vec<Tick> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut price = 100.0_f64;
    (0..count)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let step = ((state >> 33) as f64 / f64::from(u32::MAX >> 1)) - 0.5;
            price = (price + step).max(1.0);
            let volume = 0.01 + ((state >> 40) & 0xff) as f64 / 100.0;
            Tick::new(i as i64 * spacing_ms, price, volume)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_are_ascending_trades() {
        let ticks = synthetic_ticks(1_000, 250);
        assert_eq!(ticks.len(), 1_000);
        assert!(ticks.windows(2).all(|w| w[0].time < w[1].time));
        assert!(ticks.iter().all(|t| t.is_trade() && t.price >= 1.0));
        assert_eq!(ticks, synthetic_ticks(1_000, 250));
    }
}
