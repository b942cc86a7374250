//! Streaming and batch OHLCV aggregation.

use coinbars_types::{Bar, Interval, Tick};

/// Streaming bar aggregator.
///
/// Folds ordered points (ticks as single-trade bars, or finer bars) into bars
/// of the configured interval.
#[derive(Debug, Clone)]
pub struct BarAggregator {
    interval: Interval,
    current: Option<Bar>,
}

impl BarAggregator {
    /// Creates a new aggregator for the given interval.
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            current: None,
        }
    }

    /// Returns the interval being aggregated to.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Processes a point, potentially emitting a completed bar.
    ///
    /// Returns `Some(bar)` when this point starts a new bucket and so closes
    /// the previous one, `None` otherwise.
    pub fn process(&mut self, point: &Bar) -> Option<Bar> {
        let bucket = self.interval.bucket_start(point.time);

        if let Some(bar) = self.current.as_mut()
            && bar.time == bucket
        {
            bar.merge(point);
            return None;
        }
        self.current.replace(point.at(bucket))
    }

    /// Processes a trade tick.
    pub fn process_tick(&mut self, tick: &Tick) -> Option<Bar> {
        self.process(&tick.as_bar())
    }

    /// Returns the bar still being built.
    #[must_use]
    pub const fn current(&self) -> Option<&Bar> {
        self.current.as_ref()
    }

    /// Finishes aggregation, returning the open bar.
    #[must_use]
    pub const fn finish(self) -> Option<Bar> {
        self.current
    }
}

/// Aggregates an ordered sequence of points into bars of `interval`.
///
/// The last bar of the result is the most recent bucket and may still be
/// open; callers must not treat it as closed.
#[must_use]
pub fn aggregate(points: &[Bar], interval: Interval) -> Vec<Bar> {
    let mut aggregator = BarAggregator::new(interval);
    let mut bars: Vec<Bar> = points.iter().filter_map(|p| aggregator.process(p)).collect();
    bars.extend(aggregator.finish());
    bars
}

/// Aggregates trade ticks into bars of `interval`, skipping zero-volume ticks.
#[must_use]
pub fn aggregate_ticks(ticks: &[Tick], interval: Interval) -> Vec<Bar> {
    let mut aggregator = BarAggregator::new(interval);
    let mut bars: Vec<Bar> = ticks
        .iter()
        .filter(|t| t.is_trade())
        .filter_map(|t| aggregator.process_tick(t))
        .collect();
    bars.extend(aggregator.finish());
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ticks() -> Vec<Tick> {
        vec![
            Tick::from_secs(0, 10.0, 1.0).unwrap(),
            Tick::from_secs(30, 12.0, 2.0).unwrap(),
            Tick::from_secs(61, 9.0, 1.0).unwrap(),
        ]
    }

    #[test]
    fn test_minute_aggregation() {
        let bars = aggregate_ticks(&ticks(), Interval::Minute1);

        assert_eq!(
            bars,
            vec![
                Bar::new(0, 10.0, 12.0, 10.0, 12.0, 3.0),
                Bar::new(60_000, 9.0, 9.0, 9.0, 9.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_empty_and_single_input() {
        assert!(aggregate(&[], Interval::Minute5).is_empty());

        let single = aggregate(&[Bar::single(301_500, 7.0, 0.5)], Interval::Minute5);
        assert_eq!(single, vec![Bar::single(300_000, 7.0, 0.5)]);
    }

    #[test]
    fn test_zero_volume_ticks_skipped() {
        let mut input = ticks();
        input.insert(1, Tick::from_secs(10, 100.0, 0.0).unwrap());
        let bars = aggregate_ticks(&input, Interval::Minute1);
        assert_relative_eq!(bars[0].high, 12.0);
    }

    #[test]
    fn test_idempotent_at_same_interval() {
        let bars = aggregate_ticks(&ticks(), Interval::Minute1);
        assert_eq!(aggregate(&bars, Interval::Minute1), bars);
    }

    #[test]
    fn test_coarser_from_finer_matches_direct() {
        let input: Vec<Tick> = (0..200)
            .map(|i| Tick::from_secs(i * 37, 100.0 + f64::from((i % 13) as i32), 0.1 * (i + 1) as f64).unwrap())
            .collect();

        let minutes = aggregate_ticks(&input, Interval::Minute1);
        let via_minutes = aggregate(&minutes, Interval::Minute15);
        let direct = aggregate_ticks(&input, Interval::Minute15);

        assert_eq!(via_minutes.len(), direct.len());
        for (a, b) in via_minutes.iter().zip(&direct) {
            assert_eq!(a.time, b.time);
            assert_relative_eq!(a.open, b.open);
            assert_relative_eq!(a.high, b.high);
            assert_relative_eq!(a.low, b.low);
            assert_relative_eq!(a.close, b.close);
            assert_relative_eq!(a.volume, b.volume, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_streaming_emits_on_bucket_change() {
        let mut agg = BarAggregator::new(Interval::Minute1);
        let ticks = ticks();

        assert!(agg.process_tick(&ticks[0]).is_none());
        assert!(agg.process_tick(&ticks[1]).is_none());
        let closed = agg.process_tick(&ticks[2]).unwrap();

        assert_eq!(closed.time, 0);
        assert_relative_eq!(closed.volume, 3.0);
        assert_eq!(agg.current().unwrap().time, 60_000);
        assert_eq!(agg.finish().unwrap().close, 9.0);
    }

    #[test]
    fn test_volume_monotonic_while_merging() {
        let mut agg = BarAggregator::new(Interval::Minute60);
        let mut last_volume = 0.0;
        for i in 0..50 {
            agg.process_tick(&Tick::from_secs(i * 10, 50.0, 0.3).unwrap());
            let volume = agg.current().unwrap().volume;
            assert!(volume >= last_volume);
            last_volume = volume;
        }
    }

    #[test]
    fn test_monthly_aggregation() {
        // 2024-01-31T23:59:00Z and 2024-02-01T00:00:00Z
        let jan = Bar::single(1_706_745_540_000, 1.0, 1.0);
        let feb = Bar::single(1_706_745_600_000, 2.0, 1.0);
        let bars = aggregate(&[jan, feb], Interval::Monthly);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].time, 1_706_745_600_000);
    }
}
