//! Single-pass aggregation across several intervals.

use coinbars_types::{Bar, Interval, Tick};

use crate::BarAggregator;

/// Aggregates one ordered stream into bars for several intervals at once.
///
/// Each point is read once and fed to one [`BarAggregator`] per interval, so a
/// long trade history does not have to be re-scanned per interval.
#[derive(Debug, Clone)]
pub struct MultiIntervalAggregator {
    lanes: Vec<(BarAggregator, Vec<Bar>)>,
}

impl MultiIntervalAggregator {
    /// Creates an aggregator producing bars for each of `intervals`.
    #[must_use]
    pub fn new(intervals: &[Interval]) -> Self {
        Self {
            lanes: intervals
                .iter()
                .map(|&i| (BarAggregator::new(i), Vec::new()))
                .collect(),
        }
    }

    /// Creates an aggregator for every supported interval.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Interval::all())
    }

    /// Feeds a point to every interval.
    pub fn process(&mut self, point: &Bar) {
        for (aggregator, bars) in &mut self.lanes {
            bars.extend(aggregator.process(point));
        }
    }

    /// Feeds a trade tick to every interval. Zero-volume ticks are ignored.
    pub fn process_tick(&mut self, tick: &Tick) {
        if tick.is_trade() {
            self.process(&tick.as_bar());
        }
    }

    /// Finishes aggregation, returning each interval with its bars.
    ///
    /// The last bar of each interval is its open bucket.
    #[must_use]
    pub fn finish(self) -> Vec<(Interval, Vec<Bar>)> {
        self.lanes
            .into_iter()
            .map(|(aggregator, mut bars)| {
                let interval = aggregator.interval();
                bars.extend(aggregator.finish());
                (interval, bars)
            })
            .collect()
    }
}
