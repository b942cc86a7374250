//! Time-ordered bar sequences.

use serde::{Deserialize, Serialize};

use crate::{Bar, DatasetError};

/// Time-ascending sequence of bars for one symbol and interval.
///
/// Bar times are strictly increasing. The last bar is the open bar and may be
/// amended in place; bars before it are closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct Dataset {
    bars: Vec<Bar>,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub const fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Creates a dataset from bars, validating the ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the bar times are not strictly increasing.
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, DatasetError> {
        if let Some(pair) = bars.windows(2).find(|w| w[1].time <= w[0].time) {
            return Err(DatasetError::NotAscending {
                last: pair[0].time,
                time: pair[1].time,
            });
        }
        Ok(Self { bars })
    }

    /// Returns the number of bars.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the dataset holds no bars.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns all bars.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Returns the last (open) bar.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Returns the last (open) bar for in-place amendment.
    pub fn last_mut(&mut self) -> Option<&mut Bar> {
        self.bars.last_mut()
    }

    /// Returns the time of the last bar.
    #[must_use]
    pub fn last_time(&self) -> Option<i64> {
        self.bars.last().map(|b| b.time)
    }

    /// Appends a bar that is strictly later than the current last bar.
    ///
    /// # Errors
    ///
    /// Returns an error if the bar is not later than the last bar.
    pub fn push(&mut self, bar: Bar) -> Result<(), DatasetError> {
        if let Some(last) = self.last_time()
            && bar.time <= last
        {
            return Err(DatasetError::NotAscending {
                last,
                time: bar.time,
            });
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Returns the index of the first bar with `time >= since`.
    #[must_use]
    pub fn index_from(&self, since: i64) -> usize {
        self.bars.partition_point(|b| b.time < since)
    }

    /// Returns the bars with `time >= since`.
    #[must_use]
    pub fn tail_from(&self, since: i64) -> &[Bar] {
        &self.bars[self.index_from(since)..]
    }

    /// Merges closed bars starting at the first bar with `time >= since`.
    ///
    /// A bar whose bucket already exists is amended in place, a bar for a new
    /// bucket is inserted at its ordered position (appended at the end in the
    /// usual case). `bars` must be ascending. Returns the length of the prefix
    /// that now ends with the last merged bar.
    pub fn merge_closed(&mut self, since: i64, bars: &[Bar]) -> usize {
        let mut idx = self.index_from(since);
        for bar in bars {
            while idx < self.bars.len() && self.bars[idx].time < bar.time {
                idx += 1;
            }
            match self.bars.get_mut(idx) {
                Some(existing) if existing.time == bar.time => *existing = *bar,
                Some(_) => self.bars.insert(idx, *bar),
                None => self.bars.push(*bar),
            }
            idx += 1;
        }
        idx
    }

    /// Returns a new dataset holding the first `len` bars.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            bars: self.bars[..len.min(self.bars.len())].to_vec(),
        }
    }

    /// Returns the last `n` bars.
    #[must_use]
    pub fn last_n(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

impl TryFrom<Vec<Bar>> for Dataset {
    type Error = DatasetError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::from_bars(bars)
    }
}

impl From<Dataset> for Vec<Bar> {
    fn from(dataset: Dataset) -> Self {
        dataset.bars
    }
}
