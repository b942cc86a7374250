//! Trade tick representation.

use serde::{Deserialize, Serialize};

use crate::Bar;

/// A single trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade time (epoch milliseconds).
    pub time: i64,
    /// Trade price.
    pub price: f64,
    /// Traded amount.
    pub volume: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(time: i64, price: f64, volume: f64) -> Self {
        Self {
            time,
            price,
            volume,
        }
    }

    /// Creates a tick from an epoch-seconds timestamp.
    ///
    /// Returns `None` if the timestamp does not fit in epoch milliseconds.
    #[must_use]
    pub const fn from_secs(secs: i64, price: f64, volume: f64) -> Option<Self> {
        match secs.checked_mul(1000) {
            Some(time) => Some(Self::new(time, price, volume)),
            None => None,
        }
    }

    /// Returns true if the tick carries traded volume.
    ///
    /// Zero-volume records are market events rather than trades.
    #[must_use]
    pub fn is_trade(&self) -> bool {
        self.volume != 0.0
    }

    /// Returns the tick as a single-trade bar stamped with its own time.
    #[must_use]
    pub const fn as_bar(&self) -> Bar {
        Bar::new(
            self.time, self.price, self.price, self.price, self.price, self.volume,
        )
    }
}
