//! CSV output.

use coinbars_types::{Bar, DatasetKey};
use std::io::Write;

use crate::record::records;
use crate::{FormatError, Formatter};

const HEADER: &str = "symbol,interval,time,time_ms,open,high,low,close,volume,closed";

/// Writes one row per bar, each tagged with its dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a CSV formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Formatter for CsvFormatter {
    fn write_dataset<W: Write + Send>(
        &self,
        key: &DatasetKey,
        bars: &[Bar],
        mut writer: W,
    ) -> Result<(), FormatError> {
        writeln!(writer, "{HEADER}")?;
        let (symbol, interval) = (key.symbol(), key.interval());
        for r in records(bars) {
            writeln!(
                writer,
                "{symbol},{interval},{},{},{},{},{},{},{},{}",
                r.time, r.time_ms, r.open, r.high, r.low, r.close, r.volume, r.closed
            )?;
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
