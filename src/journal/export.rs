//! CSV export of journal records
//!
//! Files are UTF-8 with a byte-order mark so spreadsheet tools detect the
//! encoding of non-ASCII institution names and reasons.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::store::TradeStore;
use super::types::{ExportScope, JournalError, TradeRecord};
use crate::institution::encode_prices;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File written with this many data rows
    Written { path: PathBuf, rows: usize },
    /// Nothing matched the scope, no file produced
    Empty,
}

/// One CSV line, field names are the column names
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: i64,
    time: String,
    product: &'a str,
    symbol: &'a str,
    account: Decimal,
    risk_percent: Decimal,
    entry: Decimal,
    stop: Decimal,
    target: Decimal,
    position: Decimal,
    rr: Decimal,
    result: Decimal,
    reason: &'a str,
    emotion: &'a str,
    institution_prices: String,
    inst_avg: Option<Decimal>,
    inst_median: Option<Decimal>,
    inst_max: Option<Decimal>,
    inst_min: Option<Decimal>,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a TradeRecord) -> Result<Self, JournalError> {
        let trade = &record.trade;
        let stats = trade.institution_stats;
        Ok(Self {
            id: record.id,
            time: record.time_str(),
            product: &trade.product,
            symbol: trade.symbol.as_deref().unwrap_or(""),
            account: trade.account,
            risk_percent: trade.risk_percent,
            entry: trade.entry,
            stop: trade.stop,
            target: trade.target,
            position: trade.position,
            rr: trade.rr,
            result: trade.result,
            reason: trade.reason.as_deref().unwrap_or(""),
            emotion: trade.emotion.as_str(),
            institution_prices: encode_prices(&trade.institution_prices)?,
            inst_avg: stats.map(|s| s.avg),
            inst_median: stats.map(|s| s.median),
            inst_max: stats.map(|s| s.max),
            inst_min: stats.map(|s| s.min),
        })
    }
}

/// Write records as CSV with a header row, BOM first
pub fn write_csv<W: Write>(records: &[TradeRecord], mut writer: W) -> Result<(), JournalError> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(CsvRow::from_record(record)?)?;
    }
    csv.flush()?;
    Ok(())
}

/// Export the records in `scope` to `dir`
///
/// Returns [`ExportOutcome::Empty`] without touching the filesystem when no
/// record matches.
pub fn export(
    store: &TradeStore,
    scope: &ExportScope,
    dir: &Path,
) -> Result<ExportOutcome, JournalError> {
    let records = store.query(scope.product())?;
    if records.is_empty() {
        tracing::info!(scope = ?scope, "Nothing to export");
        return Ok(ExportOutcome::Empty);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(scope.file_name());
    let file = File::create(&path)?;
    write_csv(&records, BufWriter::new(file))?;

    tracing::info!(path = %path.display(), rows = records.len(), "Exported trades");
    Ok(ExportOutcome::Written {
        path,
        rows: records.len(),
    })
}
