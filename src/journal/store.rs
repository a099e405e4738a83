//! SQLite-backed trade store

use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::{params, Connection, Row};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::path::Path;

use super::migrations;
use super::types::{
    non_blank, Emotion, JournalError, RecentTrade, Trade, TradeRecord, UnknownEmotion, TIME_FORMAT,
};
use crate::institution::{decode_prices, encode_prices, InstitutionStats};

const SELECT_TRADES: &str = "
SELECT id, time, product, symbol, account, risk_percent, entry, stop, target,
       position, rr, result, reason, emotion,
       institution_prices, inst_avg, inst_median, inst_max, inst_min
FROM trades";

/// Append-only journal of trades
///
/// Opened once per process. Writes from other processes are serialized by
/// SQLite's own file locking only.
pub struct TradeStore {
    conn: Connection,
}

impl TradeStore {
    /// Open (or create) the journal at `path` and bring its schema up to date
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        tracing::info!(path = %path.display(), "Trade store opened");
        Ok(store)
    }

    /// In-memory journal for tests
    pub fn open_in_memory() -> Result<Self, JournalError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create the table and add any missing columns
    ///
    /// Safe to call any number of times. Existing rows are kept.
    pub fn init_schema(&self) -> Result<Vec<&'static str>, JournalError> {
        migrations::init_schema(&self.conn)
    }

    /// Current column names of the trades table
    pub fn columns(&self) -> Result<Vec<String>, JournalError> {
        migrations::table_columns(&self.conn)
    }

    /// Append a trade stamped with the local time
    pub fn save(&self, trade: &Trade) -> Result<TradeRecord, JournalError> {
        let now = Local::now().naive_local();
        self.save_at(trade, now)
    }

    /// Append a trade with an explicit timestamp
    ///
    /// The returned record holds the numbers as they read back from storage.
    pub fn save_at(&self, trade: &Trade, time: NaiveDateTime) -> Result<TradeRecord, JournalError> {
        // Stored with second resolution
        let time = time.with_nanosecond(0).unwrap_or(time);
        let time_str = time.format(TIME_FORMAT).to_string();
        let prices = encode_prices(&trade.institution_prices)?;
        let stats = trade.institution_stats;

        self.conn.execute(
            "INSERT INTO trades (
                time, product, symbol, account, risk_percent,
                entry, stop, target,
                position, rr, result,
                reason, emotion,
                institution_prices,
                inst_avg, inst_median, inst_max, inst_min
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                time_str,
                trade.product,
                trade.symbol.as_deref().unwrap_or(""),
                real(trade.account),
                real(trade.risk_percent),
                real(trade.entry),
                real(trade.stop),
                real(trade.target),
                real(trade.position),
                real(trade.rr),
                real(trade.result),
                trade.reason.as_deref().unwrap_or(""),
                trade.emotion.as_str(),
                prices,
                stats.map(|s| real(s.avg)),
                stats.map(|s| real(s.median)),
                stats.map(|s| real(s.max)),
                stats.map(|s| real(s.min)),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, product = %trade.product, time = %time_str, "Trade saved");

        Ok(TradeRecord {
            id,
            time,
            trade: as_stored(trade),
        })
    }

    /// All trades, oldest first, optionally restricted to one category
    pub fn query(&self, product: Option<&str>) -> Result<Vec<TradeRecord>, JournalError> {
        let rows = match product {
            Some(product) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{} WHERE product = ?1 ORDER BY time ASC, id ASC",
                    SELECT_TRADES
                ))?;
                let rows = stmt
                    .query_map(params![product], RawTrade::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{} ORDER BY time ASC, id ASC", SELECT_TRADES))?;
                let rows = stmt
                    .query_map([], RawTrade::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        let records = rows
            .into_iter()
            .map(RawTrade::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(product = ?product, count = records.len(), "Queried trades");
        Ok(records)
    }

    /// Latest trades of one category, newest first, at most `limit` rows
    pub fn query_recent(&self, product: &str, limit: usize) -> Result<Vec<RecentTrade>, JournalError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, time, symbol, entry, stop, target, result
             FROM trades
             WHERE product = ?1
             ORDER BY time DESC, id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![product, limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    row.get::<_, Option<f64>>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, time, symbol, entry, stop, target, result)| {
                Ok(RecentTrade {
                    time: parse_time(id, time.as_deref())?,
                    symbol: non_blank(symbol),
                    entry: decimal(id, "entry", entry)?,
                    stop: decimal(id, "stop", stop)?,
                    target: decimal(id, "target", target)?,
                    result: decimal(id, "result", result)?,
                })
            })
            .collect()
    }

    /// Number of stored trades
    pub fn count(&self, product: Option<&str>) -> Result<u64, JournalError> {
        let count: i64 = match product {
            Some(product) => self.conn.query_row(
                "SELECT COUNT(*) FROM trades WHERE product = ?1",
                params![product],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))?,
        };
        Ok(count.max(0) as u64)
    }
}

/// Column values as read, before decoding
struct RawTrade {
    id: i64,
    time: Option<String>,
    product: Option<String>,
    symbol: Option<String>,
    account: Option<f64>,
    risk_percent: Option<f64>,
    entry: Option<f64>,
    stop: Option<f64>,
    target: Option<f64>,
    position: Option<f64>,
    rr: Option<f64>,
    result: Option<f64>,
    reason: Option<String>,
    emotion: Option<String>,
    institution_prices: Option<String>,
    inst: [Option<f64>; 4],
}

impl RawTrade {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            time: row.get(1)?,
            product: row.get(2)?,
            symbol: row.get(3)?,
            account: row.get(4)?,
            risk_percent: row.get(5)?,
            entry: row.get(6)?,
            stop: row.get(7)?,
            target: row.get(8)?,
            position: row.get(9)?,
            rr: row.get(10)?,
            result: row.get(11)?,
            reason: row.get(12)?,
            emotion: row.get(13)?,
            institution_prices: row.get(14)?,
            inst: [row.get(15)?, row.get(16)?, row.get(17)?, row.get(18)?],
        })
    }

    fn into_record(self) -> Result<TradeRecord, JournalError> {
        let id = self.id;
        let corrupt = |reason: String| JournalError::CorruptRow { id, reason };

        // Missing emotion reads as the default
        let emotion = match non_blank(self.emotion) {
            Some(label) => label
                .parse()
                .map_err(|e: UnknownEmotion| corrupt(e.to_string()))?,
            None => Emotion::default(),
        };

        let institution_stats = match self.inst {
            [Some(avg), Some(median), Some(max), Some(min)] => Some(InstitutionStats {
                avg: decimal(id, "inst_avg", Some(avg))?,
                median: decimal(id, "inst_median", Some(median))?,
                max: decimal(id, "inst_max", Some(max))?,
                min: decimal(id, "inst_min", Some(min))?,
            }),
            [None, None, None, None] => None,
            _ => return Err(corrupt("institution statistics partially populated".to_string())),
        };

        let trade = Trade {
            product: self.product.unwrap_or_default(),
            symbol: non_blank(self.symbol),
            account: decimal(id, "account", self.account)?,
            risk_percent: decimal(id, "risk_percent", self.risk_percent)?,
            entry: decimal(id, "entry", self.entry)?,
            stop: decimal(id, "stop", self.stop)?,
            target: decimal(id, "target", self.target)?,
            position: decimal(id, "position", self.position)?,
            rr: decimal(id, "rr", self.rr)?,
            result: decimal(id, "result", self.result)?,
            reason: non_blank(self.reason),
            emotion,
            institution_prices: decode_prices(self.institution_prices.as_deref())?,
            institution_stats,
        };

        Ok(TradeRecord {
            id,
            time: parse_time(id, self.time.as_deref())?,
            trade,
        })
    }
}

fn real(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Value as it reads back from a REAL column
fn stored(value: Decimal) -> Decimal {
    Decimal::from_f64(real(value)).unwrap_or_default()
}

/// Copy of `trade` with every number at the precision the table keeps
fn as_stored(trade: &Trade) -> Trade {
    Trade {
        account: stored(trade.account),
        risk_percent: stored(trade.risk_percent),
        entry: stored(trade.entry),
        stop: stored(trade.stop),
        target: stored(trade.target),
        position: stored(trade.position),
        rr: stored(trade.rr),
        result: stored(trade.result),
        institution_prices: trade
            .institution_prices
            .iter()
            .map(|(name, price)| (name.clone(), stored(*price)))
            .collect(),
        institution_stats: trade.institution_stats.map(|s| InstitutionStats {
            avg: stored(s.avg),
            median: stored(s.median),
            max: stored(s.max),
            min: stored(s.min),
        }),
        ..trade.clone()
    }
}

/// Convert a REAL column, NULL reads as zero
fn decimal(id: i64, column: &str, value: Option<f64>) -> Result<Decimal, JournalError> {
    match value {
        None => Ok(Decimal::ZERO),
        Some(v) => Decimal::from_f64(v).ok_or_else(|| JournalError::CorruptRow {
            id,
            reason: format!("{} is not a finite number: {}", column, v),
        }),
    }
}

fn parse_time(id: i64, value: Option<&str>) -> Result<NaiveDateTime, JournalError> {
    let value = value.unwrap_or_default();
    NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|e| JournalError::CorruptRow {
        id,
        reason: format!("bad time {:?}: {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::institution::{aggregate, InstitutionPrices};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    fn sample_trade(product: &str) -> Trade {
        let mut prices = InstitutionPrices::new();
        prices.insert("高盛".to_string(), dec!(2450.5));
        prices.insert("UBS".to_string(), dec!(2400));
        let stats = aggregate(&prices);
        Trade {
            product: product.to_string(),
            symbol: Some("600519".to_string()),
            account: dec!(100000),
            risk_percent: dec!(2),
            entry: dec!(100),
            stop: dec!(95),
            target: dec!(120),
            position: dec!(400),
            rr: dec!(4),
            result: dec!(-350.5),
            reason: Some("突破回踩 breakout retest".to_string()),
            emotion: Emotion::Hesitant,
            institution_prices: prices,
            institution_stats: stats,
        }
    }

    #[test]
    fn test_save_assigns_id_and_time() {
        let store = TradeStore::open_in_memory().unwrap();
        let first = store.save(&sample_trade("stock")).unwrap();
        let second = store.save(&sample_trade("stock")).unwrap();
        assert!(second.id > first.id);
        assert!(second.time >= first.time);
        assert_eq!(store.count(None).unwrap(), 2);
    }

    #[test]
    fn test_round_trip() {
        let store = TradeStore::open_in_memory().unwrap();
        let trade = sample_trade("stock");
        let saved = store.save_at(&trade, at(10, 0, 0)).unwrap();

        let records = store.query(Some("stock")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], saved);
        assert_eq!(records[0].trade, trade);
        assert_eq!(records[0].time_str(), "2024-03-15 10:00:00");
    }

    #[test]
    fn test_round_trip_without_optional_fields() {
        let store = TradeStore::open_in_memory().unwrap();
        let trade = Trade {
            symbol: None,
            reason: None,
            institution_prices: InstitutionPrices::new(),
            institution_stats: None,
            ..sample_trade("gold")
        };
        store.save(&trade).unwrap();

        let records = store.query(Some("gold")).unwrap();
        assert_eq!(records[0].trade, trade);

        let raw: (String, String, Option<f64>) = store
            .conn
            .query_row(
                "SELECT symbol, institution_prices, inst_avg FROM trades",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(raw, (String::new(), "{}".to_string(), None));
    }

    #[test]
    fn test_query_filters_and_orders() {
        let store = TradeStore::open_in_memory().unwrap();
        store.save_at(&sample_trade("gold"), at(11, 0, 0)).unwrap();
        store.save_at(&sample_trade("stock"), at(9, 0, 0)).unwrap();
        store.save_at(&sample_trade("gold"), at(10, 0, 0)).unwrap();

        let gold = store.query(Some("gold")).unwrap();
        assert_eq!(gold.len(), 2);
        assert!(gold[0].time < gold[1].time);
        assert!(gold.iter().all(|r| r.trade.product == "gold"));

        let all = store.query(None).unwrap();
        let times: Vec<_> = all.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![at(9, 0, 0), at(10, 0, 0), at(11, 0, 0)]);
    }

    #[test]
    fn test_query_same_second_ordered_by_id() {
        let store = TradeStore::open_in_memory().unwrap();
        let a = store.save_at(&sample_trade("etf"), at(9, 0, 0)).unwrap();
        let b = store.save_at(&sample_trade("etf"), at(9, 0, 0)).unwrap();
        let ids: Vec<_> = store.query(None).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        let recent = store.query_recent("etf", 10).unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_query_recent_caps_and_orders() {
        let store = TradeStore::open_in_memory().unwrap();
        for minute in 0..15 {
            let mut trade = sample_trade("fund");
            trade.result = Decimal::from(minute);
            store.save_at(&trade, at(9, minute, 0)).unwrap();
        }
        store.save_at(&sample_trade("gold"), at(12, 0, 0)).unwrap();

        let recent = store.query_recent("fund", 10).unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].time, at(9, 14, 0));
        assert_eq!(recent[0].result, dec!(14));
        assert!(recent.windows(2).all(|w| w[0].time >= w[1].time));

        assert_eq!(store.query_recent("fund", 3).unwrap().len(), 3);
        assert!(store.query_recent("etf", 10).unwrap().is_empty());
    }

    #[test]
    fn test_missing_emotion_reads_as_calm() {
        let store = TradeStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO trades (time, product, emotion) VALUES ('2024-03-15 10:00:00', 'gold', NULL)",
                [],
            )
            .unwrap();
        let records = store.query(None).unwrap();
        assert_eq!(records[0].trade.emotion, Emotion::Calm);
        assert_eq!(records[0].trade.entry, dec!(0));
    }

    #[test]
    fn test_corrupt_partial_stats() {
        let store = TradeStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO trades (time, product, emotion, inst_avg) VALUES ('2024-03-15 10:00:00', 'gold', 'calm', 1.0)",
                [],
            )
            .unwrap();
        assert!(matches!(
            store.query(None),
            Err(JournalError::CorruptRow { .. })
        ));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trades.db");
        let store = TradeStore::open(&path).unwrap();
        store.save(&sample_trade("gold")).unwrap();
        drop(store);

        let reopened = TradeStore::open(&path).unwrap();
        assert_eq!(reopened.count(Some("gold")).unwrap(), 1);
        assert_eq!(reopened.columns().unwrap().len(), 19);
    }

    #[test]
    fn test_open_unwritable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let result = TradeStore::open(dir.path());
        assert!(matches!(result, Err(JournalError::StorageUnavailable(_))));
    }

    #[test]
    fn test_failed_write_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TradeStore::open(dir.path().join("trades.db")).unwrap();
        store.save(&sample_trade("gold")).unwrap();

        store.conn.execute_batch("PRAGMA query_only = ON").unwrap();
        let result = store.save(&sample_trade("gold"));
        assert!(matches!(result, Err(JournalError::StorageUnavailable(_))));
        assert_eq!(store.count(Some("gold")).unwrap(), 1);
    }

    #[test]
    fn test_round_trip_non_terminating_values() {
        let store = TradeStore::open_in_memory().unwrap();
        let inputs = crate::risk::RiskInputs {
            account: dec!(100000),
            risk_percent: dec!(2),
            entry: dec!(100),
            stop: dec!(97),
            target: dec!(120),
        };
        let assessment = crate::risk::compute(&inputs).unwrap();

        let mut prices = InstitutionPrices::new();
        prices.insert("UBS".to_string(), dec!(10));
        prices.insert("Citi".to_string(), dec!(20));
        prices.insert("CICC".to_string(), dec!(25));

        let mut trade = sample_trade("stock");
        trade.position = assessment.position;
        trade.rr = assessment.rr;
        trade.result = dec!(100) / dec!(3);
        trade.institution_stats = aggregate(&prices);
        trade.institution_prices = prices;

        let saved = store.save_at(&trade, at(11, 0, 0)).unwrap();
        // Within f64 precision of the computed values
        assert!((saved.trade.position - assessment.position).abs() < dec!(0.000001));
        assert!((saved.trade.rr - assessment.rr).abs() < dec!(0.000001));

        let records = store.query(Some("stock")).unwrap();
        assert_eq!(records, vec![saved.clone()]);
        let recent = store.query_recent("stock", 1).unwrap();
        assert_eq!(recent[0].result, saved.trade.result);
    }
}
