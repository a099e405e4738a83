//! Journal storage integration tests against on-disk databases

use chrono::NaiveDate;
use indexmap::IndexMap;
use risk_journal::institution::aggregate;
use risk_journal::journal::{
    export, Emotion, ExportOutcome, ExportScope, Trade, TradeStore, MIGRATIONS, UTF8_BOM,
};
use rusqlite::Connection;
use rust_decimal_macros::dec;

const LEGACY_SCHEMA: &str = "
CREATE TABLE trades (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time TEXT,
    product TEXT,
    symbol TEXT,
    account REAL,
    risk_percent REAL,
    entry REAL,
    stop REAL,
    target REAL,
    position REAL,
    rr REAL,
    result REAL,
    reason TEXT,
    emotion TEXT
)";

fn gold_trade() -> Trade {
    let mut prices = IndexMap::new();
    prices.insert("高盛".to_string(), dec!(2450));
    prices.insert("UBS".to_string(), dec!(2400.5));
    let stats = aggregate(&prices);
    Trade {
        product: "gold".to_string(),
        symbol: None,
        account: dec!(100000),
        risk_percent: dec!(2),
        entry: dec!(2400),
        stop: dec!(2390),
        target: dec!(2440),
        position: dec!(200),
        rr: dec!(4),
        result: dec!(1250.5),
        reason: Some("突破回踩".to_string()),
        emotion: Emotion::Confident,
        institution_prices: prices,
        institution_stats: stats,
    }
}

#[test]
fn test_legacy_database_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trades.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(LEGACY_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO trades (time, product, symbol, account, risk_percent, entry, stop, target, position, rr, result, reason, emotion)
             VALUES ('2023-05-01 09:30:00', 'stock', '600519', 50000, 1, 100, 98, 106, 250, 3, -500, '', '犹豫')",
            [],
        )
        .unwrap();
    }

    let store = TradeStore::open(&path).unwrap();
    let columns = store.columns().unwrap();
    assert_eq!(columns.len(), 14 + MIGRATIONS.len());
    for migration in MIGRATIONS {
        assert!(columns.iter().any(|c| c == migration.column));
    }

    let records = store.query(Some("stock")).unwrap();
    assert_eq!(records.len(), 1);
    let legacy = &records[0].trade;
    assert_eq!(legacy.symbol.as_deref(), Some("600519"));
    assert_eq!(legacy.reason, None);
    assert_eq!(legacy.emotion, Emotion::Hesitant);
    assert_eq!(legacy.result, dec!(-500));
    assert!(legacy.institution_prices.is_empty());
    assert_eq!(legacy.institution_stats, None);
}

#[test]
fn test_repeated_open_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trades.db");

    let store = TradeStore::open(&path).unwrap();
    store.save(&gold_trade()).unwrap();
    drop(store);

    for _ in 0..3 {
        let store = TradeStore::open(&path).unwrap();
        assert!(store.init_schema().unwrap().is_empty());
        assert_eq!(store.columns().unwrap().len(), 19);
        assert_eq!(store.count(None).unwrap(), 1);
    }
}

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("trades.db");
    let time = NaiveDate::from_ymd_opt(2024, 3, 8)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap();

    let saved = {
        let store = TradeStore::open(&path).unwrap();
        store.save_at(&gold_trade(), time).unwrap()
    };

    let store = TradeStore::open(&path).unwrap();
    let records = store.query(Some("gold")).unwrap();
    assert_eq!(records, vec![saved]);

    let names: Vec<&str> = records[0]
        .trade
        .institution_prices
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["高盛", "UBS"]);
    assert_eq!(records[0].trade.institution_stats.unwrap().median, dec!(2425.25));
}

#[test]
fn test_export_all_writes_bom_csv() {
    let dir = tempfile::tempdir().unwrap();
    let store = TradeStore::open(dir.path().join("trades.db")).unwrap();
    let time = NaiveDate::from_ymd_opt(2024, 3, 8)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap();
    store.save_at(&gold_trade(), time).unwrap();

    let mut stock = gold_trade();
    stock.product = "stock".to_string();
    stock.symbol = Some("000001".to_string());
    store.save_at(&stock, time).unwrap();

    let out = dir.path().join("exports");
    let outcome = export(&store, &ExportScope::All, &out).unwrap();
    let ExportOutcome::Written { path, rows } = outcome else {
        panic!("expected a written export");
    };
    assert_eq!(rows, 2);
    assert_eq!(path, out.join("trades_all.csv"));

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,time,product,symbol"));
    assert!(lines[1].contains("2024-03-08 14:05:09,gold"));
    assert!(lines[2].contains(",stock,000001,"));
    assert!(text.contains("突破回踩"));

    let none = export(&store, &ExportScope::Category("fund".to_string()), &out).unwrap();
    assert_eq!(none, ExportOutcome::Empty);
}
