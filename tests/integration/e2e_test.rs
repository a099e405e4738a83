//! End-to-end integration tests

use risk_journal::cli::{CalcArgs, Context, ExportArgs, RecordArgs, TradeArgs};
use risk_journal::config::{Config, DEFAULT_CONFIG};
use risk_journal::journal::{Emotion, TradeStore, UTF8_BOM};
use rust_decimal_macros::dec;

fn context(dir: &std::path::Path) -> Context {
    let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
    config.journal.db_path = dir.join("trades.db");
    config.journal.export_dir = dir.join("exports");
    Context::new(config)
}

fn trade_args(category: &str, inst: Vec<(String, rust_decimal::Decimal)>) -> TradeArgs {
    TradeArgs {
        category: category.to_string(),
        account: Some(dec!(100000)),
        risk_percent: Some(dec!(2)),
        entry: Some(dec!(100)),
        stop: Some(dec!(95)),
        target: Some(dec!(120)),
        symbol: Some("510300".to_string()),
        inst,
    }
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::embedded().unwrap();
    assert_eq!(config.journal.recent_limit, 10);
    assert_eq!(config.categories.len(), 4);
}

#[test]
fn test_calc_zero_stop_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let mut trade = trade_args("gold", vec![]);
    trade.stop = Some(dec!(100));
    let args = CalcArgs { trade };
    let err = args.execute(&ctx).unwrap_err();
    assert!(err.to_string().contains("stop price must differ"));
}

#[test]
fn test_record_then_export() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let store = TradeStore::open(&ctx.config.journal.db_path).unwrap();

    let record = RecordArgs {
        trade: trade_args(
            "etf",
            vec![("CICC".to_string(), dec!(3.5)), ("CITIC".to_string(), dec!(4.5))],
        ),
        result: dec!(-250),
        reason: Some("量价背离".to_string()),
        emotion: Emotion::Fearful,
    };
    record.execute(&ctx, &store).unwrap();

    let records = store.query(Some("etf")).unwrap();
    assert_eq!(records.len(), 1);
    let trade = &records[0].trade;
    assert_eq!(trade.position, dec!(400));
    assert_eq!(trade.rr, dec!(4));
    assert_eq!(trade.result, dec!(-250));
    assert_eq!(trade.emotion, Emotion::Fearful);
    assert_eq!(trade.institution_stats.unwrap().median, dec!(4));

    let export = ExportArgs {
        category: Some("etf".to_string()),
        all: false,
        output: None,
    };
    export.execute(&ctx, &store).unwrap();

    let bytes = std::fs::read(dir.path().join("exports").join("trades_etf.csv")).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    assert!(text.contains("量价背离"));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn test_export_nothing_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let store = TradeStore::open(&ctx.config.journal.db_path).unwrap();

    let export = ExportArgs {
        category: None,
        all: true,
        output: None,
    };
    export.execute(&ctx, &store).unwrap();
    assert!(!dir.path().join("exports").exists());
}
