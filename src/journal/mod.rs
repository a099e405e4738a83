//! Trade journal module
//!
//! Durable append-only storage of trades in SQLite, recent-activity queries,
//! and CSV export

mod export;
mod migrations;
mod store;
mod types;

pub use export::{export, write_csv, ExportOutcome, UTF8_BOM};
pub use migrations::{Migration, MIGRATIONS};
pub use store::TradeStore;
pub(crate) use types::non_blank;
pub use types::{
    Emotion, ExportScope, JournalError, RecentTrade, Trade, TradeRecord, UnknownEmotion,
    TIME_FORMAT,
};
