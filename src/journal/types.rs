//! Trade journal types

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::institution::{InstitutionPrices, InstitutionStats, PriceCodecError};

/// Timestamp format of the `time` column
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trade journal errors
#[derive(Debug, Error)]
pub enum JournalError {
    /// The database could not be opened, read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),
    /// A stored row could not be decoded
    #[error("corrupt trade row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
    /// Institution prices could not be encoded or decoded
    #[error(transparent)]
    Prices(#[from] PriceCodecError),
    /// Export file could not be written
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
    /// CSV serialization failed
    #[error("export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Emotional state recorded with a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Calm,
    Hesitant,
    Impulsive,
    Fearful,
    Confident,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Calm,
        Emotion::Hesitant,
        Emotion::Impulsive,
        Emotion::Fearful,
        Emotion::Confident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Calm => "calm",
            Emotion::Hesitant => "hesitant",
            Emotion::Impulsive => "impulsive",
            Emotion::Fearful => "fearful",
            Emotion::Confident => "confident",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized emotion label
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown emotion: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Parses the English names and the labels written by the previous tool
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "calm" | "冷静" => Ok(Emotion::Calm),
            "hesitant" | "犹豫" => Ok(Emotion::Hesitant),
            "impulsive" | "冲动" => Ok(Emotion::Impulsive),
            "fearful" | "恐惧" => Ok(Emotion::Fearful),
            "confident" | "自信" => Ok(Emotion::Confident),
            other => Err(UnknownEmotion(other.to_string())),
        }
    }
}

/// Content of one journal row, everything except the store-assigned fields
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub product: String,
    pub symbol: Option<String>,
    pub account: Decimal,
    pub risk_percent: Decimal,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
    pub position: Decimal,
    pub rr: Decimal,
    /// Realized P/L, positive for a win
    pub result: Decimal,
    pub reason: Option<String>,
    pub emotion: Emotion,
    pub institution_prices: InstitutionPrices,
    /// Derived from `institution_prices`, `None` when it is empty
    pub institution_stats: Option<InstitutionStats>,
}

/// A saved trade
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub id: i64,
    pub time: NaiveDateTime,
    pub trade: Trade,
}

impl TradeRecord {
    /// Timestamp as stored in the `time` column
    pub fn time_str(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Row of the recent-activity view
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTrade {
    pub time: NaiveDateTime,
    pub symbol: Option<String>,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
    pub result: Decimal,
}

/// Which records an export covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// Only trades of one category
    Category(String),
    /// Every trade in the journal
    All,
}

impl ExportScope {
    /// Product filter passed to the store
    pub fn product(&self) -> Option<&str> {
        match self {
            ExportScope::Category(name) => Some(name),
            ExportScope::All => None,
        }
    }

    /// Download file name for this scope
    pub fn file_name(&self) -> String {
        match self {
            ExportScope::Category(name) => format!("trades_{}.csv", name),
            ExportScope::All => "trades_all.csv".to_string(),
        }
    }
}

/// Trim free text, mapping blank input to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
