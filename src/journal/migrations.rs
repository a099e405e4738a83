//! Schema creation and additive migrations for the `trades` table
//!
//! The base table matches the first released layout. Later columns are added
//! by the ordered steps in [`MIGRATIONS`], each skipped when its column is
//! already present. Columns are never renamed or dropped.

use rusqlite::Connection;

use super::types::JournalError;

/// Table layout before any migration
const CREATE_TRADES: &str = "
CREATE TABLE IF NOT EXISTS trades (
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

/// Adds one nullable column when it is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub column: &'static str,
    pub sql_type: &'static str,
}

/// Applied in order on every startup
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        column: "institution_prices",
        sql_type: "TEXT",
    },
    Migration {
        column: "inst_avg",
        sql_type: "REAL",
    },
    Migration {
        column: "inst_median",
        sql_type: "REAL",
    },
    Migration {
        column: "inst_max",
        sql_type: "REAL",
    },
    Migration {
        column: "inst_min",
        sql_type: "REAL",
    },
];

/// Column names of `trades` in table order
pub fn table_columns(conn: &Connection) -> Result<Vec<String>, JournalError> {
    let mut stmt = conn.prepare("PRAGMA table_info(trades)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Create the table if needed and apply missing migrations
///
/// Returns the columns added by this call.
pub fn init_schema(conn: &Connection) -> Result<Vec<&'static str>, JournalError> {
    conn.execute_batch(CREATE_TRADES)?;

    let existing = table_columns(conn)?;
    let mut added = Vec::new();
    for migration in MIGRATIONS {
        if existing.iter().any(|c| c == migration.column) {
            continue;
        }
        conn.execute(
            &format!(
                "ALTER TABLE trades ADD COLUMN {} {}",
                migration.column, migration.sql_type
            ),
            [],
        )?;
        tracing::info!(column = migration.column, "Added column to trades");
        added.push(migration.column);
    }

    Ok(added)
}
