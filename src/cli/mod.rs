//! CLI interface for risk-journal
//!
//! Provides subcommands for:
//! - `calc`: Size a position and show institution statistics
//! - `record`: Size a position and save the trade to the journal
//! - `recent`: Show the latest trades of a category
//! - `export`: Write journal records to CSV
//! - `summary`: Show journal statistics
//! - `categories`: List categories and institution pools
//! - `migrate`: Bring the database schema up to date
//! - `config`: Show configuration

mod calc;
mod export;
mod recent;
mod record;
mod summary;

pub use calc::{CalcArgs, TradeArgs};
pub use export::ExportArgs;
pub use recent::RecentArgs;
pub use record::RecordArgs;
pub use summary::SummaryArgs;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::config::Config;
use crate::institution::CategoryPool;

#[derive(Parser, Debug)]
#[command(name = "risk-journal")]
#[command(about = "Position sizing calculator and trade journal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Database path, overrides the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size a position and show institution statistics
    Calc(CalcArgs),
    /// Size a position and save the trade
    Record(RecordArgs),
    /// Show the latest trades of a category
    Recent(RecentArgs),
    /// Export trades to CSV
    Export(ExportArgs),
    /// Show journal statistics
    Summary(SummaryArgs),
    /// List categories and institution pools
    Categories,
    /// Bring the database schema up to date
    Migrate,
    /// Show configuration
    Config,
}

impl Commands {
    /// Whether the command reads or writes the journal
    pub fn needs_store(&self) -> bool {
        matches!(
            self,
            Commands::Record(_)
                | Commands::Recent(_)
                | Commands::Export(_)
                | Commands::Summary(_)
                | Commands::Migrate
        )
    }
}

/// Static state shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub pool: CategoryPool,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let pool = CategoryPool::from_config(&config.categories);
        Self { config, pool }
    }
}

/// Parse `NAME=PRICE` into an institution price
pub fn parse_institution_price(s: &str) -> Result<(String, Decimal), String> {
    let (name, price) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PRICE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing institution name in {:?}", s));
    }
    let price: Decimal = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid price in {:?}: {}", s, e))?;
    Ok((name.to_string(), price))
}
