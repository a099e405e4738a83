//! risk-journal: position sizing calculator and trade journal
//!
//! This library provides the core components for:
//! - Fixed-fractional position sizing and risk/reward
//! - Institution price expectations and their statistics
//! - Per-session category and institution selection state
//! - SQLite trade journal with additive schema migrations
//! - CSV export and journal summaries
//! - Command line interface and logging

pub mod cli;
pub mod config;
pub mod institution;
pub mod journal;
pub mod report;
pub mod risk;
pub mod session;
pub mod telemetry;
