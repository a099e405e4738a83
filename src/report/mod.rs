//! Reporting over the trade journal

mod recent;
mod summary;

pub use recent::format_recent;
pub use summary::{JournalSummary, SummaryError};
