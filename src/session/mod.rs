//! Interactive session state
//!
//! Institution selections for the active category and the trade currently
//! being entered. Both live for one session only and are never persisted.

mod entry;
mod state;

pub use entry::{EntryError, EntryState, TradeEntry};
pub use state::{InstitutionInput, SessionState};
