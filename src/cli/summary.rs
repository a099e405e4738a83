//! Summary command implementation

use clap::Args;

use super::Context;
use crate::journal::TradeStore;
use crate::report::JournalSummary;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Restrict to one category
    #[arg(short = 'C', long)]
    pub category: Option<String>,
}

impl SummaryArgs {
    pub fn execute(&self, ctx: &Context, store: &TradeStore) -> anyhow::Result<()> {
        let product = match &self.category {
            Some(name) => Some(ctx.pool.get(name)?.name.as_str()),
            None => None,
        };
        let records = store.query(product)?;
        let summary = JournalSummary::from_records(product, &records)?;
        println!("{}", summary.format_table());
        Ok(())
    }
}
