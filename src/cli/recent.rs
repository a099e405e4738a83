//! Recent command implementation

use clap::builder::RangedU64ValueParser;
use clap::Args;

use super::Context;
use crate::journal::TradeStore;
use crate::report::format_recent;

#[derive(Args, Debug)]
pub struct RecentArgs {
    /// Trading category
    #[arg(short = 'C', long)]
    pub category: String,

    /// Number of trades to show (default from config)
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub limit: Option<usize>,
}

impl RecentArgs {
    pub fn execute(&self, ctx: &Context, store: &TradeStore) -> anyhow::Result<()> {
        let category = ctx.pool.get(&self.category)?;
        let limit = self.limit.unwrap_or(ctx.config.journal.recent_limit);
        let trades = store.query_recent(&category.name, limit)?;

        println!("Last {} trades ({})", limit, category.label);
        match format_recent(&trades) {
            Some(table) => print!("{}", table),
            None => println!("No trades in this category yet"),
        }
        Ok(())
    }
}
