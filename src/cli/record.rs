//! Record command implementation

use clap::Args;
use rust_decimal::Decimal;

use super::calc::print_assessment;
use super::{Context, TradeArgs};
use crate::journal::{Emotion, TradeStore};
use crate::report::format_recent;

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub trade: TradeArgs,

    /// Realized result, positive for a win
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub result: Decimal,

    /// Why the trade was taken
    #[arg(long)]
    pub reason: Option<String>,

    /// Emotional state: calm, hesitant, impulsive, fearful or confident
    #[arg(long, default_value = "calm")]
    pub emotion: Emotion,
}

impl RecordArgs {
    pub fn execute(&self, ctx: &Context, store: &TradeStore) -> anyhow::Result<()> {
        let (mut session, mut entry) = self.trade.build(ctx)?;
        entry.compute()?;
        print_assessment(ctx, &session, &entry)?;

        entry.result = self.result;
        entry.reason = self.reason.clone();
        entry.emotion = self.emotion;
        let record = entry.save(store, &mut session)?;
        println!("Saved trade #{} at {}", record.id, record.time_str());

        let recent = store.query_recent(&record.trade.product, ctx.config.journal.recent_limit)?;
        if let Some(table) = format_recent(&recent) {
            println!();
            println!("{}", table);
        }
        Ok(())
    }
}
