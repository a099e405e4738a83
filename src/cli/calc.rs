//! Calc command implementation

use clap::Args;
use rust_decimal::Decimal;

use super::{parse_institution_price, Context};
use crate::session::{SessionState, TradeEntry};

/// Inputs shared by `calc` and `record`
#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Trading category
    #[arg(short = 'C', long)]
    pub category: String,

    /// Account capital (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub account: Option<Decimal>,

    /// Percent of the account to risk (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub risk_percent: Option<Decimal>,

    /// Entry price (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub entry: Option<Decimal>,

    /// Stop-loss price (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub stop: Option<Decimal>,

    /// Take-profit price (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub target: Option<Decimal>,

    /// Instrument symbol, ignored for categories without symbols
    #[arg(long)]
    pub symbol: Option<String>,

    /// Institution price expectation as NAME=PRICE, repeatable
    #[arg(long, value_parser = parse_institution_price)]
    pub inst: Vec<(String, Decimal)>,
}

impl TradeArgs {
    /// Build a session and entry from the arguments
    pub fn build(&self, ctx: &Context) -> anyhow::Result<(SessionState, TradeEntry)> {
        let category = ctx.pool.get(&self.category)?;
        let mut session = SessionState::new(category);
        for (name, price) in &self.inst {
            session.select(name, *price)?;
        }

        let mut entry = TradeEntry::new(category, &ctx.config.defaults);
        entry.set_symbol(self.symbol.clone());
        if let Some(account) = self.account {
            entry.inputs.account = account;
        }
        if let Some(risk_percent) = self.risk_percent {
            entry.inputs.risk_percent = risk_percent;
        }
        if let Some(price) = self.entry {
            entry.inputs.entry = price;
        }
        if let Some(stop) = self.stop {
            entry.inputs.stop = stop;
        }
        if let Some(target) = self.target {
            entry.inputs.target = target;
        }
        Ok((session, entry))
    }
}

/// Print the computed position and institution statistics
pub(super) fn print_assessment(ctx: &Context, session: &SessionState, entry: &TradeEntry) -> anyhow::Result<()> {
    let category = ctx.pool.get(entry.category())?;
    let Some(assessment) = entry.assessment() else {
        return Ok(());
    };

    println!("{} ({})", category.label, category.name);
    if let Some(symbol) = entry.symbol() {
        println!("  Symbol:        {}", symbol);
    }
    println!("  Account:       {:.2}", entry.inputs.account);
    println!("  Risk:          {}% = {:.2}", entry.inputs.risk_percent, assessment.risk_amount);
    println!("  {:<14} {:.2}", format!("{}:", category.entry_label), entry.inputs.entry);
    println!("  Stop:          {:.2}", entry.inputs.stop);
    println!("  Target:        {:.2}", entry.inputs.target);
    println!("  {}", assessment);

    println!(
        "Institution prices ({} selected)",
        session.selected_count()
    );
    if let Some(stats) = session.stats() {
        for (name, input) in session.inputs().filter(|(_, i)| i.selected) {
            println!("  {:<18} {:.2}", name, input.price);
        }
        println!("  {}", stats);
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct CalcArgs {
    #[command(flatten)]
    pub trade: TradeArgs,
}

impl CalcArgs {
    pub fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let (session, mut entry) = self.trade.build(ctx)?;
        entry.compute()?;
        print_assessment(ctx, &session, &entry)
    }
}
