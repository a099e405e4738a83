//! Export command implementation

use clap::Args;
use std::path::PathBuf;

use super::Context;
use crate::journal::{export, ExportOutcome, ExportScope, TradeStore};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export only this category
    #[arg(short = 'C', long, conflicts_with = "all", required_unless_present = "all")]
    pub category: Option<String>,

    /// Export every category
    #[arg(long)]
    pub all: bool,

    /// Output directory (default from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn scope(&self, ctx: &Context) -> anyhow::Result<ExportScope> {
        match &self.category {
            Some(name) if !self.all => {
                let category = ctx.pool.get(name)?;
                Ok(ExportScope::Category(category.name.clone()))
            }
            _ => Ok(ExportScope::All),
        }
    }

    pub fn execute(&self, ctx: &Context, store: &TradeStore) -> anyhow::Result<()> {
        let scope = self.scope(ctx)?;
        let dir = self
            .output
            .clone()
            .unwrap_or_else(|| ctx.config.journal.export_dir.clone());

        match export(store, &scope, &dir)? {
            ExportOutcome::Written { path, rows } => {
                println!("Exported {} trades to {}", rows, path.display());
            }
            ExportOutcome::Empty => {
                println!("No trades to export");
            }
        }
        Ok(())
    }
}
