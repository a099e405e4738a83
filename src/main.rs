use anyhow::Context as _;
use clap::Parser;
use risk_journal::cli::{Cli, Commands, Context};
use risk_journal::config::Config;
use risk_journal::journal::TradeStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    // Only a missing file falls back to the defaults
    let mut config = match Config::load_if_present(&cli.config)
        .with_context(|| format!("Invalid configuration in {}", cli.config))?
    {
        Some(config) => config,
        None => {
            eprintln!("Warning: No config file at {}", cli.config);
            eprintln!("Using default configuration");
            Config::embedded()?
        }
    };
    if let Some(db) = &cli.db {
        config.journal.db_path = db.clone();
    }

    // Initialize telemetry
    risk_journal::telemetry::init_telemetry(&config.telemetry)?;

    let ctx = Context::new(config);

    // The journal is opened once; failing here ends the process
    let store = if cli.command.needs_store() {
        let path = &ctx.config.journal.db_path;
        let store = TradeStore::open(path)
            .with_context(|| format!("Could not open trade journal at {}", path.display()))?;
        Some(store)
    } else {
        None
    };

    match (cli.command, store) {
        (Commands::Calc(args), _) => args.execute(&ctx)?,
        (Commands::Record(args), Some(store)) => args.execute(&ctx, &store)?,
        (Commands::Recent(args), Some(store)) => args.execute(&ctx, &store)?,
        (Commands::Export(args), Some(store)) => args.execute(&ctx, &store)?,
        (Commands::Summary(args), Some(store)) => args.execute(&ctx, &store)?,
        (Commands::Migrate, Some(store)) => {
            let columns = store.columns()?;
            println!("Journal: {}", ctx.config.journal.db_path.display());
            println!("Columns: {}", columns.join(", "));
            println!("Trades:  {}", store.count(None)?);
        }
        (Commands::Categories, _) => {
            for category in ctx.pool.iter() {
                println!("{} ({})", category.label, category.name);
                println!("  Entry label: {}", category.entry_label);
                println!("  Symbol:      {}", if category.has_symbol { "yes" } else { "no" });
                println!("  Institutions: {}", category.institutions.join(", "));
            }
        }
        (Commands::Config, _) => {
            let config = &ctx.config;
            println!("Current configuration:");
            println!("  Database: {}", config.journal.db_path.display());
            println!("  Exports: {}", config.journal.export_dir.display());
            println!("  Recent limit: {}", config.journal.recent_limit);
            println!(
                "  Defaults: account={}, risk={}%, entry={}, stop={}, target={}",
                config.defaults.account,
                config.defaults.risk_percent,
                config.defaults.entry,
                config.defaults.stop,
                config.defaults.target
            );
            println!(
                "  Categories: {}",
                ctx.pool.names().collect::<Vec<_>>().join(", ")
            );
        }
        (command, None) => anyhow::bail!("{:?} requires the trade journal", command),
    }

    Ok(())
}
