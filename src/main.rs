mod config;
mod export;
mod ledger;
mod logging;
mod models;
mod run;
mod store;
mod ui;

use anyhow::Result;

use crate::config::Config;
use crate::ledger::Ledger;
use crate::store::LedgerStore;

fn main() -> Result<()> {
    let (config, args) = Config::load(std::env::args().collect())?;
    logging::init(&config)?;

    let store = LedgerStore::open(&config.db_path)?;
    let mut ledger = Ledger::new(store);

    let result = match args.len() {
        0 | 1 => run::as_tui(&mut ledger),
        _ => run::as_cli(&args, &mut ledger),
    };

    // On error the connection is closed when `ledger` drops.
    result?;
    ledger.shutdown()?;
    tracing::info!("shutdown complete");
    Ok(())
}
