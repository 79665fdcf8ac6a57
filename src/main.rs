use clap::Parser;
use loyalty_ledger::application::engine::LoyaltyEngine;
use loyalty_ledger::domain::account::{Account, Amount};
use loyalty_ledger::domain::ports::{AccountStore, AccountStoreBox};
use loyalty_ledger::infrastructure::in_memory::InMemoryAccountStore;
#[cfg(feature = "storage-rocksdb")]
use loyalty_ledger::infrastructure::rocksdb::RocksDbAccountStore;
use loyalty_ledger::interfaces::csv::account_writer::AccountWriter;
use loyalty_ledger::interfaces::csv::order_reader::OrderReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Approved orders CSV file (account,amount)
    input: PathBuf,

    /// JSON file with account records to seed the store
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn build_store(cli: &Cli) -> Result<AccountStoreBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        let store = RocksDbAccountStore::open(db_path).into_diagnostic()?;
        return Ok(Box::new(store));
    }
    #[cfg(not(feature = "storage-rocksdb"))]
    let _ = cli;
    Ok(Box::new(InMemoryAccountStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the final account report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = build_store(&cli)?;

    // Seed accounts; the engine itself never creates them.
    if let Some(accounts_path) = &cli.accounts {
        let file = File::open(accounts_path).into_diagnostic()?;
        let accounts: Vec<Account> = serde_json::from_reader(file).into_diagnostic()?;
        for account in accounts {
            store.insert(account).await.into_diagnostic()?;
        }
    }

    let engine = LoyaltyEngine::new(store);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = OrderReader::new(file);
    for order_result in reader.orders() {
        let order = match order_result {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "skipping malformed order row");
                continue;
            }
        };
        let amount = match Amount::new(order.amount) {
            Ok(amount) => amount,
            Err(e) => {
                error!(account = %order.account, error = %e, "rejecting order");
                continue;
            }
        };
        match engine.process_order(&order.account, amount).await {
            Ok(result) if !result.is_clean() => {
                warn!(
                    account = %order.account,
                    warnings = result.warnings.len(),
                    "order processed with persistence warnings"
                );
            }
            Ok(_) => {}
            Err(e) => error!(account = %order.account, error = %e, "order failed"),
        }
    }

    let accounts = engine.into_results().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
