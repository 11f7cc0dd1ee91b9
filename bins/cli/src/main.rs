//! Ledgerbook bootstrap binary.
//!
//! Loads configuration, seeds a chart of accounts into the in-memory store,
//! posts and corrects a month of vouchers, then prints the bank ledger and
//! the income statement as JSON.
//!
//! Usage: cargo run --bin ledgerbook

mod seed;

use std::sync::Arc;

use ledgerbook_core::accounts::AccountRegistry;
use ledgerbook_core::ledger::{LedgerEngine, LedgerEntry, LedgerQuery, Voucher};
use ledgerbook_core::reports::{IncomeStatement, ReportEngine};
use ledgerbook_core::InMemoryLedgerStore;
use ledgerbook_shared::config::{LogFormat, LoggingConfig};
use ledgerbook_shared::types::{AccountNo, UserId};
use ledgerbook_shared::{Actor, AppConfig, Role};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
struct Summary {
    vouchers: Vec<Voucher>,
    bank_ledger: Vec<LedgerEntry>,
    income_statement: IncomeStatement,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    info!(
        enforce_balance_on_create = config.ledger.enforce_balance_on_create,
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryLedgerStore::new());
    let registry = AccountRegistry::new(Arc::clone(&store));
    let ledger = LedgerEngine::with_config(Arc::clone(&store), config.ledger.clone());
    let reports = ReportEngine::new(Arc::clone(&store));

    seed::seed_chart(&registry).await?;
    let bookkeeper = Actor::new(UserId(1), Role::Bookkeeper);
    let posted = seed::post_demo_month(&ledger, &bookkeeper).await?;
    info!(vouchers = posted.len(), "Demo month posted");

    let mut vouchers = Vec::new();
    for header in ledger.list_vouchers().await? {
        vouchers.push(ledger.get_voucher(header.id).await?);
    }

    let summary = Summary {
        vouchers,
        bank_ledger: ledger
            .ledger_for(AccountNo(1930), &LedgerQuery::for_period("2025-01"))
            .await?,
        income_statement: reports.income_statement("2025-01-01", "2025-01-31").await?,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
