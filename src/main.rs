use dotenvy::dotenv;
use finance_tracker::config::load_app_configuration;
use finance_tracker::core::summary::{format_currency, load_dashboard};
use finance_tracker::db::Store;
use finance_tracker::errors::Result;
use finance_tracker::repository::TransactionRepository;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Set to print a one-off summary for that user after startup.
const USER_ID_VAR: &str = "FINANCE_USER_ID";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal
    dotenv().ok();

    // 3. Load settings
    let app_config = load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Open the store, creating the schema if needed
    let store = Store::open(&app_config)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Optional summary
    if let Ok(user_id) = env::var(USER_ID_VAR) {
        let dashboard = load_dashboard(store.connection(), &user_id).await?;
        let recent = TransactionRepository::new(store.clone())
            .with_recent_limit(app_config.recent_limit)
            .recent(&user_id)
            .current()
            .await?;
        info!(
            %user_id,
            balance = %format_currency(dashboard.balance),
            income = %format_currency(dashboard.total_income),
            expense = %format_currency(dashboard.total_expense),
            categories = dashboard.categories.len(),
            recent = recent.len(),
            "Summary"
        );
        for transaction in &dashboard.recent_transactions {
            info!(
                kind = transaction.kind.label(),
                amount = %format_currency(transaction.amount),
                date = %transaction.date.format("%Y-%m-%d"),
                "Recent"
            );
        }
        for slice in &dashboard.category_spending {
            info!(
                category = %slice.category_name,
                amount = %format_currency(slice.amount),
                "Spending"
            );
        }
    }

    Ok(())
}
