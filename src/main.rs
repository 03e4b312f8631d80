use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use storefront::application::Storefront;
use storefront::config::{Cli, Command, Settings};
use storefront::domain::ports::{CustomerStore, OrderStore, ProductStore};
use storefront::infrastructure::in_memory::InMemoryStore;
use storefront::interfaces::csv::load_seeds;
use storefront::interfaces::json::{
    EligibilityView, OrderView, PaymentMethodsView, customer_page, product_page,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    #[cfg(feature = "storage-rocksdb")]
    {
        if let Some(db_path) = &cli.settings.db_path {
            // Use persistent storage (RocksDB)
            let store = storefront::infrastructure::rocksdb::RocksDBStore::open(db_path)?;
            return run(store, &cli.settings, cli.command).await;
        }
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    {
        if cli.settings.db_path.is_some() {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
    }

    run(InMemoryStore::new(), &cli.settings, cli.command).await
}

async fn run<S>(store: S, settings: &Settings, command: Command) -> Result<()>
where
    S: CustomerStore + OrderStore + ProductStore + 'static,
{
    let summary = load_seeds(&store, &settings.seed_files()).await?;
    for e in &summary.rejected {
        eprintln!("Error reading seed record: {}", e);
    }
    tracing::debug!(
        customers = summary.customers,
        products = summary.products,
        orders = summary.orders,
        "seed data loaded"
    );

    let registry = command.registry()?;
    let storefront = Storefront::new(store, settings.clock(), registry, settings.policy());
    let display = settings.display_offset;

    let output: Value = match command {
        Command::CanPurchase { customer, value } => {
            let eligibility = storefront.evaluate_purchase(customer, value).await?;
            to_json(&EligibilityView::new(customer, value, eligibility))?
        }
        Command::Pay {
            method,
            amount,
            customer,
            ..
        } => {
            let order = storefront.pay_order(&method, amount, customer).await?;
            to_json(&OrderView::new(&order, display))?
        }
        Command::Customers { page } => {
            to_json(&customer_page(storefront.list_customers(page).await?, display))?
        }
        Command::Products { page } => to_json(&product_page(storefront.list_products(page).await?))?,
        Command::Methods => to_json(&PaymentMethodsView {
            methods: storefront
                .payment_methods()
                .into_iter()
                .map(String::from)
                .collect(),
        })?,
    };

    println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    Ok(())
}

fn to_json<T: serde::Serialize>(view: &T) -> Result<Value> {
    serde_json::to_value(view).into_diagnostic()
}

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
