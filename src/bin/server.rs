//! Invoice action server
//!
//! Reads `INVOICES_CONFIG` (YAML) when set, then applies `POSTGRES_URL` and
//! `BIND_ADDR`. Without a database url (or without the `postgres` feature)
//! everything runs in memory with one demo user.

use anyhow::Result;
use invoices::prelude::*;
use tracing_subscriber::EnvFilter;

const DEMO_EMAIL: &str = "user@nextmail.com";
const DEMO_PASSWORD: &str = "123456";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,invoices=debug")),
        )
        .init();

    let config = match std::env::var("INVOICES_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default_config(),
    }
    .with_env_overrides();

    let builder = ServerBuilder::new().with_config(config.clone());

    #[cfg(feature = "postgres")]
    if config.database.url.is_some() {
        let pool = invoices::storage::postgres::connect(&config.database).await?;
        invoices::storage::postgres::ensure_schema(&pool).await?;
        tracing::info!("using PostgreSQL stores");

        let users: Arc<dyn UserStore> = Arc::new(PostgresUserStore::new(pool.clone()));
        return builder
            .with_invoice_store(PostgresInvoiceStore::new(pool))
            .with_identity_provider(CredentialsProvider::new(users))
            .serve()
            .await;
    }

    tracing::warn!(email = DEMO_EMAIL, "using in-memory stores with a demo user");
    let users = InMemoryUserStore::new();
    users.add(User {
        id: Uuid::new_v4(),
        name: "Demo User".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: invoices::core::auth::hash_password(DEMO_PASSWORD)
            .map_err(|e| anyhow::anyhow!("failed to hash demo password: {}", e))?,
    })?;

    builder
        .with_invoice_store(InMemoryInvoiceStore::new())
        .with_identity_provider(CredentialsProvider::new(Arc::new(users)))
        .serve()
        .await
}
