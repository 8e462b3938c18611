//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_routes;
use crate::actions::{AuthActions, InvoiceActions};
use crate::config::AppConfig;
use crate::core::auth::IdentityProvider;
use crate::core::cache::{InMemoryViewCache, ViewCache};
use crate::core::store::InvoiceStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the action server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_invoice_store(InMemoryInvoiceStore::new())
///     .with_identity_provider(CredentialsProvider::new(users))
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    invoice_store: Option<Arc<dyn InvoiceStore>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    view_cache: Option<Arc<dyn ViewCache>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default_config(),
            invoice_store: None,
            identity_provider: None,
            view_cache: None,
        }
    }

    /// Use `config` for view paths, sign-in settings and the bind address
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the invoice store (required)
    pub fn with_invoice_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.invoice_store = Some(Arc::new(store));
        self
    }

    /// Set an already shared invoice store (required)
    pub fn with_shared_invoice_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.invoice_store = Some(store);
        self
    }

    /// Set the identity provider (required)
    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity_provider = Some(Arc::new(provider));
        self
    }

    /// Set the view cache; an in-memory cache is used otherwise
    pub fn with_view_cache(mut self, cache: Arc<dyn ViewCache>) -> Self {
        self.view_cache = Some(cache);
        self
    }

    /// Assemble the handler state
    pub fn build_state(self) -> Result<AppState> {
        self.config.validate()?;

        let store = self.invoice_store.ok_or_else(|| {
            anyhow::anyhow!("InvoiceStore is required. Call .with_invoice_store()")
        })?;

        let provider = self.identity_provider.ok_or_else(|| {
            anyhow::anyhow!("IdentityProvider is required. Call .with_identity_provider()")
        })?;

        let views = self
            .view_cache
            .unwrap_or_else(|| Arc::new(InMemoryViewCache::new()));

        Ok(AppState {
            invoices: InvoiceActions::new(store, self.config.views.invoices.clone()),
            auth: AuthActions::new(provider, self.config.auth.scheme.clone()),
            views,
            landing: self.config.auth.landing.clone(),
        })
    }

    /// Build the final router with request tracing
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;
        Ok(build_routes(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `server.bind` from the configuration
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::CredentialsProvider;
    use crate::storage::{InMemoryInvoiceStore, InMemoryUserStore};

    #[test]
    fn test_build_without_store_fails() {
        let result = ServerBuilder::new()
            .with_identity_provider(CredentialsProvider::new(Arc::new(InMemoryUserStore::new())))
            .build();
        let err = result.err().expect("build should fail without a store");
        assert!(err.to_string().contains("InvoiceStore is required"));
    }

    #[test]
    fn test_build_without_provider_fails() {
        let result = ServerBuilder::new()
            .with_invoice_store(InMemoryInvoiceStore::new())
            .build();
        let err = result.err().expect("build should fail without a provider");
        assert!(err.to_string().contains("IdentityProvider is required"));
    }

    #[test]
    fn test_build_rejects_root_list_path() {
        let mut config = AppConfig::default_config();
        config.views.invoices = "/".to_string();

        let result = ServerBuilder::new()
            .with_config(config)
            .with_invoice_store(InMemoryInvoiceStore::new())
            .with_identity_provider(CredentialsProvider::new(Arc::new(InMemoryUserStore::new())))
            .build();

        let err = result.err().expect("build should refuse a root list path");
        assert!(err.to_string().contains("views.invoices"));
    }

    #[test]
    fn test_state_uses_configured_paths() {
        let mut config = AppConfig::default_config();
        config.views.invoices = "/billing/invoices".to_string();
        config.auth.landing = "/billing".to_string();

        let state = ServerBuilder::new()
            .with_config(config)
            .with_invoice_store(InMemoryInvoiceStore::new())
            .with_identity_provider(CredentialsProvider::new(Arc::new(InMemoryUserStore::new())))
            .build_state()
            .expect("state should build");

        assert_eq!(state.invoices.list_path(), "/billing/invoices");
        assert_eq!(state.landing, "/billing");
    }
}
