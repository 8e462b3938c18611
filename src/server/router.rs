//! Route table for the actions

use super::handlers::{
    AppState, create_invoice, delete_invoice, list_invoices, login, update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the action routes, rooted at the invoice-list view path
///
/// The path must have passed [`AppConfig::validate`](crate::config::AppConfig::validate).
///
/// With the default `/dashboard/invoices`:
/// - GET  /dashboard/invoices - cached list view
/// - POST /dashboard/invoices/create - create
/// - POST /dashboard/invoices/{id}/edit - update
/// - POST /dashboard/invoices/{id}/delete - delete
/// - POST /login - sign in
pub fn build_routes(state: AppState) -> Router {
    let base = state.invoices.list_path().to_string();

    Router::new()
        .route(&base, get(list_invoices))
        .route(&format!("{}/create", base), post(create_invoice))
        .route(&format!("{}/{{id}}/edit", base), post(update_invoice))
        .route(&format!("{}/{{id}}/delete", base), post(delete_invoice))
        .route("/login", post(login))
        .with_state(state)
}
