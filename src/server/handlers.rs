//! HTTP handlers for the invoice and sign-in actions
//!
//! Handlers decode the request, call the action, and then apply the returned
//! outcome: invalidate stale views, redirect or render the form state.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::extract::FormData;
use crate::actions::{ActionOutcome, ActionState, AuthActions, AuthOutcome, Effects, InvoiceActions};
use crate::core::cache::ViewCache;
use crate::core::error::{ActionError, RequestError};
use crate::core::validation::InvoiceForm;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceActions,
    pub auth: AuthActions,
    pub views: Arc<dyn ViewCache>,
    /// Redirect target after a successful sign-in
    pub landing: String,
}

fn parse_id(raw: &str) -> Result<Uuid, ActionError> {
    Uuid::parse_str(raw).map_err(|_| {
        ActionError::Request(RequestError::InvalidId {
            value: raw.to_string(),
        })
    })
}

/// Invalidate every stale view, then navigate
///
/// A cache that fails to invalidate is logged and skipped: the write has
/// already happened and must still be reported as done.
async fn apply_effects(views: &dyn ViewCache, effects: Effects) -> Response {
    for path in &effects.revalidate {
        if let Err(e) = views.invalidate(path).await {
            tracing::warn!(path = %path, error = %e, "failed to invalidate view");
        }
    }

    match effects.redirect {
        Some(target) => Redirect::to(&target).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Turn an action outcome into a response
pub async fn respond(views: &dyn ViewCache, outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Success(effects) => apply_effects(views, effects).await,
        ActionOutcome::ValidationFailed(state) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
        }
        ActionOutcome::StoreFailed(state) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
        }
        ActionOutcome::NotFound(state) => (StatusCode::NOT_FOUND, Json(state)).into_response(),
    }
}

/// GET invoice list view, served from the view cache when fresh
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, ActionError> {
    let path = state.invoices.list_path();

    match state.views.get(path).await {
        Ok(Some(body)) => return Ok(Json(body)),
        Ok(None) => {}
        Err(e) => tracing::warn!(path, error = %e, "view cache read failed"),
    }

    // taken before the read so a write racing it keeps the view stale
    let generation = match state.views.generation(path).await {
        Ok(generation) => Some(generation),
        Err(e) => {
            tracing::warn!(path, error = %e, "view cache read failed");
            None
        }
    };

    let invoices = state.invoices.store().list().await?;
    let body = json!({
        "invoices": invoices,
        "count": invoices.len()
    });

    if let Some(generation) = generation {
        if let Err(e) = state.views.put(path, body.clone(), generation).await {
            tracing::warn!(path, error = %e, "view cache write failed");
        }
    }

    Ok(Json(body))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    FormData(form): FormData<InvoiceForm>,
) -> Response {
    let outcome = state
        .invoices
        .create_invoice_with_state(&ActionState::default(), &form)
        .await;
    respond(state.views.as_ref(), outcome).await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormData(form): FormData<InvoiceForm>,
) -> Result<Response, ActionError> {
    let id = parse_id(&id)?;
    let outcome = state
        .invoices
        .update_invoice_with_state(&id, &ActionState::default(), &form)
        .await;
    Ok(respond(state.views.as_ref(), outcome).await)
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ActionError> {
    let id = parse_id(&id)?;
    let outcome = state.invoices.delete_invoice(&id).await;
    Ok(respond(state.views.as_ref(), outcome).await)
}

pub async fn login(
    State(state): State<AppState>,
    FormData(fields): FormData<HashMap<String, String>>,
) -> Result<Response, ActionError> {
    match state.auth.authenticate(None, &fields).await? {
        AuthOutcome::SignedIn(_) => Ok(Redirect::to(&state.landing).into_response()),
        AuthOutcome::Rejected(code) => {
            Ok((StatusCode::UNAUTHORIZED, Json(json!({ "code": code }))).into_response())
        }
    }
}
