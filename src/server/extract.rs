//! Axum extractor for url-encoded action forms
//!
//! Wraps `axum::Form` so that an undecodable body is reported through
//! [`ActionError`] like every other failure, instead of axum's plain-text
//! rejection.

use crate::core::error::{ActionError, RequestError};
use axum::Form;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// Decoded form body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<AppState>,
///     FormData(form): FormData<InvoiceForm>,
/// ) -> Response {
///     // form fields are decoded, not yet validated
/// }
/// ```
pub struct FormData<T>(pub T);

impl<S, T> FromRequest<S> for FormData<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ActionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(FormData(value)),
            Err(e) => {
                tracing::debug!(error = %e, "form body rejected");
                Err(ActionError::Request(RequestError::InvalidBody {
                    message: e.body_text(),
                }))
            }
        }
    }
}
