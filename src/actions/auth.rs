//! Credential sign-in action

use crate::core::auth::{AuthClassification, IdentityProvider, Session, classify_auth_failure};
use crate::core::error::ActionError;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a sign-in attempt that did not escalate
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The provider established a session
    SignedIn(Session),
    /// The provider rejected the credentials; carries the short code
    Rejected(&'static str),
}

/// Sign-in over a shared identity provider
#[derive(Clone)]
pub struct AuthActions {
    provider: Arc<dyn IdentityProvider>,
    scheme: String,
}

impl AuthActions {
    pub fn new(provider: Arc<dyn IdentityProvider>, scheme: impl Into<String>) -> Self {
        Self {
            provider,
            scheme: scheme.into(),
        }
    }

    /// Forward every submitted field to the provider
    ///
    /// Rejected credentials come back as `Ok(AuthOutcome::Rejected(code))`.
    /// Any other provider failure is returned unchanged as
    /// `Err(ActionError::Auth)` for the caller's error boundary. The previous
    /// attempt's code is ignored.
    pub async fn authenticate(
        &self,
        _prev_state: Option<&str>,
        fields: &HashMap<String, String>,
    ) -> Result<AuthOutcome, ActionError> {
        match self.provider.sign_in(&self.scheme, fields).await {
            Ok(session) => Ok(AuthOutcome::SignedIn(session)),
            Err(failure) => match classify_auth_failure(failure) {
                AuthClassification::Recognized(code) => {
                    tracing::info!(code, "sign-in rejected");
                    Ok(AuthOutcome::Rejected(code))
                }
                AuthClassification::Unrecognized(failure) => {
                    tracing::warn!(error = %failure, "sign-in failed");
                    Err(ActionError::Auth(failure))
                }
            },
        }
    }
}
