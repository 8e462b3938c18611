//! Credential sign-in for invoices
//!
//! The sign-in action talks to an [`IdentityProvider`]. Providers report
//! failures as an [`AuthFailure`] whose message carries a marker for the one
//! case the action recognizes: rejected credentials. Everything else is left
//! for the caller's generic error boundary.

use crate::core::store::UserStore;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Scheme name for email + password sign-in
pub const CREDENTIALS_SCHEME: &str = "credentials";

/// Substring a provider puts in the failure message when credentials are rejected
pub const INVALID_CREDENTIALS_MARKER: &str = "CredentialsSignin";

/// Short code handed back to the form for rejected credentials
pub const INVALID_CREDENTIALS_CODE: &str = "CredentialSignin";

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
}

/// Established session returned by a successful sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A failed sign-in as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure carrying the invalid-credentials marker
    pub fn invalid_credentials() -> Self {
        Self::new(INVALID_CREDENTIALS_MARKER)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of matching a failure against the known markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthClassification {
    /// A known failure, reduced to its short code
    Recognized(&'static str),
    /// Anything else, returned untouched
    Unrecognized(AuthFailure),
}

/// Classify a provider failure
pub fn classify_auth_failure(failure: AuthFailure) -> AuthClassification {
    if failure.message().contains(INVALID_CREDENTIALS_MARKER) {
        AuthClassification::Recognized(INVALID_CREDENTIALS_CODE)
    } else {
        AuthClassification::Unrecognized(failure)
    }
}

/// Trait for identity providers
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check the submitted fields under `scheme` and establish a session
    async fn sign_in(
        &self,
        scheme: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Session, AuthFailure>;
}

#[derive(Debug, Validate)]
struct Credentials {
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    password: String,
}

/// Email + password provider backed by a [`UserStore`]
pub struct CredentialsProvider {
    users: Arc<dyn UserStore>,
}

impl CredentialsProvider {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    fn parse(fields: &HashMap<String, String>) -> Option<Credentials> {
        let credentials = Credentials {
            email: fields.get("email")?.clone(),
            password: fields.get("password")?.clone(),
        };
        credentials.validate().ok()?;
        Some(credentials)
    }
}

#[async_trait]
impl IdentityProvider for CredentialsProvider {
    async fn sign_in(
        &self,
        scheme: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Session, AuthFailure> {
        if scheme != CREDENTIALS_SCHEME {
            return Err(AuthFailure::new(format!(
                "unsupported sign-in scheme: {}",
                scheme
            )));
        }

        let Some(credentials) = Self::parse(fields) else {
            tracing::debug!("credentials rejected: malformed email or password");
            return Err(AuthFailure::invalid_credentials());
        };

        let user = match self.users.find_by_email(&credentials.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!("credentials rejected: unknown email");
                return Err(AuthFailure::invalid_credentials());
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch user");
                return Err(AuthFailure::new("failed to fetch user"));
            }
        };

        let hash = user.password.clone();
        let password = credentials.password;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthFailure::new(format!("password check aborted: {}", e)))?;

        if !matches {
            tracing::debug!(user_id = %user.id, "credentials rejected: wrong password");
            return Err(AuthFailure::invalid_credentials());
        }

        tracing::info!(user_id = %user.id, "user signed in");
        Ok(Session::from(&user))
    }
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a PHC string; malformed hashes never match
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
