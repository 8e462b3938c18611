//! Server module exposing the actions over HTTP
//!
//! This module provides a `ServerBuilder` that wires the stores, the identity
//! provider and the view cache into an axum router.

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
