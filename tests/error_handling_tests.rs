//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses never carry store or provider internals
//! - Field errors surface as response details
//! - Conversions into ActionError pick the right category

use axum::http::StatusCode;
use axum::response::IntoResponse;
use invoices::prelude::*;

fn store_error() -> StoreError {
    StoreError::Query {
        backend: "PostgreSQL".to_string(),
        message: "relation \"invoices\" does not exist at db.internal:5432".to_string(),
    }
}

fn field_errors() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.push("customerId", "select a customer");
    errors.push("amount", "enter an amount");
    errors
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_field_errors_return_422() {
        let err = ActionError::from(field_errors());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_invalid_body_returns_400() {
        let err = ActionError::from(RequestError::InvalidBody {
            message: "Failed to deserialize form body".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err = ActionError::from(store_error());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unrecognized_auth_failure_returns_500() {
        let err = ActionError::from(AuthFailure::new("CallbackRouteError"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_id_returns_400() {
        let err = ActionError::from(RequestError::InvalidId {
            value: "42".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_error_codes_per_category() {
        let cases: Vec<(ActionError, &str)> = vec![
            (field_errors().into(), "VALIDATION_ERROR"),
            (store_error().into(), "STORAGE_ERROR"),
            (AuthFailure::new("boom").into(), "AUTH_ERROR"),
            (
                RequestError::InvalidId {
                    value: "x".to_string(),
                }
                .into(),
                "INVALID_ID",
            ),
            (
                RequestError::InvalidBody {
                    message: "x".to_string(),
                }
                .into(),
                "INVALID_BODY",
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.error_code(), code, "for {}", err);
        }
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[test]
    fn test_storage_response_hides_cause() {
        let response = ActionError::from(store_error()).to_response();

        assert_eq!(response.code, "STORAGE_ERROR");
        assert_eq!(response.message, "database error");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_auth_response_hides_provider_message() {
        let response =
            ActionError::from(AuthFailure::new("token endpoint 10.0.0.7 down")).to_response();

        assert!(!response.message.contains("10.0.0.7"));
    }

    #[test]
    fn test_validation_response_lists_fields() {
        let response = ActionError::from(field_errors()).to_response();

        let details = response.details.expect("field details");
        assert_eq!(details["fields"].as_object().unwrap().len(), 2);
        assert_eq!(details["fields"]["customerId"][0], "select a customer");
        assert_eq!(details["fields"]["amount"][0], "enter an amount");
    }

    #[test]
    fn test_invalid_body_keeps_rejection_text() {
        let response = ActionError::from(RequestError::InvalidBody {
            message: "Form requests must have `Content-Type: application/x-www-form-urlencoded`"
                .to_string(),
        })
        .to_response();

        assert_eq!(response.code, "INVALID_BODY");
        assert!(response.message.starts_with("Invalid request body: "));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_invalid_id_message_names_value() {
        let response = ActionError::from(RequestError::InvalidId {
            value: "abc".to_string(),
        })
        .to_response();

        assert_eq!(response.message, "Invalid invoice id: abc");
    }

    #[tokio::test]
    async fn test_into_response_sets_status_and_json_body() {
        let response = ActionError::from(store_error()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert!(!body.to_string().contains("db.internal"));
    }
}

// =============================================================================
// Display and Source Tests
// =============================================================================

mod display_tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_field_errors_display() {
        let err = ActionError::from(field_errors());
        assert_eq!(
            err.to_string(),
            "Validation errors: customerId: select a customer, amount: enter an amount"
        );
    }

    #[test]
    fn test_auth_display_is_provider_message() {
        let err = ActionError::from(AuthFailure::new("CallbackRouteError"));
        assert_eq!(err.to_string(), "CallbackRouteError");
    }

    #[test]
    fn test_source_is_wrapped_error() {
        let err = ActionError::from(store_error());
        let source = err.source().expect("store error as source");
        assert!(source.to_string().contains("query error"));
    }

    #[test]
    fn test_matching_on_category() {
        let err: ActionError = field_errors().into();
        match err {
            ActionError::Validation(ValidationError::FieldErrors(errors)) => {
                assert_eq!(errors.first(), Some(("customerId", "select a customer")));
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }
}
