//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use uuid::Uuid;

use bursar_core::billing::{BillingError, Role, can_access};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod health;
pub mod invoices;
pub mod obligations;
pub mod payments;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except health requires authentication
    let protected_routes = Router::new()
        .merge(obligations::routes())
        .merge(payments::routes())
        .merge(invoices::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds a success envelope.
pub(crate) fn success(
    status: StatusCode,
    message: &str,
    data: serde_json::Value,
) -> Response {
    (
        status,
        Json(json!({
            "success": true,
            "message": message,
            "data": data
        })),
    )
        .into_response()
}

/// Maps a billing error to its HTTP response.
///
/// Storage and internal errors are logged and collapsed to an opaque
/// message; everything else surfaces its own code and description.
pub(crate) fn map_billing_error(e: &BillingError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %e, "Billing operation failed");
        return (
            status,
            Json(json!({
                "success": false,
                "error": e.error_code(),
                "message": "An internal error occurred"
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "success": false,
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}

/// Rejects callers whose role claim is not a known billing role.
pub(crate) fn unknown_role_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "success": false,
            "error": "ACCESS_DENIED",
            "message": "Caller role is not recognized"
        })),
    )
        .into_response()
}

/// Checks that the caller may read a resource owned by `owner_id`.
///
/// A non-owner gets the resource's not-found error rather than a
/// forbidden response, so a caller cannot distinguish "exists but not
/// yours" from "does not exist" by scanning identifiers.
pub(crate) fn ownership_guard(
    role: Role,
    caller_id: Uuid,
    owner_id: Uuid,
    not_found: BillingError,
) -> Result<(), BillingError> {
    if can_access(role, caller_id, owner_id) {
        Ok(())
    } else {
        Err(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_error_status_mapping() {
        let e = BillingError::ObligationNotFound(Uuid::new_v4());
        let response = map_billing_error(&e);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let e = BillingError::AccessDenied;
        let response = map_billing_error(&e);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let e = BillingError::Database("connection lost".to_string());
        let response = map_billing_error(&e);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// A student reading someone else's resource gets the same not-found
    /// response as a missing resource, never a forbidden.
    #[test]
    fn test_ownership_guard_hides_existence_from_non_owners() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let resource = Uuid::new_v4();

        let denied = ownership_guard(
            Role::Student,
            stranger,
            owner,
            BillingError::ObligationNotFound(resource),
        );
        let Err(e) = denied else {
            panic!("non-owner access must be rejected");
        };
        assert!(matches!(e, BillingError::ObligationNotFound(id) if id == resource));
        assert_eq!(map_billing_error(&e).status(), StatusCode::NOT_FOUND);

        assert!(ownership_guard(
            Role::Student,
            owner,
            owner,
            BillingError::ObligationNotFound(resource)
        )
        .is_ok());
        assert!(ownership_guard(
            Role::Admin,
            stranger,
            owner,
            BillingError::ObligationNotFound(resource)
        )
        .is_ok());
    }
}
