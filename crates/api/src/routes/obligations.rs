//! Fee obligation routes.
//!
//! Creation and status overrides are admin-only. Reads check ownership:
//! students see only their own obligations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use bursar_core::billing::{self, BillingError, can_access, can_mutate};
use bursar_db::{
    ObligationRepository,
    entities::fee_obligations,
    repositories::obligation::{CreateObligationInput, ObligationFilter},
};

use super::{map_billing_error, ownership_guard, success, unknown_role_response};

/// Creates the obligation routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/obligations", post(create_obligation))
        .route("/obligations", get(list_obligations))
        .route("/obligations/{obligation_id}", get(get_obligation))
        .route("/obligations/{obligation_id}/status", put(override_status))
        .route(
            "/students/{student_id}/obligations",
            get(student_obligations),
        )
}

/// Request body for creating an obligation.
#[derive(Debug, Deserialize)]
pub struct CreateObligationRequest {
    /// Student who owes the fee.
    pub student_id: Uuid,
    /// Course the fee is for.
    pub course_id: Uuid,
    /// Amount owed.
    pub amount: Decimal,
    /// Payment deadline.
    pub due_date: NaiveDate,
    /// Optional description.
    pub description: Option<String>,
}

/// Request body for manually overriding an obligation's status.
#[derive(Debug, Deserialize)]
pub struct OverrideStatusRequest {
    /// New status: pending, partial, paid.
    pub status: String,
    /// Reason for the override. Required.
    pub reason: String,
}

/// Query filters for listing obligations.
#[derive(Debug, Deserialize, Default)]
pub struct ListObligationsQuery {
    /// Filter by status: pending, partial, paid.
    pub status: Option<String>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by course.
    pub course_id: Option<Uuid>,
}

/// Serializes an obligation row for API responses.
pub(crate) fn obligation_json(m: &fee_obligations::Model) -> serde_json::Value {
    json!({
        "id": m.id,
        "student_id": m.student_id,
        "course_id": m.course_id,
        "amount": m.amount,
        "due_date": m.due_date,
        "status": billing::FeeStatus::from(m.status.clone()).to_string(),
        "status_source": billing::StatusSource::from(m.status_source.clone()).to_string(),
        "override_reason": m.override_reason,
        "overridden_by": m.overridden_by,
        "overridden_at": m.overridden_at,
        "description": m.description,
        "created_by": m.created_by,
        "created_at": m.created_at,
        "updated_at": m.updated_at
    })
}

/// POST `/obligations` - Create a fee obligation. Admin only.
async fn create_obligation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateObligationRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let repo = ObligationRepository::new((*state.db).clone());
    let input = CreateObligationInput {
        student_id: payload.student_id,
        course_id: payload.course_id,
        amount: payload.amount,
        due_date: payload.due_date,
        description: payload.description,
        created_by: auth.user_id(),
    };

    match repo.create_obligation(input).await {
        Ok(obligation) => {
            info!(
                obligation_id = %obligation.id,
                student_id = %obligation.student_id,
                course_id = %obligation.course_id,
                "Fee obligation created"
            );
            success(
                StatusCode::CREATED,
                "Fee obligation created",
                obligation_json(&obligation),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/obligations` - List obligations with optional filters. Admin only.
async fn list_obligations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListObligationsQuery>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let status = match query.status.as_deref() {
        Some(s) => match s.parse::<billing::FeeStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                return map_billing_error(&BillingError::InvalidStatus(s.to_string()));
            }
        },
        None => None,
    };

    let repo = ObligationRepository::new((*state.db).clone());
    let filter = ObligationFilter {
        status,
        student_id: query.student_id,
        course_id: query.course_id,
    };

    match repo.list_obligations(filter).await {
        Ok(obligations) => {
            let data: Vec<_> = obligations.iter().map(obligation_json).collect();
            success(
                StatusCode::OK,
                "Obligations retrieved",
                json!({ "obligations": data }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/obligations/{obligation_id}` - Get one obligation.
///
/// Students may only read their own; anyone else's looks like a missing
/// obligation.
async fn get_obligation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(obligation_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = ObligationRepository::new((*state.db).clone());
    match repo.get_obligation(obligation_id).await {
        Ok(obligation) => {
            if let Err(e) = ownership_guard(
                role,
                auth.user_id(),
                obligation.student_id,
                BillingError::ObligationNotFound(obligation_id),
            ) {
                return map_billing_error(&e);
            }
            success(
                StatusCode::OK,
                "Obligation retrieved",
                obligation_json(&obligation),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/students/{student_id}/obligations` - List a student's obligations.
///
/// Admins may read any student's; students only their own.
async fn student_obligations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_access(role, auth.user_id(), student_id) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let repo = ObligationRepository::new((*state.db).clone());
    match repo.obligations_for_student(student_id).await {
        Ok(obligations) => {
            let data: Vec<_> = obligations.iter().map(obligation_json).collect();
            success(
                StatusCode::OK,
                "Obligations retrieved",
                json!({ "obligations": data }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// PUT `/obligations/{obligation_id}/status` - Manually override status. Admin only.
async fn override_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(obligation_id): Path<Uuid>,
    Json(payload): Json<OverrideStatusRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let Ok(status) = payload.status.parse::<billing::FeeStatus>() else {
        return map_billing_error(&BillingError::InvalidStatus(payload.status));
    };

    let repo = ObligationRepository::new((*state.db).clone());
    match repo
        .override_status(obligation_id, status, &payload.reason, auth.user_id())
        .await
    {
        Ok(obligation) => {
            info!(
                obligation_id = %obligation.id,
                status = %payload.status,
                "Obligation status manually overridden"
            );
            success(
                StatusCode::OK,
                "Obligation status overridden",
                obligation_json(&obligation),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}
