//! Invoice routes.
//!
//! Generation is admin-only; retrieval checks ownership against the
//! snapshotted student.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use bursar_core::billing::{self, BillingError, can_mutate};
use bursar_db::{
    InvoiceRepository,
    entities::{invoice_payments, invoices},
    repositories::invoice::{InvoiceFilter, InvoiceWithPayments},
};

use super::{map_billing_error, ownership_guard, success, unknown_role_response};

/// Creates the invoice routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/obligations/{obligation_id}/invoice",
            post(generate_invoice),
        )
        .route("/invoices", get(list_invoices))
        .route("/invoices/{invoice_id}", get(get_invoice))
}

/// Request body for generating an invoice.
#[derive(Debug, Deserialize, Default)]
pub struct GenerateInvoiceRequest {
    /// Optional notes to render on the invoice.
    pub notes: Option<String>,
}

/// Query filters for listing invoices.
#[derive(Debug, Deserialize, Default)]
pub struct ListInvoicesQuery {
    /// Filter by status: draft, issued, paid, overdue, cancelled.
    pub status: Option<String>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
}

/// Serializes an invoice row for API responses.
fn invoice_json(m: &invoices::Model) -> serde_json::Value {
    json!({
        "id": m.id,
        "invoice_number": m.invoice_number,
        "student_id": m.student_id,
        "obligation_id": m.obligation_id,
        "total_amount": m.total_amount,
        "amount_paid": m.amount_paid,
        "balance": m.balance,
        "status": billing::InvoiceStatus::from(m.status.clone()).to_string(),
        "issue_date": m.issue_date,
        "due_date": m.due_date,
        "notes": m.notes,
        "created_by": m.created_by,
        "created_at": m.created_at
    })
}

/// Serializes a snapshotted payment line.
fn invoice_payment_json(m: &invoice_payments::Model) -> serde_json::Value {
    json!({
        "position": m.position,
        "payment_id": m.payment_id,
        "amount": m.amount,
        "payment_date": m.payment_date,
        "method": billing::PaymentMethod::from(m.method.clone()).to_string()
    })
}

/// Serializes an invoice with its payment lines.
fn invoice_with_payments_json(iv: &InvoiceWithPayments) -> serde_json::Value {
    let lines: Vec<_> = iv.payments.iter().map(invoice_payment_json).collect();
    json!({
        "invoice": invoice_json(&iv.invoice),
        "payments": lines
    })
}

/// POST `/obligations/{obligation_id}/invoice` - Generate an invoice snapshot. Admin only.
async fn generate_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(obligation_id): Path<Uuid>,
    payload: Option<Json<GenerateInvoiceRequest>>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let notes = payload.and_then(|Json(p)| p.notes);

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo
        .generate_invoice(obligation_id, notes, auth.user_id())
        .await
    {
        Ok(generated) => {
            info!(
                invoice_id = %generated.invoice.id,
                invoice_number = %generated.invoice.invoice_number,
                obligation_id = %obligation_id,
                "Invoice generated"
            );
            success(
                StatusCode::CREATED,
                "Invoice generated",
                invoice_with_payments_json(&generated),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/invoices` - List invoices with optional filters.
///
/// Admins see everything; students see only their own invoices.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let status = match query.status.as_deref() {
        Some(s) => match s.parse::<billing::InvoiceStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                return map_billing_error(&BillingError::InvalidStatus(s.to_string()));
            }
        },
        None => None,
    };

    // Students are constrained to their own invoices regardless of filter.
    let student_id = if can_mutate(role) {
        query.student_id
    } else {
        Some(auth.user_id())
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let filter = InvoiceFilter { status, student_id };

    match repo.list_invoices(filter).await {
        Ok(rows) => {
            let data: Vec<_> = rows.iter().map(invoice_json).collect();
            success(
                StatusCode::OK,
                "Invoices retrieved",
                json!({ "invoices": data }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/invoices/{invoice_id}` - Get an invoice with its payment lines.
///
/// Students may only read their own; anyone else's looks missing.
async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get_invoice(invoice_id).await {
        Ok(iv) => {
            if let Err(e) = ownership_guard(
                role,
                auth.user_id(),
                iv.invoice.student_id,
                BillingError::InvoiceNotFound(invoice_id),
            ) {
                return map_billing_error(&e);
            }
            success(
                StatusCode::OK,
                "Invoice retrieved",
                invoice_with_payments_json(&iv),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}
