//! Payment ledger routes.
//!
//! All mutations are admin-only and return both the payment and the
//! obligation as reconciled in the same transaction, so clients never
//! observe an aggregate that disagrees with the ledger.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use bursar_core::billing::{self, BillingError, can_mutate};
use bursar_db::{
    ObligationRepository, PaymentRepository,
    entities::payments,
    repositories::payment::{RecordPaymentInput, UpdatePaymentInput},
};

use super::obligations::obligation_json;
use super::{map_billing_error, ownership_guard, success, unknown_role_response};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/obligations/{obligation_id}/payments", post(record_payment))
        .route("/obligations/{obligation_id}/payments", get(list_payments))
        .route("/payments/{payment_id}", put(update_payment))
        .route("/payments/{payment_id}", delete(delete_payment))
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
    /// Payment method: cash, bank_transfer, credit_card, debit_card, online, other.
    pub method: String,
    /// Date of payment. Defaults to today.
    pub payment_date: Option<NaiveDate>,
    /// External transaction reference.
    pub transaction_id: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Request body for correcting a payment. Absent fields are unchanged.
///
/// `transaction_id` and `notes` distinguish absent (unchanged) from an
/// explicit JSON `null` (cleared).
#[derive(Debug, Deserialize, Default)]
pub struct UpdatePaymentRequest {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New payment method.
    pub method: Option<String>,
    /// New payment date.
    pub payment_date: Option<NaiveDate>,
    /// New transaction reference. `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub transaction_id: Option<Option<String>>,
    /// New notes. `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Deserializes a field where absence and `null` mean different things.
///
/// serde collapses both to `None` by default; wrapping the parsed value in
/// `Some` here keeps `null` as `Some(None)` while `#[serde(default)]`
/// supplies `None` for an absent field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Serializes a payment row for API responses.
fn payment_json(m: &payments::Model) -> serde_json::Value {
    json!({
        "id": m.id,
        "student_id": m.student_id,
        "obligation_id": m.obligation_id,
        "amount": m.amount,
        "payment_date": m.payment_date,
        "method": billing::PaymentMethod::from(m.method.clone()).to_string(),
        "transaction_id": m.transaction_id,
        "notes": m.notes,
        "recorded_by": m.recorded_by,
        "created_at": m.created_at,
        "updated_at": m.updated_at
    })
}

/// POST `/obligations/{obligation_id}/payments` - Record a payment. Admin only.
async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(obligation_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let Ok(method) = payload.method.parse::<billing::PaymentMethod>() else {
        return map_billing_error(&BillingError::InvalidPaymentMethod(payload.method));
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let input = RecordPaymentInput {
        obligation_id,
        amount: payload.amount,
        method,
        payment_date: payload.payment_date,
        transaction_id: payload.transaction_id,
        notes: payload.notes,
        recorded_by: auth.user_id(),
    };

    match repo.record_payment(input).await {
        Ok(recorded) => {
            info!(
                payment_id = %recorded.payment.id,
                obligation_id = %obligation_id,
                amount = %recorded.payment.amount,
                "Payment recorded"
            );
            success(
                StatusCode::CREATED,
                "Payment recorded",
                json!({
                    "payment": payment_json(&recorded.payment),
                    "obligation": obligation_json(&recorded.obligation)
                }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// GET `/obligations/{obligation_id}/payments` - List an obligation's payments.
///
/// Students may only read payments on their own obligations; anyone
/// else's obligation looks missing.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(obligation_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let obligation_repo = ObligationRepository::new((*state.db).clone());
    let obligation = match obligation_repo.get_obligation(obligation_id).await {
        Ok(obligation) => obligation,
        Err(e) => return map_billing_error(&e),
    };
    if let Err(e) = ownership_guard(
        role,
        auth.user_id(),
        obligation.student_id,
        BillingError::ObligationNotFound(obligation_id),
    ) {
        return map_billing_error(&e);
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_payments(obligation_id).await {
        Ok(rows) => {
            let data: Vec<_> = rows.iter().map(payment_json).collect();
            success(
                StatusCode::OK,
                "Payments retrieved",
                json!({ "payments": data }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// PUT `/payments/{payment_id}` - Correct a recorded payment. Admin only.
async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let method = match payload.method.as_deref() {
        Some(s) => match s.parse::<billing::PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                return map_billing_error(&BillingError::InvalidPaymentMethod(s.to_string()));
            }
        },
        None => None,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let input = UpdatePaymentInput {
        amount: payload.amount,
        method,
        payment_date: payload.payment_date,
        transaction_id: payload.transaction_id,
        notes: payload.notes,
    };

    match repo.update_payment(payment_id, input).await {
        Ok(recorded) => {
            info!(payment_id = %payment_id, "Payment corrected");
            success(
                StatusCode::OK,
                "Payment updated",
                json!({
                    "payment": payment_json(&recorded.payment),
                    "obligation": obligation_json(&recorded.obligation)
                }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

/// DELETE `/payments/{payment_id}` - Remove a payment. Admin only.
async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !can_mutate(role) {
        return map_billing_error(&BillingError::AccessDenied);
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.delete_payment(payment_id).await {
        Ok(obligation) => {
            info!(payment_id = %payment_id, "Payment deleted");
            success(
                StatusCode::OK,
                "Payment deleted",
                json!({ "obligation": obligation_json(&obligation) }),
            )
        }
        Err(e) => map_billing_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An absent field leaves the value untouched, an explicit `null`
    /// clears it, and a string replaces it.
    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdatePaymentRequest =
            serde_json::from_str(r#"{"transaction_id": null, "notes": "corrected amount"}"#)
                .unwrap();
        assert_eq!(req.transaction_id, Some(None));
        assert_eq!(req.notes, Some(Some("corrected amount".to_string())));

        let req: UpdatePaymentRequest = serde_json::from_str(r#"{"amount": "150.00"}"#).unwrap();
        assert_eq!(req.transaction_id, None);
        assert_eq!(req.notes, None);

        let req: UpdatePaymentRequest =
            serde_json::from_str(r#"{"transaction_id": "TXN-42"}"#).unwrap();
        assert_eq!(req.transaction_id, Some(Some("TXN-42".to_string())));
    }
}
