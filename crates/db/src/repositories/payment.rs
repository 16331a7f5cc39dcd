//! Payment ledger repository.
//!
//! Appending, correcting, or removing a payment and recomputing the parent
//! obligation's aggregate and status happen inside one transaction, with
//! the obligation row locked for the duration. Two payments recorded
//! concurrently against the same obligation therefore serialize, and the
//! final aggregate reflects both.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use bursar_core::billing::{self, BillingError, derive_status};

use crate::entities::{fee_obligations, payments, sea_orm_active_enums::StatusSource};

use super::db_error;

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Obligation the payment applies to.
    pub obligation_id: Uuid,
    /// Amount paid. Must be positive.
    pub amount: Decimal,
    /// How the payment was made.
    pub method: billing::PaymentMethod,
    /// Date of payment. Defaults to today when absent.
    pub payment_date: Option<chrono::NaiveDate>,
    /// External transaction reference.
    pub transaction_id: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
    /// User recording the payment.
    pub recorded_by: Uuid,
}

/// Input for correcting a recorded payment.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentInput {
    /// New amount. Must be positive when present.
    pub amount: Option<Decimal>,
    /// New payment method.
    pub method: Option<billing::PaymentMethod>,
    /// New payment date.
    pub payment_date: Option<chrono::NaiveDate>,
    /// New transaction reference. Outer `None` leaves it untouched,
    /// `Some(None)` clears it.
    pub transaction_id: Option<Option<String>>,
    /// New notes, same two-level convention as `transaction_id`.
    pub notes: Option<Option<String>>,
}

/// A payment mutation result: the ledger row and the obligation as
/// reconciled in the same transaction.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The payment row.
    pub payment: payments::Model,
    /// The obligation after aggregate and status recomputation.
    pub obligation: fee_obligations::Model,
}

/// Payment repository for ledger operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against an obligation.
    ///
    /// Inserts the ledger row and reconciles the obligation atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Amount is zero or negative
    /// - The obligation does not exist
    /// - Database operation fails
    pub async fn record_payment(
        &self,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, BillingError> {
        if input.amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount(input.amount));
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        let obligation = lock_obligation(&txn, input.obligation_id).await?;

        let now = Utc::now();
        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(obligation.student_id),
            obligation_id: Set(obligation.id),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date.unwrap_or_else(|| now.date_naive())),
            method: Set(input.method.into()),
            transaction_id: Set(input.transaction_id),
            notes: Set(input.notes),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let payment = payment.insert(&txn).await.map_err(db_error)?;

        let obligation = reconcile_obligation(&txn, obligation).await?;

        txn.commit().await.map_err(db_error)?;
        Ok(RecordedPayment {
            payment,
            obligation,
        })
    }

    /// Corrects a recorded payment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The new amount is zero or negative
    /// - The payment or its obligation does not exist
    /// - Database operation fails
    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        input: UpdatePaymentInput,
    ) -> Result<RecordedPayment, BillingError> {
        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(BillingError::NonPositiveAmount(amount));
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::PaymentNotFound(payment_id))?;

        let obligation = lock_obligation(&txn, payment.obligation_id).await?;

        // Re-read under the lock so a concurrent mutation cannot be overwritten.
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::PaymentNotFound(payment_id))?;

        let mut active: payments::ActiveModel = payment.into();
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(method) = input.method {
            active.method = Set(method.into());
        }
        if let Some(payment_date) = input.payment_date {
            active.payment_date = Set(payment_date);
        }
        if let Some(transaction_id) = input.transaction_id {
            active.transaction_id = Set(transaction_id);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());
        let payment = active.update(&txn).await.map_err(db_error)?;

        let obligation = reconcile_obligation(&txn, obligation).await?;

        txn.commit().await.map_err(db_error)?;
        Ok(RecordedPayment {
            payment,
            obligation,
        })
    }

    /// Removes a payment and reconciles its obligation.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment or its obligation does not exist,
    /// or the database operation fails.
    pub async fn delete_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<fee_obligations::Model, BillingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::PaymentNotFound(payment_id))?;

        let obligation = lock_obligation(&txn, payment.obligation_id).await?;

        payment.delete(&txn).await.map_err(db_error)?;

        let obligation = reconcile_obligation(&txn, obligation).await?;

        txn.commit().await.map_err(db_error)?;
        Ok(obligation)
    }

    /// Lists the payments for an obligation, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the obligation does not exist or the query fails.
    pub async fn list_payments(
        &self,
        obligation_id: Uuid,
    ) -> Result<Vec<payments::Model>, BillingError> {
        let _obligation = fee_obligations::Entity::find_by_id(obligation_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::ObligationNotFound(obligation_id))?;

        payments::Entity::find()
            .filter(payments::Column::ObligationId.eq(obligation_id))
            .order_by_desc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Returns the sum of all payments recorded against an obligation.
    ///
    /// # Errors
    ///
    /// Returns an error if the obligation does not exist or the query fails.
    pub async fn current_aggregate(&self, obligation_id: Uuid) -> Result<Decimal, BillingError> {
        let rows = self.list_payments(obligation_id).await?;
        Ok(aggregate_amount(&rows))
    }
}

/// Loads an obligation row with an exclusive row lock.
///
/// All payment mutations and invoice generation take this lock first so
/// aggregate recomputation never races.
pub(crate) async fn lock_obligation(
    txn: &DatabaseTransaction,
    obligation_id: Uuid,
) -> Result<fee_obligations::Model, BillingError> {
    fee_obligations::Entity::find_by_id(obligation_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or(BillingError::ObligationNotFound(obligation_id))
}

/// Recomputes an obligation's status from its full payment history.
///
/// Installs the derived status and clears any manual override; the ledger
/// is the source of truth once a payment mutation lands.
pub(crate) async fn reconcile_obligation(
    txn: &DatabaseTransaction,
    obligation: fee_obligations::Model,
) -> Result<fee_obligations::Model, BillingError> {
    let rows = payments::Entity::find()
        .filter(payments::Column::ObligationId.eq(obligation.id))
        .all(txn)
        .await
        .map_err(db_error)?;
    let paid = aggregate_amount(&rows);
    let status = derive_status(obligation.amount, paid);

    let mut active: fee_obligations::ActiveModel = obligation.into();
    active.status = Set(status.into());
    active.status_source = Set(StatusSource::Derived);
    active.override_reason = Set(None);
    active.overridden_by = Set(None);
    active.overridden_at = Set(None);
    active.updated_at = Set(Utc::now().into());

    active.update(txn).await.map_err(db_error)
}

/// Sums payment amounts. The aggregate is always recomputed from the full
/// row set rather than adjusted incrementally.
#[must_use]
pub fn aggregate_amount(rows: &[payments::Model]) -> Decimal {
    rows.iter().map(|p| p.amount).sum()
}

#[cfg(test)]
#[path = "payment_tests.rs"]
mod tests;
