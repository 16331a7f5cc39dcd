//! Invoice repository.
//!
//! Generation snapshots an obligation and its ledger into immutable rows.
//! Invoice numbers come from a single-row counter advanced with an atomic
//! `UPDATE ... RETURNING`, so concurrent generations can never mint the
//! same number and the sequence survives invoice deletion gaps.

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use bursar_core::billing::{self, BillingError, InvoiceDraft, invoice_number};

use crate::entities::{fee_obligations, invoice_payments, invoices, payments};

use super::payment::{aggregate_amount, lock_obligation};
use super::{db_error, on_unique_violation};

const NEXT_SEQUENCE_SQL: &str =
    "UPDATE invoice_sequences SET value = value + 1 WHERE id = 1 RETURNING value";

/// Filters for listing invoices. All present filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by invoice status.
    pub status: Option<billing::InvoiceStatus>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
}

/// An invoice with its snapshotted payment lines in ledger order.
#[derive(Debug, Clone)]
pub struct InvoiceWithPayments {
    /// Invoice record.
    pub invoice: invoices::Model,
    /// Payment lines, ordered by position.
    pub payments: Vec<invoice_payments::Model>,
}

/// Invoice repository for snapshot generation and retrieval.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates an invoice snapshot for an obligation.
    ///
    /// Captures the obligation amount, the full payment history, the
    /// computed balance, and a freshly minted invoice number, all under
    /// the obligation row lock so no payment can land mid-snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The obligation does not exist
    /// - The minted invoice number collides with an existing one
    /// - Database operation fails
    pub async fn generate_invoice(
        &self,
        obligation_id: Uuid,
        notes: Option<String>,
        created_by: Uuid,
    ) -> Result<InvoiceWithPayments, BillingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let obligation = lock_obligation(&txn, obligation_id).await?;

        let rows = payments::Entity::find()
            .filter(payments::Column::ObligationId.eq(obligation.id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(db_error)?;
        let amount_paid = aggregate_amount(&rows);
        let draft = InvoiceDraft::compute(obligation.amount, amount_paid);

        let now = Utc::now();
        let sequence = next_sequence(&txn).await?;
        let number = invoice_number(now.year(), sequence);

        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(number.clone()),
            student_id: Set(obligation.student_id),
            obligation_id: Set(obligation.id),
            total_amount: Set(draft.total_amount),
            amount_paid: Set(draft.amount_paid),
            balance: Set(draft.balance),
            status: Set(draft.status.into()),
            issue_date: Set(now.date_naive()),
            due_date: Set(obligation.due_date),
            notes: Set(notes),
            created_by: Set(created_by),
            created_at: Set(now.into()),
        };
        let invoice = invoice
            .insert(&txn)
            .await
            .map_err(|e| on_unique_violation(e, BillingError::DuplicateInvoiceNumber(number)))?;

        // Payment lines are denormalized copies; the snapshot stays intact
        // even if the underlying ledger rows are later corrected or removed.
        let mut lines = Vec::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| BillingError::Internal("invoice payment count overflow".into()))?;
            let line = invoice_payments::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice.id),
                payment_id: Set(Some(row.id)),
                position: Set(position),
                amount: Set(row.amount),
                payment_date: Set(row.payment_date),
                method: Set(row.method.clone()),
                created_at: Set(now.into()),
            };
            lines.push(line.insert(&txn).await.map_err(db_error)?);
        }

        txn.commit().await.map_err(db_error)?;
        Ok(InvoiceWithPayments {
            invoice,
            payments: lines,
        })
    }

    /// Gets an invoice with its payment lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is not found or the query fails.
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<InvoiceWithPayments, BillingError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::InvoiceNotFound(invoice_id))?;

        let lines = invoice_payments::Entity::find()
            .filter(invoice_payments::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(invoice_payments::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(InvoiceWithPayments {
            invoice,
            payments: lines,
        })
    }

    /// Lists invoices matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_invoices(
        &self,
        filter: InvoiceFilter,
    ) -> Result<Vec<invoices::Model>, BillingError> {
        let mut query = invoices::Entity::find();

        if let Some(status) = filter.status {
            let status: crate::entities::sea_orm_active_enums::InvoiceStatus = status.into();
            query = query.filter(invoices::Column::Status.eq(status));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(invoices::Column::StudentId.eq(student_id));
        }

        query
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}

/// Advances the global invoice counter and returns the new value.
///
/// A single `UPDATE ... RETURNING` keeps increment and read atomic, so two
/// transactions can never observe the same value.
async fn next_sequence(txn: &DatabaseTransaction) -> Result<i64, BillingError> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, NEXT_SEQUENCE_SQL);
    let row = txn
        .query_one(stmt)
        .await
        .map_err(db_error)?
        .ok_or_else(|| BillingError::Internal("invoice sequence row missing".to_string()))?;
    row.try_get("", "value").map_err(db_error)
}
