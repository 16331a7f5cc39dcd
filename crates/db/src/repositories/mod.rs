//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Storage-engine errors are translated into the billing
//! error taxonomy at this boundary; driver errors never leak upward.

pub mod directory;
pub mod invoice;
pub mod obligation;
pub mod payment;

#[cfg(test)]
mod ledger_integration_tests;

pub use invoice::{InvoiceFilter, InvoiceRepository, InvoiceWithPayments};
pub use obligation::{CreateObligationInput, ObligationFilter, ObligationRepository};
pub use payment::{PaymentRepository, RecordPaymentInput, RecordedPayment, UpdatePaymentInput};

use bursar_core::billing::BillingError;
use sea_orm::{DbErr, SqlErr};

/// Wraps a driver error as a billing database error.
pub(crate) fn db_error(e: DbErr) -> BillingError {
    BillingError::Database(e.to_string())
}

/// Translates a unique-constraint breach into the given conflict kind;
/// any other driver error stays a database error.
pub(crate) fn on_unique_violation(e: DbErr, conflict: BillingError) -> BillingError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let e = DbErr::Custom("connection reset".to_string());
        let mapped = on_unique_violation(
            e,
            BillingError::DuplicateInvoiceNumber("INV-2026-00001".to_string()),
        );
        assert!(matches!(mapped, BillingError::Database(_)));
    }

    #[test]
    fn test_db_error_preserves_message() {
        let mapped = db_error(DbErr::Custom("boom".to_string()));
        match mapped {
            BillingError::Database(msg) => assert!(msg.contains("boom")),
            other => panic!("expected Database, got {other:?}"),
        }
    }
}
