//! Fee billing logic.
//!
//! This module implements the billing ledger core:
//! - Fee obligation and payment domain types
//! - Status derivation from the payment aggregate
//! - Invoice arithmetic and invoice-number formatting
//! - Access policy predicates (admin vs owning student)
//! - Error types for billing operations

pub mod error;
pub mod invoice;
pub mod policy;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod invoice_props;
#[cfg(test)]
mod reconcile_props;

pub use error::BillingError;
pub use invoice::{InvoiceDraft, balance, invoice_number, status_for_balance};
pub use policy::{Role, can_access, can_mutate};
pub use reconcile::derive_status;
pub use types::{FeeStatus, InvoiceStatus, PaymentMethod, StatusSource};
