//! Database enum mappings for billing types.
//!
//! These mirror the pure enums in `bursar_core::billing::types`; the
//! `From` impls keep the two layers in lockstep.

use bursar_core::billing;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee obligation status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_status")]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// No payment recorded yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Whether the persisted status is reconciler-derived or manually overridden.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "status_source")]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Reconciler-derived.
    #[sea_orm(string_value = "derived")]
    Derived,
    /// Manually overridden by an administrator.
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Credit card.
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Debit card.
    #[sea_orm(string_value = "debit_card")]
    DebitCard,
    /// Online payment.
    #[sea_orm(string_value = "online")]
    Online,
    /// Any other method.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Invoice status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Drafted, not yet issued.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Issued with an outstanding balance.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Issued with no outstanding balance.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Past due date.
    #[sea_orm(string_value = "overdue")]
    Overdue,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<billing::FeeStatus> for FeeStatus {
    fn from(value: billing::FeeStatus) -> Self {
        match value {
            billing::FeeStatus::Pending => Self::Pending,
            billing::FeeStatus::Partial => Self::Partial,
            billing::FeeStatus::Paid => Self::Paid,
        }
    }
}

impl From<FeeStatus> for billing::FeeStatus {
    fn from(value: FeeStatus) -> Self {
        match value {
            FeeStatus::Pending => Self::Pending,
            FeeStatus::Partial => Self::Partial,
            FeeStatus::Paid => Self::Paid,
        }
    }
}

impl From<billing::StatusSource> for StatusSource {
    fn from(value: billing::StatusSource) -> Self {
        match value {
            billing::StatusSource::Derived => Self::Derived,
            billing::StatusSource::Manual => Self::Manual,
        }
    }
}

impl From<StatusSource> for billing::StatusSource {
    fn from(value: StatusSource) -> Self {
        match value {
            StatusSource::Derived => Self::Derived,
            StatusSource::Manual => Self::Manual,
        }
    }
}

impl From<billing::PaymentMethod> for PaymentMethod {
    fn from(value: billing::PaymentMethod) -> Self {
        match value {
            billing::PaymentMethod::Cash => Self::Cash,
            billing::PaymentMethod::BankTransfer => Self::BankTransfer,
            billing::PaymentMethod::CreditCard => Self::CreditCard,
            billing::PaymentMethod::DebitCard => Self::DebitCard,
            billing::PaymentMethod::Online => Self::Online,
            billing::PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<PaymentMethod> for billing::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::CreditCard => Self::CreditCard,
            PaymentMethod::DebitCard => Self::DebitCard,
            PaymentMethod::Online => Self::Online,
            PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<billing::InvoiceStatus> for InvoiceStatus {
    fn from(value: billing::InvoiceStatus) -> Self {
        match value {
            billing::InvoiceStatus::Draft => Self::Draft,
            billing::InvoiceStatus::Issued => Self::Issued,
            billing::InvoiceStatus::Paid => Self::Paid,
            billing::InvoiceStatus::Overdue => Self::Overdue,
            billing::InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for billing::InvoiceStatus {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Issued => Self::Issued,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}
