//! Billing domain types.
//!
//! This module defines the enumerations shared by the obligation ledger
//! and the invoice snapshot layer. All amounts in the system are
//! `rust_decimal::Decimal` values in the smallest currency unit.

use serde::{Deserialize, Serialize};

/// Fee obligation status, derived from the payment aggregate.
///
/// The status is a projection of `(amount_owed, amount_paid)` and must
/// always match the reconciler's output unless an audited manual
/// override is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// No payment recorded yet.
    Pending,
    /// Some payment recorded, but less than the amount owed.
    Partial,
    /// Payments cover the amount owed (overpayment saturates here).
    Paid,
}

/// Whether an obligation's persisted status came from the reconciler
/// or from an administrative override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Status equals the reconciler's derivation.
    Derived,
    /// Status was set by an administrator with a recorded reason.
    Manual,
}

/// Payment method classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Credit card.
    CreditCard,
    /// Debit card.
    DebitCard,
    /// Online payment (settled externally before recording).
    Online,
    /// Any other method.
    Other,
}

/// Invoice status lifecycle.
///
/// The primary workflow only produces `Issued` and `Paid`; the remaining
/// states are administrative extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Drafted, not yet issued.
    Draft,
    /// Issued with an outstanding balance.
    Issued,
    /// Issued with no outstanding balance.
    Paid,
    /// Past due date (administrative transition).
    Overdue,
    /// Cancelled (administrative transition).
    Cancelled,
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Partial => write!(f, "partial"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown fee status: {s}")),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::CreditCard => write!(f, "credit_card"),
            Self::DebitCard => write!(f, "debit_card"),
            Self::Online => write!(f, "online"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "online" => Ok(Self::Online),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Issued => write!(f, "issued"),
            Self::Paid => write!(f, "paid"),
            Self::Overdue => write!(f, "overdue"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "issued" => Ok(Self::Issued),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown invoice status: {s}")),
        }
    }
}

impl std::fmt::Display for StatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Derived => write!(f, "derived"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for StatusSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "derived" => Ok(Self::Derived),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown status source: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fee_status_round_trip() {
        for status in [FeeStatus::Pending, FeeStatus::Partial, FeeStatus::Paid] {
            assert_eq!(FeeStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(FeeStatus::from_str("overdue").is_err());
    }

    #[test]
    fn test_payment_method_round_trip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::BankTransfer,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Online,
            PaymentMethod::Other,
        ] {
            assert_eq!(
                PaymentMethod::from_str(&method.to_string()).unwrap(),
                method
            );
        }
        assert!(PaymentMethod::from_str("barter").is_err());
    }

    #[test]
    fn test_invoice_status_round_trip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(
                InvoiceStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_status_source_round_trip() {
        assert_eq!(
            StatusSource::from_str("derived").unwrap(),
            StatusSource::Derived
        );
        assert_eq!(
            StatusSource::from_str("MANUAL").unwrap(),
            StatusSource::Manual
        );
        assert!(StatusSource::from_str("auto").is_err());
    }

    #[test]
    fn test_case_insensitive_parsing() {
        assert_eq!(FeeStatus::from_str("PAID").unwrap(), FeeStatus::Paid);
        assert_eq!(
            PaymentMethod::from_str("Bank_Transfer").unwrap(),
            PaymentMethod::BankTransfer
        );
    }
}
