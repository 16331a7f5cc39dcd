//! Invoice arithmetic and invoice-number formatting.
//!
//! An invoice is an immutable snapshot of an obligation's amounts at
//! generation time. The arithmetic here is pure; the persistence layer
//! supplies the sequence value from its atomic counter and stores the
//! assembled snapshot.

use rust_decimal::Decimal;

use super::types::InvoiceStatus;

/// Point-in-time amounts for a new invoice.
///
/// Invariant: `balance == total_amount - amount_paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Obligation amount at generation time.
    pub total_amount: Decimal,
    /// Sum of the referenced payments.
    pub amount_paid: Decimal,
    /// Outstanding balance (may be negative on overpayment).
    pub balance: Decimal,
    /// `Paid` if nothing is outstanding, else `Issued`.
    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    /// Computes the snapshot amounts for an obligation.
    #[must_use]
    pub fn compute(total_amount: Decimal, amount_paid: Decimal) -> Self {
        let balance = balance(total_amount, amount_paid);
        Self {
            total_amount,
            amount_paid,
            balance,
            status: status_for_balance(balance),
        }
    }
}

/// Outstanding balance for an invoice.
#[must_use]
pub fn balance(total_amount: Decimal, amount_paid: Decimal) -> Decimal {
    total_amount - amount_paid
}

/// Invoice status at generation time: `Paid` iff nothing is outstanding.
#[must_use]
pub fn status_for_balance(balance: Decimal) -> InvoiceStatus {
    if balance <= Decimal::ZERO {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Issued
    }
}

/// Formats an invoice number as `INV-<year>-<5-digit-seq>`.
///
/// The sequence is a global monotonically increasing counter formatted
/// with the issuing year; it never resets per year. Sequences beyond
/// 99999 widen naturally.
#[must_use]
pub fn invoice_number(year: i32, sequence: i64) -> String {
    format!("INV-{year}-{sequence:05}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_number_format() {
        assert_eq!(invoice_number(2026, 1), "INV-2026-00001");
        assert_eq!(invoice_number(2026, 42), "INV-2026-00042");
        assert_eq!(invoice_number(2027, 99999), "INV-2027-99999");
    }

    #[test]
    fn test_invoice_number_widens_past_five_digits() {
        assert_eq!(invoice_number(2030, 100_000), "INV-2030-100000");
    }

    #[test]
    fn test_balance_arithmetic() {
        assert_eq!(balance(dec!(10000), dec!(4000)), dec!(6000));
        assert_eq!(balance(dec!(10000), dec!(10000)), dec!(0));
        assert_eq!(balance(dec!(100), dec!(150)), dec!(-50));
    }

    #[test]
    fn test_status_for_balance() {
        assert_eq!(status_for_balance(dec!(1)), InvoiceStatus::Issued);
        assert_eq!(status_for_balance(dec!(0)), InvoiceStatus::Paid);
        assert_eq!(status_for_balance(dec!(-50)), InvoiceStatus::Paid);
    }

    #[test]
    fn test_draft_compute() {
        let draft = InvoiceDraft::compute(dec!(10000), dec!(10000));
        assert_eq!(draft.balance, dec!(0));
        assert_eq!(draft.status, InvoiceStatus::Paid);

        let draft = InvoiceDraft::compute(dec!(10000), dec!(4000));
        assert_eq!(draft.balance, dec!(6000));
        assert_eq!(draft.status, InvoiceStatus::Issued);
    }
}
