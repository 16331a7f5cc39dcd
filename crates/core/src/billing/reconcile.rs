//! Status derivation from the payment aggregate.
//!
//! Reconciliation is the act of recomputing an obligation's status from
//! its current ledger aggregate. The derivation is a pure function so every
//! caller (payment recording, correction, deletion) shares one definition.

use rust_decimal::Decimal;

use super::types::FeeStatus;

/// Derives the fee status for an obligation.
///
/// - `paid` when the aggregate covers the amount owed (overpayment
///   saturates here; no credit is tracked for the surplus)
/// - `pending` when nothing has been paid
/// - `partial` otherwise
#[must_use]
pub fn derive_status(amount_owed: Decimal, amount_paid: Decimal) -> FeeStatus {
    if amount_paid >= amount_owed {
        FeeStatus::Paid
    } else if amount_paid.is_zero() || amount_paid.is_sign_negative() {
        FeeStatus::Pending
    } else {
        FeeStatus::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10000), dec!(0), FeeStatus::Pending)]
    #[case(dec!(10000), dec!(4000), FeeStatus::Partial)]
    #[case(dec!(10000), dec!(9999.99), FeeStatus::Partial)]
    #[case(dec!(10000), dec!(10000), FeeStatus::Paid)]
    #[case(dec!(10000), dec!(12500), FeeStatus::Paid)]
    #[case(dec!(0.01), dec!(0), FeeStatus::Pending)]
    fn test_derive_status(
        #[case] owed: Decimal,
        #[case] paid: Decimal,
        #[case] expected: FeeStatus,
    ) {
        assert_eq!(derive_status(owed, paid), expected);
    }

    #[test]
    fn test_overpayment_saturates_at_paid() {
        // The surplus is not tracked; status simply saturates.
        assert_eq!(derive_status(dec!(100), dec!(1000)), FeeStatus::Paid);
    }

    #[test]
    fn test_zero_amount_obligation_derives_paid() {
        // amount > 0 is enforced at creation; if a zero-amount obligation
        // ever exists, it is vacuously paid.
        assert_eq!(derive_status(dec!(0), dec!(0)), FeeStatus::Paid);
    }
}
