//! Property-based tests for invoice arithmetic and numbering.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::invoice::{InvoiceDraft, invoice_number};
use super::types::InvoiceStatus;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `balance == total_amount - amount_paid` for every computed draft.
    #[test]
    fn prop_balance_arithmetic(total in amount_strategy(), paid in amount_strategy()) {
        let draft = InvoiceDraft::compute(total, paid);
        prop_assert_eq!(draft.balance, total - paid);
    }

    /// Status is `paid` exactly when nothing is outstanding.
    #[test]
    fn prop_status_matches_balance(total in amount_strategy(), paid in amount_strategy()) {
        let draft = InvoiceDraft::compute(total, paid);
        if draft.balance <= Decimal::ZERO {
            prop_assert_eq!(draft.status, InvoiceStatus::Paid);
        } else {
            prop_assert_eq!(draft.status, InvoiceStatus::Issued);
        }
    }

    /// Distinct sequence values always format to distinct invoice numbers
    /// within a year, so counter uniqueness carries over to the numbers.
    #[test]
    fn prop_distinct_sequences_distinct_numbers(
        year in 2020i32..2100i32,
        a in 1i64..10_000_000i64,
        b in 1i64..10_000_000i64,
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(invoice_number(year, a), invoice_number(year, b));
    }

    /// Numbers keep the `INV-<year>-` prefix and zero-pad to at least
    /// five digits.
    #[test]
    fn prop_number_format(year in 2020i32..2100i32, seq in 1i64..10_000_000i64) {
        let number = invoice_number(year, seq);
        let prefix = format!("INV-{year}-");
        prop_assert!(number.starts_with(&prefix));
        let digits = &number[prefix.len()..];
        prop_assert!(digits.len() >= 5);
        prop_assert_eq!(digits.parse::<i64>().unwrap(), seq);
    }
}
