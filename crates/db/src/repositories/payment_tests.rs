//! Property-based tests for the payment ledger aggregate.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use bursar_core::billing::{FeeStatus, derive_status};

use crate::entities::{payments, sea_orm_active_enums::PaymentMethod};
use crate::repositories::payment::aggregate_amount;

/// Strategy for generating positive payment amounts (up to 10,000.00).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Creates a mock payment row with the given amount.
fn mock_payment(amount: Decimal) -> payments::Model {
    payments::Model {
        id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        obligation_id: Uuid::new_v4(),
        amount,
        payment_date: Utc::now().date_naive(),
        method: PaymentMethod::Cash,
        transaction_id: None,
        notes: None,
        recorded_by: Uuid::new_v4(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[test]
fn test_aggregate_of_empty_ledger_is_zero() {
    assert_eq!(aggregate_amount(&[]), Decimal::ZERO);
}

#[test]
fn test_aggregate_sums_all_rows() {
    let rows = vec![
        mock_payment(dec!(100.00)),
        mock_payment(dec!(250.50)),
        mock_payment(dec!(0.01)),
    ];
    assert_eq!(aggregate_amount(&rows), dec!(350.51));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Aggregate equals the sum of individual amounts regardless of order.
    #[test]
    fn prop_aggregate_is_order_independent(
        amounts in prop::collection::vec(amount_strategy(), 0..20),
    ) {
        let rows: Vec<_> = amounts.iter().copied().map(mock_payment).collect();
        let mut reversed = rows.clone();
        reversed.reverse();

        prop_assert_eq!(aggregate_amount(&rows), aggregate_amount(&reversed));
    }

    /// Appending a payment increases the aggregate by exactly its amount.
    #[test]
    fn prop_append_increases_aggregate_by_amount(
        amounts in prop::collection::vec(amount_strategy(), 0..20),
        extra in amount_strategy(),
    ) {
        let mut rows: Vec<_> = amounts.iter().copied().map(mock_payment).collect();
        let before = aggregate_amount(&rows);
        rows.push(mock_payment(extra));

        prop_assert_eq!(aggregate_amount(&rows), before + extra);
    }

    /// A full-history recompute always yields a status consistent with the
    /// owed/paid partition.
    #[test]
    fn prop_recomputed_status_matches_partition(
        owed in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 0..10),
    ) {
        let rows: Vec<_> = amounts.iter().copied().map(mock_payment).collect();
        let paid = aggregate_amount(&rows);
        let status = derive_status(owed, paid);

        if paid >= owed {
            prop_assert_eq!(status, FeeStatus::Paid);
        } else if paid.is_zero() {
            prop_assert_eq!(status, FeeStatus::Pending);
        } else {
            prop_assert_eq!(status, FeeStatus::Partial);
        }
    }
}
