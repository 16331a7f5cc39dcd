//! Property-based tests for status derivation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconcile::derive_status;
use super::types::FeeStatus;

/// Strategy for generating positive owed amounts (minor units, 2dp).
fn owed_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating non-negative paid amounts.
fn paid_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..200_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The three statuses partition the (owed, paid) space: exactly one
    /// of the defining conditions holds for the derived status.
    #[test]
    fn prop_status_partition(owed in owed_strategy(), paid in paid_strategy()) {
        let status = derive_status(owed, paid);
        match status {
            FeeStatus::Pending => prop_assert!(paid.is_zero() && paid < owed),
            FeeStatus::Partial => prop_assert!(paid > Decimal::ZERO && paid < owed),
            FeeStatus::Paid => prop_assert!(paid >= owed),
        }
    }

    /// Paying at least the owed amount always derives `paid`, no matter
    /// how large the surplus grows.
    #[test]
    fn prop_overpayment_saturates(owed in owed_strategy(), surplus in paid_strategy()) {
        prop_assert_eq!(derive_status(owed, owed + surplus), FeeStatus::Paid);
    }

    /// Derivation is monotone in the paid amount: adding a payment never
    /// moves the status backwards (paid -> partial or partial -> pending).
    #[test]
    fn prop_monotone_in_paid(
        owed in owed_strategy(),
        paid in paid_strategy(),
        extra in (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
    ) {
        let rank = |s: FeeStatus| match s {
            FeeStatus::Pending => 0,
            FeeStatus::Partial => 1,
            FeeStatus::Paid => 2,
        };
        let before = derive_status(owed, paid);
        let after = derive_status(owed, paid + extra);
        prop_assert!(rank(after) >= rank(before));
    }

    /// Zero paid always derives `pending` for a positive owed amount.
    #[test]
    fn prop_zero_paid_is_pending(owed in owed_strategy()) {
        prop_assert_eq!(derive_status(owed, Decimal::ZERO), FeeStatus::Pending);
    }
}
