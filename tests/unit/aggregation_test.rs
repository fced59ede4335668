// Property-based tests for calendar windows and the decimal reductions
// behind the summary and dashboard figures.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use saccoflow::core::PartyRef;
use saccoflow::modules::reports::services::aggregation::{
    group_savings_total, repayment_totals, savings_total, sum_by,
};
use saccoflow::modules::reports::services::DateWindow;
use saccoflow::modules::savings::models::{Account, AccountKind, AccountStatus};
use saccoflow::modules::transactions::models::{Transaction, TransactionKind, TransactionStatus};

fn from_cents(cents: u64) -> Decimal {
    Decimal::from(cents) / Decimal::from(100)
}

fn repayment(cents: u64, penalty_cents: Option<u64>) -> Transaction {
    Transaction {
        id: "txn-1".to_string(),
        kind: TransactionKind::LoanRepayment,
        amount: from_cents(cents),
        penalty: penalty_cents.map(from_cents),
        status: TransactionStatus::Completed,
        deleted: false,
        actor: Some(PartyRef::member("mem-1")),
        actor_name: Some("Alice".to_string()),
        loan_id: Some("loan-1".to_string()),
        payment_date: Utc::now(),
        created_at: Utc::now(),
    }
}

fn account(cents: u64) -> Account {
    Account {
        id: "acc-1".to_string(),
        owner: PartyRef::member("mem-1"),
        kind: AccountKind::Savings,
        balance: from_cents(cents),
        status: AccountStatus::Active,
        created_at: Utc::now(),
    }
}

/// Test that February windows follow the leap cycle
#[test]
fn test_february_window_length_follows_leap_years() {
    let leap = DateWindow::calendar_month(2024, 2).unwrap();
    assert_eq!(leap.end - leap.start, Duration::days(29));

    let common = DateWindow::calendar_month(2023, 2).unwrap();
    assert_eq!(common.end - common.start, Duration::days(28));
}

proptest! {
    /// Property: the twelve monthly windows of any year chain gaplessly
    /// from the year's start to the next year's start
    #[test]
    fn prop_monthly_windows_partition_any_year(year in 1970i32..2100i32) {
        let whole = DateWindow::calendar_year(year).unwrap();
        let mut cursor = whole.start;
        for month in 1..=12u32 {
            let window = DateWindow::calendar_month(year, month).unwrap();
            prop_assert_eq!(window.start, cursor, "window must start where the last ended");
            prop_assert!(window.start < window.end, "window must be non-empty");
            cursor = window.end;
        }
        prop_assert_eq!(cursor, whole.end, "last window must close the year");
    }

    /// Property: containment is closed at the start and open at the end
    #[test]
    fn prop_window_bounds_are_half_open(year in 1970i32..2100i32, month in 1u32..=12u32) {
        let window = DateWindow::calendar_month(year, month).unwrap();

        prop_assert!(window.contains(window.start));
        prop_assert!(!window.contains(window.end));
        prop_assert!(window.contains(window.end - Duration::seconds(1)));
        prop_assert!(!window.contains(window.start - Duration::seconds(1)));
    }

    /// Property: months outside 1 to 12 are always rejected
    #[test]
    fn prop_invalid_months_are_rejected(year in 1970i32..2100i32, month in 13u32..200u32) {
        prop_assert!(DateWindow::calendar_month(year, 0).is_err());
        prop_assert!(DateWindow::calendar_month(year, month).is_err());
    }

    /// Property: repayment totals match a manual fold, with missing
    /// penalties counting as zero
    #[test]
    fn prop_repayment_totals_match_manual_fold(
        entries in prop::collection::vec((1u64..1_000_000u64, prop::option::of(0u64..100_000u64)), 0..20),
    ) {
        let expected_paid: Decimal = entries.iter().map(|(c, _)| from_cents(*c)).sum();
        let expected_penalty: Decimal = entries
            .iter()
            .map(|(_, p)| p.map(from_cents).unwrap_or_default())
            .sum();
        let transactions: Vec<Transaction> = entries
            .iter()
            .map(|(cents, penalty)| repayment(*cents, *penalty))
            .collect();

        let totals = repayment_totals(&transactions);

        prop_assert_eq!(totals.total_paid, expected_paid, "paid total must match fold");
        prop_assert_eq!(totals.total_penalty, expected_penalty, "penalty total must match fold");
    }

    /// Property: decimal sums are exact and order-independent at cent
    /// granularity
    #[test]
    fn prop_sum_by_is_order_independent(
        balances in prop::collection::vec(0u64..1_000_000u64, 0..20),
    ) {
        let accounts: Vec<Account> = balances.iter().map(|c| account(*c)).collect();
        let reversed: Vec<Account> = accounts.iter().rev().cloned().collect();

        prop_assert_eq!(savings_total(&accounts), savings_total(&reversed));
        prop_assert_eq!(
            sum_by(&accounts, |a| a.balance),
            savings_total(&accounts),
            "sum_by and savings_total must agree"
        );
    }

    /// Property: a group total decomposes into member savings plus the
    /// group account balance
    #[test]
    fn prop_group_total_decomposes(
        member_balances in prop::collection::vec(0u64..1_000_000u64, 0..10),
        group_balance in prop::option::of(0u64..1_000_000u64),
    ) {
        let members: Vec<Account> = member_balances.iter().map(|c| account(*c)).collect();
        let group_account = group_balance.map(account);

        let total = group_savings_total(&members, group_account.as_ref());

        let expected = savings_total(&members)
            + group_account.as_ref().map(|a| a.balance).unwrap_or_default();
        prop_assert_eq!(total, expected, "group total must decompose");
    }
}
