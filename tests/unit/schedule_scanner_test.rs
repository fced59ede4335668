// Property-based tests for the repayment schedule scanner: range
// selection, deterministic ordering and the overdue reduction over
// arbitrary schedules.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use saccoflow::core::{CurrencyCode, PartyRef};
use saccoflow::modules::loans::models::{
    Borrower, Installment, InstallmentStatus, Loan, LoanStatus,
};
use saccoflow::modules::reports::services::ScheduleScanner;

fn kes() -> CurrencyCode {
    CurrencyCode::from_str("KES").unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn loan_with_schedule(id: &str, schedule: Vec<Installment>) -> Loan {
    Loan {
        id: id.to_string(),
        borrower: Borrower {
            party: PartyRef::member("mem-1"),
            name: Some("Alice".to_string()),
            email: None,
        },
        amount_requested: Decimal::from(1000),
        amount_approved: Some(Decimal::from(900)),
        currency: None,
        status: LoanStatus::Disbursed,
        loan_term: 12,
        repayment_schedule: schedule,
        created_at: Utc::now(),
    }
}

fn status_from_index(index: usize) -> InstallmentStatus {
    match index % 3 {
        0 => InstallmentStatus::Pending,
        1 => InstallmentStatus::Paid,
        _ => InstallmentStatus::Waived,
    }
}

fn schedule_strategy() -> impl Strategy<Value = Vec<Installment>> {
    prop::collection::vec((-200i64..200i64, 1u64..1_000_000u64, 0usize..3usize), 0..12).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(offset, cents, status)| Installment {
                    due_date: base_date() + Duration::days(offset),
                    amount: Decimal::from(cents) / Decimal::from(100),
                    status: status_from_index(status),
                })
                .collect()
        },
    )
}

/// Test that each overdue row keeps its own loan's currency
#[test]
fn test_overdue_rows_keep_per_loan_currency() {
    let due = base_date() - Duration::days(10);
    let mut usd_loan = loan_with_schedule(
        "loan-usd",
        vec![Installment {
            due_date: due,
            amount: Decimal::from(100),
            status: InstallmentStatus::Pending,
        }],
    );
    usd_loan.currency = Some(CurrencyCode::from_str("USD").unwrap());
    let kes_loan = loan_with_schedule(
        "loan-kes",
        vec![Installment {
            due_date: due,
            amount: Decimal::from(50),
            status: InstallmentStatus::Pending,
        }],
    );

    let overdue = ScheduleScanner::overdue_by_loan(&[usd_loan, kes_loan], base_date(), &kes());

    assert_eq!(overdue.len(), 2);
    assert_eq!(overdue[0].currency.as_str(), "USD");
    assert_eq!(overdue[1].currency.as_str(), "KES");
}

/// Test that an empty loan slice scans to empty results
#[test]
fn test_empty_input_scans_to_empty() {
    let hits = ScheduleScanner::pending_in_range(
        &[],
        base_date(),
        base_date() + Duration::days(30),
        &kes(),
    );
    assert!(hits.is_empty());
    assert!(ScheduleScanner::overdue_by_loan(&[], base_date(), &kes()).is_empty());
}

proptest! {
    /// Property: every hit lies within the requested bounds
    #[test]
    fn prop_hits_stay_within_bounds(
        schedule in schedule_strategy(),
        start_offset in -150i64..50i64,
        span in 0i64..120i64,
    ) {
        let start = base_date() + Duration::days(start_offset);
        let end = start + Duration::days(span);
        let loans = vec![loan_with_schedule("loan-1", schedule)];

        let hits = ScheduleScanner::pending_in_range(&loans, start, end, &kes());

        for hit in &hits {
            prop_assert!(hit.due_date >= start, "hit before range start");
            prop_assert!(hit.due_date <= end, "hit after range end");
        }
    }

    /// Property: the selection count matches a manual scan of the schedule
    #[test]
    fn prop_selection_matches_manual_count(
        schedule in schedule_strategy(),
        start_offset in -150i64..50i64,
        span in 0i64..120i64,
    ) {
        let start = base_date() + Duration::days(start_offset);
        let end = start + Duration::days(span);
        let expected = schedule
            .iter()
            .filter(|i| i.is_pending() && i.due_date >= start && i.due_date <= end)
            .count();
        let loans = vec![loan_with_schedule("loan-1", schedule)];

        let hits = ScheduleScanner::pending_in_range(&loans, start, end, &kes());

        prop_assert_eq!(hits.len(), expected, "hit count must match manual scan");
    }

    /// Property: hits are ordered by due date, ties broken by loan id
    #[test]
    fn prop_hits_are_deterministically_ordered(
        first in schedule_strategy(),
        second in schedule_strategy(),
    ) {
        let loans = vec![
            loan_with_schedule("loan-b", first),
            loan_with_schedule("loan-a", second),
        ];
        let start = base_date() - Duration::days(200);
        let end = base_date() + Duration::days(200);

        let hits = ScheduleScanner::pending_in_range(&loans, start, end, &kes());

        for pair in hits.windows(2) {
            let ordered = pair[0].due_date < pair[1].due_date
                || (pair[0].due_date == pair[1].due_date && pair[0].loan_id <= pair[1].loan_id);
            prop_assert!(ordered, "hits out of order");
        }
    }

    /// Property: the overdue total counts exactly the pending entries
    /// strictly before the reference day
    #[test]
    fn prop_overdue_sum_matches_manual_fold(schedule in schedule_strategy()) {
        let today = base_date();
        let expected: Decimal = schedule
            .iter()
            .filter(|i| i.is_pending() && i.due_date < today)
            .map(|i| i.amount)
            .sum();
        let loans = vec![loan_with_schedule("loan-1", schedule)];

        let overdue = ScheduleScanner::overdue_by_loan(&loans, today, &kes());

        let total: Decimal = overdue.iter().map(|o| o.overdue_amount).sum();
        prop_assert_eq!(total, expected, "overdue sum must match manual fold");
        prop_assert!(overdue.len() <= 1, "at most one row per loan");
    }

    /// Property: a loan appears in the overdue report exactly when it
    /// holds a pending installment past due, in input order
    #[test]
    fn prop_overdue_presence_is_exact(
        schedules in prop::collection::vec(schedule_strategy(), 1..4),
    ) {
        let today = base_date();
        let loans: Vec<Loan> = schedules
            .into_iter()
            .enumerate()
            .map(|(i, schedule)| loan_with_schedule(&format!("loan-{}", i), schedule))
            .collect();
        let expected: Vec<&str> = loans
            .iter()
            .filter(|l| {
                l.repayment_schedule
                    .iter()
                    .any(|inst| inst.is_pending() && inst.due_date < today)
            })
            .map(|l| l.id.as_str())
            .collect();

        let overdue = ScheduleScanner::overdue_by_loan(&loans, today, &kes());

        let listed: Vec<&str> = overdue.iter().map(|o| o.loan_id.as_str()).collect();
        prop_assert_eq!(listed, expected, "overdue rows must mirror qualifying loans");
    }

    /// Property: a schedule with nothing due before today never defaults
    #[test]
    fn prop_future_schedules_are_never_overdue(
        offsets in prop::collection::vec(0i64..200i64, 0..12),
    ) {
        let schedule: Vec<Installment> = offsets
            .into_iter()
            .map(|offset| Installment {
                due_date: base_date() + Duration::days(offset),
                amount: Decimal::from(100),
                status: InstallmentStatus::Pending,
            })
            .collect();
        let loans = vec![loan_with_schedule("loan-1", schedule)];

        prop_assert!(ScheduleScanner::overdue_by_loan(&loans, base_date(), &kes()).is_empty());
    }
}
