use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::CurrencyCode;
use crate::modules::loans::models::{Borrower, Loan, LoanStatus};

/// One pending installment matched by a date-range scan, paired with the
/// presentation fields of its parent loan.
#[derive(Debug, Clone)]
pub struct ScheduleHit {
    pub loan_id: String,
    pub borrower: Borrower,
    pub due_date: NaiveDate,
    pub amount_due: Decimal,
    pub currency: CurrencyCode,
    pub loan_term: i32,
    pub loan_status: LoanStatus,
}

/// A loan carrying at least one pending installment past its due date,
/// with the sum over those installments.
#[derive(Debug, Clone)]
pub struct OverdueLoan {
    pub loan_id: String,
    pub borrower: Borrower,
    pub loan_status: LoanStatus,
    pub overdue_amount: Decimal,
    pub currency: CurrencyCode,
    pub loan_term: i32,
    pub amount_approved: Option<Decimal>,
}

/// Scanner over embedded repayment schedules
///
/// Inputs are expected to be pre-filtered by business status and caller
/// scope; the scanner only inspects installment status and due dates.
/// Sums are nominal: amounts from loans in different currencies are added
/// without conversion.
pub struct ScheduleScanner;

impl ScheduleScanner {
    /// Select every pending installment with `start <= due_date <= end`.
    ///
    /// Each hit carries its parent loan's borrower, term, status and
    /// effective currency (loan currency if set, else `fallback`). The
    /// result is sorted ascending by due date; ties are broken by loan id
    /// so output order is deterministic.
    pub fn pending_in_range(
        loans: &[Loan],
        start: NaiveDate,
        end: NaiveDate,
        fallback: &CurrencyCode,
    ) -> Vec<ScheduleHit> {
        let mut hits: Vec<ScheduleHit> = Vec::new();
        for loan in loans {
            let currency = loan.effective_currency(fallback);
            for installment in &loan.repayment_schedule {
                if installment.is_pending()
                    && installment.due_date >= start
                    && installment.due_date <= end
                {
                    hits.push(ScheduleHit {
                        loan_id: loan.id.clone(),
                        borrower: loan.borrower.clone(),
                        due_date: installment.due_date,
                        amount_due: installment.amount,
                        currency: currency.clone(),
                        loan_term: loan.loan_term,
                        loan_status: loan.status,
                    });
                }
            }
        }
        hits.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.loan_id.cmp(&b.loan_id))
        });
        hits
    }

    /// Reduce each loan to its overdue total as of `today`.
    ///
    /// A loan appears once per call with the sum of its pending
    /// installments strictly before `today`; loans with no overdue
    /// installment are absent. Input order is preserved.
    pub fn overdue_by_loan(
        loans: &[Loan],
        today: NaiveDate,
        fallback: &CurrencyCode,
    ) -> Vec<OverdueLoan> {
        loans
            .iter()
            .filter_map(|loan| {
                let overdue: Vec<_> = loan
                    .repayment_schedule
                    .iter()
                    .filter(|i| i.is_overdue(today))
                    .collect();
                if overdue.is_empty() {
                    return None;
                }
                let overdue_amount = overdue.iter().map(|i| i.amount).sum();
                Some(OverdueLoan {
                    loan_id: loan.id.clone(),
                    borrower: loan.borrower.clone(),
                    loan_status: loan.status,
                    overdue_amount,
                    currency: loan.effective_currency(fallback).clone(),
                    loan_term: loan.loan_term,
                    amount_approved: loan.amount_approved,
                })
            })
            .collect()
    }
}
