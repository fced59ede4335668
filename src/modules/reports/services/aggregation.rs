use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::savings::models::Account;
use crate::modules::transactions::models::Transaction;

/// Half-open UTC time window `[start, end)`.
///
/// Half-open bounds make the twelve monthly windows of a year partition
/// the yearly window exactly, with no instant counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window covering one calendar year.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let start = year_start(year)?;
        let end = year_start(year + 1)?;
        Ok(Self { start, end })
    }

    /// Window covering one calendar month. `month` must be 1 to 12.
    pub fn calendar_month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation("Invalid year or month parameter."));
        }
        let start = month_start(year, month)?;
        let end = if month == 12 {
            month_start(year + 1, 1)?
        } else {
            month_start(year, month + 1)?
        };
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn year_start(year: i32) -> Result<DateTime<Utc>> {
    month_start(year, 1)
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::validation("Invalid year or month parameter."))
}

/// Paid and penalty sums over a set of repayment transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepaymentTotals {
    pub total_paid: Decimal,
    pub total_penalty: Decimal,
}

/// Sum a projected amount over a slice. Empty input sums to zero.
pub fn sum_by<T, F>(items: &[T], f: F) -> Decimal
where
    F: Fn(&T) -> Decimal,
{
    items.iter().map(f).sum()
}

/// Count items satisfying a predicate.
pub fn count_matching<T, P>(items: &[T], pred: P) -> usize
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| pred(item)).count()
}

/// Reduce repayment transactions to their paid and penalty totals.
/// A missing penalty counts as zero.
pub fn repayment_totals(transactions: &[Transaction]) -> RepaymentTotals {
    RepaymentTotals {
        total_paid: sum_by(transactions, |t| t.amount),
        total_penalty: sum_by(transactions, |t| t.penalty_amount()),
    }
}

/// Sum of account balances.
pub fn savings_total(accounts: &[Account]) -> Decimal {
    sum_by(accounts, |a| a.balance)
}

/// Member savings plus the group's own account balance, if it has one.
pub fn group_savings_total(member_accounts: &[Account], group_account: Option<&Account>) -> Decimal {
    savings_total(member_accounts) + group_account.map(|a| a.balance).unwrap_or_default()
}
