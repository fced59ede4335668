use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::CurrencyCode;
use crate::modules::loans::models::{Borrower, LoanStatus};
use crate::modules::reports::services::activity_feed::ActivityEvent;
use crate::modules::reports::services::schedule_scanner::{OverdueLoan, ScheduleHit};

/// Borrower identity as presented in report rows
#[derive(Debug, Clone, Serialize)]
pub struct BorrowerSummary {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<Borrower> for BorrowerSummary {
    fn from(borrower: Borrower) -> Self {
        Self {
            id: borrower.party.id,
            name: borrower.name,
            email: borrower.email,
        }
    }
}

/// One pending installment due within the queried range
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRepaymentEntry {
    pub loan_id: String,
    pub borrower: BorrowerSummary,
    pub due_date: NaiveDate,
    pub amount_due: Decimal,
    pub currency: CurrencyCode,
    pub formatted_amount_due: String,
    pub loan_term: i32,
    pub loan_status: LoanStatus,
}

impl From<ScheduleHit> for UpcomingRepaymentEntry {
    fn from(hit: ScheduleHit) -> Self {
        let formatted_amount_due = hit.currency.format_amount(hit.amount_due);
        Self {
            loan_id: hit.loan_id,
            borrower: hit.borrower.into(),
            due_date: hit.due_date,
            amount_due: hit.amount_due,
            currency: hit.currency,
            formatted_amount_due,
            loan_term: hit.loan_term,
            loan_status: hit.loan_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpcomingRepaymentsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<UpcomingRepaymentEntry>,
}

impl UpcomingRepaymentsResponse {
    pub fn new(data: Vec<UpcomingRepaymentEntry>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoansDisbursedResponse {
    pub success: bool,
    pub total: Decimal,
    pub formatted_total: String,
}

impl LoansDisbursedResponse {
    pub fn new(total: Decimal, currency: &CurrencyCode) -> Self {
        Self {
            success: true,
            total,
            formatted_total: currency.format_amount(total),
        }
    }
}

/// Savings standing of one group: active members' savings balances plus
/// the group's own account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSavingsEntry {
    /// Group display name
    pub group: String,
    pub group_id: String,
    pub total_savings: Decimal,
    pub formatted_total_savings: String,
    /// Active memberships, independent of account existence
    pub member_count: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupSavingsResponse {
    pub success: bool,
    pub data: Vec<GroupSavingsEntry>,
}

impl GroupSavingsResponse {
    pub fn new(data: Vec<GroupSavingsEntry>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A loan in default: at least one pending installment past due
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDefaulterEntry {
    pub loan_id: String,
    pub borrower: BorrowerSummary,
    pub loan_status: LoanStatus,
    pub overdue_amount: Decimal,
    pub formatted_overdue_amount: String,
    pub loan_term: i32,
    /// Approved amount already formatted for display
    pub amount_approved: String,
}

impl From<OverdueLoan> for LoanDefaulterEntry {
    fn from(loan: OverdueLoan) -> Self {
        let formatted_overdue_amount = loan.currency.format_amount(loan.overdue_amount);
        let amount_approved = loan
            .currency
            .format_amount(loan.amount_approved.unwrap_or_default());
        Self {
            loan_id: loan.loan_id,
            borrower: loan.borrower.into(),
            loan_status: loan.loan_status,
            overdue_amount: loan.overdue_amount,
            formatted_overdue_amount,
            loan_term: loan.loan_term,
            amount_approved,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DefaultersResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<LoanDefaulterEntry>,
}

impl DefaultersResponse {
    pub fn new(data: Vec<LoanDefaulterEntry>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Paid and penalty totals for a calendar month or year
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummaryResponse {
    pub success: bool,
    pub year: i32,
    /// `None` for a whole-year summary, serialized as null
    pub month: Option<u32>,
    pub total_paid: Decimal,
    pub formatted_total_paid: String,
    pub total_penalty: Decimal,
    pub formatted_total_penalty: String,
}

/// Headline counters of the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: i64,
    pub total_loans: i64,
    pub approved_loans: i64,
    pub pending_applications: i64,
    pub total_savings: Decimal,
    pub formatted_total_savings: String,
    pub overdue_payments_count: usize,
    pub total_overdue_amount: Decimal,
    pub formatted_total_overdue_amount: String,
}

/// Installment due soon, as listed on the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPaymentEntry {
    pub loan_id: String,
    pub borrower_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub formatted_amount: String,
}

impl From<ScheduleHit> for UpcomingPaymentEntry {
    fn from(hit: ScheduleHit) -> Self {
        let formatted_amount = hit.currency.format_amount(hit.amount_due);
        Self {
            loan_id: hit.loan_id,
            borrower_name: hit.borrower.display_name().to_string(),
            amount: hit.amount_due,
            due_date: hit.due_date,
            formatted_amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_activity: Vec<ActivityEvent>,
    pub upcoming_payments: Vec<UpcomingPaymentEntry>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub data: DashboardData,
}

impl DashboardResponse {
    pub fn new(data: DashboardData) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentActivityResponse {
    pub success: bool,
    pub data: Vec<ActivityEvent>,
}

impl RecentActivityResponse {
    pub fn new(data: Vec<ActivityEvent>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
