use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use futures_util::future::try_join_all;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::core::{AppError, CurrencyCode, ReportScope, Result};
use crate::modules::groups::models::Group;
use crate::modules::groups::repositories::GroupRepository;
use crate::modules::loans::models::LoanStatus;
use crate::modules::loans::repositories::LoanRepository;
use crate::modules::members::repositories::MemberRepository;
use crate::modules::reports::models::{
    DashboardData, DashboardResponse, DashboardStats, DefaultersResponse,
    FinancialSummaryResponse, GroupSavingsEntry, GroupSavingsResponse, LoanDefaulterEntry,
    LoansDisbursedResponse, UpcomingPaymentEntry, UpcomingRepaymentEntry,
    UpcomingRepaymentsResponse, RecentActivityResponse,
};
use crate::modules::reports::services::activity_feed::{ActivityEvent, ActivityFeed};
use crate::modules::reports::services::aggregation::{self, DateWindow};
use crate::modules::reports::services::schedule_scanner::ScheduleScanner;
use crate::modules::savings::repositories::AccountRepository;
use crate::modules::transactions::models::TransactionKind;
use crate::modules::transactions::repositories::TransactionRepository;

/// Loan statuses carrying live repayment obligations. Schedule scans are
/// always prefiltered to these so no query walks the whole collection.
const ACTIVE_LOAN_STATUSES: [LoanStatus; 3] = [
    LoanStatus::Approved,
    LoanStatus::Overdue,
    LoanStatus::Disbursed,
];

/// Statuses counted as disbursed for total and headline figures.
const DISBURSED_LOAN_STATUSES: [LoanStatus; 2] = [LoanStatus::Approved, LoanStatus::Disbursed];

const DASHBOARD_RECENT_LIMIT: u32 = 5;
const DASHBOARD_FEED_BOUND: usize = 10;
const DASHBOARD_UPCOMING_BOUND: usize = 10;
const ACTIVITY_SOURCE_LIMIT: u32 = 10;
const ACTIVITY_FEED_BOUND: usize = 15;

/// Orchestrates the reporting queries
///
/// Stateless between requests. Every method takes the caller's
/// [`ReportScope`] and passes the relevant selector to each repository
/// call; independent sub-queries of one request run concurrently.
pub struct ReportService {
    loans: Arc<dyn LoanRepository>,
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
    groups: Arc<dyn GroupRepository>,
    members: Arc<dyn MemberRepository>,
    default_currency: CurrencyCode,
    upcoming_window_days: i64,
}

impl ReportService {
    pub fn new(
        loans: Arc<dyn LoanRepository>,
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
        groups: Arc<dyn GroupRepository>,
        members: Arc<dyn MemberRepository>,
        reports: &ReportConfig,
    ) -> Self {
        Self {
            loans,
            transactions,
            accounts,
            groups,
            members,
            default_currency: reports.default_currency.clone(),
            upcoming_window_days: i64::from(reports.upcoming_window_days),
        }
    }

    /// Pending installments due within the requested date range
    ///
    /// Dates default to today through today plus the configured window.
    /// Both bounds are inclusive. Only loans with live repayment
    /// obligations are scanned.
    pub async fn upcoming_repayments(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        scope: &ReportScope,
    ) -> Result<UpcomingRepaymentsResponse> {
        let today = Utc::now().date_naive();
        let start = match start_date {
            Some(raw) => parse_report_date(raw)?,
            None => today,
        };
        let end = match end_date {
            Some(raw) => parse_report_date(raw)?,
            None => today + Duration::days(self.upcoming_window_days),
        };
        if start > end {
            return Err(AppError::validation(
                "startDate must be before or equal to endDate.",
            ));
        }

        let loans = self
            .loans
            .find_with_status(&ACTIVE_LOAN_STATUSES, &scope.loans)
            .await?;
        let hits = ScheduleScanner::pending_in_range(&loans, start, end, &self.default_currency);

        info!(
            loans = loans.len(),
            installments = hits.len(),
            %start,
            %end,
            "Scanned upcoming repayments"
        );

        Ok(UpcomingRepaymentsResponse::new(
            hits.into_iter().map(UpcomingRepaymentEntry::from).collect(),
        ))
    }

    /// Sum of approved amounts over approved and disbursed loans
    pub async fn total_loans_disbursed(&self, scope: &ReportScope) -> Result<LoansDisbursedResponse> {
        let total = self
            .loans
            .total_approved_amount(&DISBURSED_LOAN_STATUSES, &scope.loans)
            .await?;
        Ok(LoansDisbursedResponse::new(total, &self.default_currency))
    }

    /// Savings standing of every scope-visible group
    ///
    /// Groups come back in storage retrieval order; each row combines the
    /// active members' savings balances with the group's own account.
    /// Rows are computed concurrently.
    pub async fn group_savings_performance(
        &self,
        scope: &ReportScope,
    ) -> Result<GroupSavingsResponse> {
        let groups = self.groups.find_groups(&scope.groups).await?;
        let rows = try_join_all(
            groups
                .into_iter()
                .map(|group| self.group_savings_row(group)),
        )
        .await?;

        Ok(GroupSavingsResponse::new(rows))
    }

    async fn group_savings_row(&self, group: Group) -> Result<GroupSavingsEntry> {
        let member_ids = self.groups.active_member_ids(&group.id).await?;
        let (member_accounts, group_account) = tokio::try_join!(
            self.accounts.active_member_savings(&member_ids),
            self.accounts.group_savings_account(&group.id),
        )?;
        let total = aggregation::group_savings_total(&member_accounts, group_account.as_ref());

        Ok(GroupSavingsEntry {
            group: group.name,
            group_id: group.id,
            total_savings: total,
            formatted_total_savings: self.default_currency.format_amount(total),
            member_count: member_ids.len(),
        })
    }

    /// Loans with at least one pending installment past its due date
    pub async fn active_loan_defaulters(&self, scope: &ReportScope) -> Result<DefaultersResponse> {
        let today = Utc::now().date_naive();
        let loans = self
            .loans
            .find_with_pending_due_before(&ACTIVE_LOAN_STATUSES, today, &scope.loans)
            .await?;
        let overdue = ScheduleScanner::overdue_by_loan(&loans, today, &self.default_currency);

        info!(defaulters = overdue.len(), "Scanned loan defaulters");

        Ok(DefaultersResponse::new(
            overdue.into_iter().map(LoanDefaulterEntry::from).collect(),
        ))
    }

    /// Paid and penalty totals over completed repayments in a calendar
    /// month or year
    ///
    /// `year` defaults to the current year; a blank `month` means the
    /// whole year. Non-numeric input and a month outside 1 to 12 are
    /// rejected before any storage access.
    pub async fn financial_summary(
        &self,
        year: Option<&str>,
        month: Option<&str>,
        scope: &ReportScope,
    ) -> Result<FinancialSummaryResponse> {
        let year = match present(year) {
            Some(raw) => parse_period_param(raw)?,
            None => Utc::now().year(),
        };
        let month = match present(month) {
            Some(raw) => Some(u32::try_from(parse_period_param(raw)?).map_err(|_| {
                AppError::validation("Invalid year or month parameter.")
            })?),
            None => None,
        };
        let window = match month {
            Some(m) => DateWindow::calendar_month(year, m)?,
            None => DateWindow::calendar_year(year)?,
        };

        let repayments = self
            .transactions
            .repayments_in_window(window.start, window.end, &scope.transactions)
            .await?;
        if repayments.is_empty() {
            warn!(year, ?month, "No completed repayments in summary window");
        }
        let totals = aggregation::repayment_totals(&repayments);

        Ok(FinancialSummaryResponse {
            success: true,
            year,
            month,
            total_paid: totals.total_paid,
            formatted_total_paid: self.default_currency.format_amount(totals.total_paid),
            total_penalty: totals.total_penalty,
            formatted_total_penalty: self.default_currency.format_amount(totals.total_penalty),
        })
    }

    /// Headline counters, a short activity feed and the next due
    /// installments, composed from concurrent sub-queries
    pub async fn dashboard(&self, scope: &ReportScope) -> Result<DashboardResponse> {
        let now = Utc::now();
        let today = now.date_naive();
        let start_of_month = DateWindow::calendar_month(now.year(), now.month())?.start;

        let (
            total_members,
            total_loans,
            approved_loans,
            pending_applications,
            savings_accounts,
            recent_loans,
            recent_repayments,
            active_loans,
        ) = tokio::try_join!(
            self.members.count_members(&scope.members),
            self.loans.count_all(&scope.loans),
            self.loans
                .count_with_status(&DISBURSED_LOAN_STATUSES, &scope.loans),
            self.loans
                .count_with_status(&[LoanStatus::Pending], &scope.loans),
            self.accounts
                .active_accounts_in_scope(&scope.members, &scope.groups),
            self.loans
                .recent_since(start_of_month, DASHBOARD_RECENT_LIMIT, &scope.loans),
            self.transactions.recent_by_kind(
                TransactionKind::LoanRepayment,
                start_of_month,
                DASHBOARD_RECENT_LIMIT,
                &scope.transactions,
            ),
            self.loans
                .find_with_status(&ACTIVE_LOAN_STATUSES, &scope.loans),
        )?;

        let total_savings = aggregation::savings_total(&savings_accounts);

        // One active-loan fetch feeds both the overdue aggregate and the
        // upcoming list.
        let overdue = ScheduleScanner::overdue_by_loan(&active_loans, today, &self.default_currency);
        let total_overdue_amount = aggregation::sum_by(&overdue, |o| o.overdue_amount);

        let window_end = today + Duration::days(self.upcoming_window_days);
        let mut upcoming =
            ScheduleScanner::pending_in_range(&active_loans, today, window_end, &self.default_currency);
        upcoming.truncate(DASHBOARD_UPCOMING_BOUND);

        let recent_activity = ActivityFeed::merge(
            vec![
                recent_loans
                    .iter()
                    .map(|loan| {
                        ActivityEvent::loan_application(loan, &self.default_currency)
                            .without_amounts()
                    })
                    .collect(),
                recent_repayments
                    .iter()
                    .map(|txn| {
                        ActivityEvent::payment_received(txn, &self.default_currency)
                            .without_amounts()
                    })
                    .collect(),
            ],
            DASHBOARD_FEED_BOUND,
        );

        info!(
            total_members,
            total_loans,
            overdue_loans = overdue.len(),
            upcoming = upcoming.len(),
            "Composed dashboard"
        );

        let stats = DashboardStats {
            total_members,
            total_loans,
            approved_loans,
            pending_applications,
            total_savings,
            formatted_total_savings: self.default_currency.format_amount(total_savings),
            overdue_payments_count: overdue.len(),
            total_overdue_amount,
            formatted_total_overdue_amount: self
                .default_currency
                .format_amount(total_overdue_amount),
        };

        Ok(DashboardResponse::new(DashboardData {
            stats,
            recent_activity,
            upcoming_payments: upcoming.into_iter().map(UpcomingPaymentEntry::from).collect(),
        }))
    }

    /// Month-to-date activity merged from four sources
    pub async fn recent_activity(&self, scope: &ReportScope) -> Result<RecentActivityResponse> {
        let now = Utc::now();
        let start_of_month = DateWindow::calendar_month(now.year(), now.month())?.start;

        let (loans, repayments, deposits, withdrawals) = tokio::try_join!(
            self.loans
                .recent_since(start_of_month, ACTIVITY_SOURCE_LIMIT, &scope.loans),
            self.transactions.recent_by_kind(
                TransactionKind::LoanRepayment,
                start_of_month,
                ACTIVITY_SOURCE_LIMIT,
                &scope.transactions,
            ),
            self.transactions.recent_by_kind(
                TransactionKind::SavingsContribution,
                start_of_month,
                ACTIVITY_SOURCE_LIMIT,
                &scope.transactions,
            ),
            self.transactions.recent_by_kind(
                TransactionKind::SavingsWithdrawal,
                start_of_month,
                ACTIVITY_SOURCE_LIMIT,
                &scope.transactions,
            ),
        )?;

        let events = ActivityFeed::merge(
            vec![
                loans
                    .iter()
                    .map(|loan| ActivityEvent::loan_application(loan, &self.default_currency))
                    .collect(),
                repayments
                    .iter()
                    .map(|txn| ActivityEvent::loan_repayment(txn, &self.default_currency))
                    .collect(),
                deposits
                    .iter()
                    .map(|txn| ActivityEvent::savings_deposit(txn, &self.default_currency))
                    .collect(),
                withdrawals
                    .iter()
                    .map(|txn| ActivityEvent::savings_withdrawal(txn, &self.default_currency))
                    .collect(),
            ],
            ACTIVITY_FEED_BOUND,
        );

        Ok(RecentActivityResponse::new(events))
    }
}

fn parse_report_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Invalid date format for startDate or endDate."))
}

fn parse_period_param(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::validation("Invalid year or month parameter."))
}

/// Blank query values are treated as absent.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// Endpoint behavior is covered end to end in
// tests/integration/report_service_test.rs over in-memory repositories.
