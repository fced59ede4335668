pub mod report_payloads;

pub use report_payloads::{
    BorrowerSummary, DashboardData, DashboardResponse, DashboardStats, DefaultersResponse,
    FinancialSummaryResponse, GroupSavingsEntry, GroupSavingsResponse, LoanDefaulterEntry,
    LoansDisbursedResponse, RecentActivityResponse, UpcomingPaymentEntry, UpcomingRepaymentEntry,
    UpcomingRepaymentsResponse,
};
