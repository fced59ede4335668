use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{ReportScope, Result};
use crate::modules::reports::services::ReportService;

/// Query parameters for the upcoming-repayments endpoint
///
/// Raw strings; parsing and defaulting happen in the service so invalid
/// input yields the documented validation message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRepaymentsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query parameters for the financial-summary endpoint
#[derive(Debug, Deserialize)]
pub struct FinancialSummaryQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

/// GET /api/reports/upcoming-repayments
pub async fn upcoming_repayments(
    service: web::Data<ReportService>,
    query: web::Query<UpcomingRepaymentsQuery>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    let result = service
        .upcoming_repayments(query.start_date.as_deref(), query.end_date.as_deref(), &scope)
        .await;
    respond("upcoming-repayments", result)
}

/// GET /api/reports/total-loans-disbursed
pub async fn total_loans_disbursed(
    service: web::Data<ReportService>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    respond(
        "total-loans-disbursed",
        service.total_loans_disbursed(&scope).await,
    )
}

/// GET /api/reports/group-savings-performance
pub async fn group_savings_performance(
    service: web::Data<ReportService>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    respond(
        "group-savings-performance",
        service.group_savings_performance(&scope).await,
    )
}

/// GET /api/reports/active-loan-defaulters
pub async fn active_loan_defaulters(
    service: web::Data<ReportService>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    respond(
        "active-loan-defaulters",
        service.active_loan_defaulters(&scope).await,
    )
}

/// GET /api/reports/financial-summary
pub async fn financial_summary(
    service: web::Data<ReportService>,
    query: web::Query<FinancialSummaryQuery>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    let result = service
        .financial_summary(query.year.as_deref(), query.month.as_deref(), &scope)
        .await;
    respond("financial-summary", result)
}

/// GET /api/reports/dashboard
pub async fn dashboard(
    service: web::Data<ReportService>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    respond("dashboard", service.dashboard(&scope).await)
}

/// GET /api/reports/recent-activity
pub async fn recent_activity(
    service: web::Data<ReportService>,
    scope: ReportScope,
) -> Result<HttpResponse> {
    respond("recent-activity", service.recent_activity(&scope).await)
}

/// Render a report payload, logging failures with full detail. The wire
/// body for storage errors stays opaque; see `AppError::error_response`.
fn respond<T: Serialize>(endpoint: &'static str, result: Result<T>) -> Result<HttpResponse> {
    match result {
        Ok(payload) => Ok(HttpResponse::Ok().json(payload)),
        Err(e) => {
            error!(endpoint, "Report request failed: {}", e);
            Err(e)
        }
    }
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/upcoming-repayments", web::get().to(upcoming_repayments))
            .route("/total-loans-disbursed", web::get().to(total_loans_disbursed))
            .route(
                "/group-savings-performance",
                web::get().to(group_savings_performance),
            )
            .route(
                "/active-loan-defaulters",
                web::get().to(active_loan_defaulters),
            )
            .route("/financial-summary", web::get().to(financial_summary))
            .route("/dashboard", web::get().to(dashboard))
            .route("/recent-activity", web::get().to(recent_activity)),
    );
}
