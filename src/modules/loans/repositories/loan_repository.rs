use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, CurrencyCode, PartyKind, PartyRef, Result, ScopeSelector};
use crate::modules::loans::models::{Borrower, Installment, InstallmentStatus, Loan, LoanStatus};

/// Read-side queries over loans and their repayment schedules
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Loans in the given statuses, borrower joined, full schedule attached
    async fn find_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>>;

    /// Like [`find_with_status`](LoanRepository::find_with_status), narrowed
    /// to loans holding at least one pending installment due before `before`
    async fn find_with_pending_due_before(
        &self,
        statuses: &[LoanStatus],
        before: NaiveDate,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>>;

    /// Count of all loans within scope, any status
    async fn count_all(&self, scope: &ScopeSelector) -> Result<i64>;

    /// Count of loans in the given statuses within scope
    async fn count_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<i64>;

    /// Sum of approved amounts over loans in the given statuses
    async fn total_approved_amount(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Decimal>;

    /// Loans created on or after `since`, newest first, capped at `limit`.
    /// Repayment schedules are not attached.
    async fn recent_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>>;
}

pub struct MySqlLoanRepository {
    pool: MySqlPool,
}

impl MySqlLoanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Fetch schedules for the given loans in one query and attach them
    async fn attach_schedules(&self, rows: Vec<LoanRow>) -> Result<Vec<Loan>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let params = vec!["?"; rows.len()].join(", ");
        let sql = format!(
            "SELECT loan_id, due_date, amount, status \
             FROM loan_installments \
             WHERE loan_id IN ({}) \
             ORDER BY due_date, id",
            params
        );

        let mut query = sqlx::query_as::<_, InstallmentRow>(&sql);
        for row in &rows {
            query = query.bind(&row.id);
        }
        let installment_rows = query.fetch_all(&self.pool).await?;

        let mut by_loan: HashMap<String, Vec<Installment>> = HashMap::new();
        for row in installment_rows {
            let status = InstallmentStatus::try_from(row.status).map_err(|e| {
                AppError::Internal(format!("Invalid installment status in database: {}", e))
            })?;
            by_loan.entry(row.loan_id).or_default().push(Installment {
                due_date: row.due_date,
                amount: row.amount,
                status,
            });
        }

        rows.into_iter()
            .map(|row| {
                let schedule = by_loan.remove(&row.id).unwrap_or_default();
                row.into_loan(schedule)
            })
            .collect()
    }
}

const LOAN_SELECT: &str = "SELECT l.id, l.borrower_kind, l.borrower_id, \
     COALESCE(m.name, g.name) AS borrower_name, m.email AS borrower_email, \
     l.amount_requested, l.amount_approved, l.currency, l.status, l.loan_term, l.created_at \
     FROM loans l \
     LEFT JOIN members m ON l.borrower_kind = 'member' AND l.borrower_id = m.id \
     LEFT JOIN savings_groups g ON l.borrower_kind = 'group' AND l.borrower_id = g.id";

#[async_trait]
impl LoanRepository for MySqlLoanRepository {
    async fn find_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        if statuses.is_empty() || scope.matches_none() {
            return Ok(vec![]);
        }

        let status_params = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!("{} WHERE l.status IN ({})", LOAN_SELECT, status_params);
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND l.id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }

        let mut query = sqlx::query_as::<_, LoanRow>(&sql);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        self.attach_schedules(rows).await
    }

    async fn find_with_pending_due_before(
        &self,
        statuses: &[LoanStatus],
        before: NaiveDate,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        if statuses.is_empty() || scope.matches_none() {
            return Ok(vec![]);
        }

        let status_params = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!(
            "{} WHERE l.status IN ({}) \
             AND EXISTS (SELECT 1 FROM loan_installments i \
             WHERE i.loan_id = l.id AND i.status = 'pending' AND i.due_date < ?)",
            LOAN_SELECT, status_params
        );
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND l.id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }

        let mut query = sqlx::query_as::<_, LoanRow>(&sql);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        query = query.bind(before);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        self.attach_schedules(rows).await
    }

    async fn count_all(&self, scope: &ScopeSelector) -> Result<i64> {
        if scope.matches_none() {
            return Ok(0);
        }

        let mut sql = String::from("SELECT COUNT(*) FROM loans");
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " WHERE id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let (count,) = query.fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn count_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<i64> {
        if statuses.is_empty() || scope.matches_none() {
            return Ok(0);
        }

        let status_params = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!("SELECT COUNT(*) FROM loans WHERE status IN ({})", status_params);
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let (count,) = query.fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn total_approved_amount(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Decimal> {
        if statuses.is_empty() || scope.matches_none() {
            return Ok(Decimal::ZERO);
        }

        let status_params = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!(
            "SELECT COALESCE(SUM(amount_approved), 0) FROM loans WHERE status IN ({})",
            status_params
        );
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }

        let mut query = sqlx::query_as::<_, (Option<Decimal>,)>(&sql);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let (total,) = query.fetch_one(&self.pool).await?;
        Ok(total.unwrap_or_default())
    }

    async fn recent_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }

        let mut sql = format!("{} WHERE l.created_at >= ?", LOAN_SELECT);
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND l.id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }
        sql.push_str(" ORDER BY l.created_at DESC LIMIT ?");

        let mut query = sqlx::query_as::<_, LoanRow>(&sql).bind(since);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(|row| row.into_loan(vec![])).collect()
    }
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct LoanRow {
    id: String,
    borrower_kind: String,
    borrower_id: String,
    borrower_name: Option<String>,
    borrower_email: Option<String>,
    amount_requested: Decimal,
    amount_approved: Option<Decimal>,
    currency: Option<String>,
    status: String,
    loan_term: i32,
    created_at: DateTime<Utc>,
}

impl LoanRow {
    fn into_loan(self, repayment_schedule: Vec<Installment>) -> Result<Loan> {
        let borrower_kind = PartyKind::try_from(self.borrower_kind)
            .map_err(|e| AppError::Internal(format!("Invalid borrower kind in database: {}", e)))?;
        let status = LoanStatus::try_from(self.status)
            .map_err(|e| AppError::Internal(format!("Invalid loan status in database: {}", e)))?;
        let currency = self
            .currency
            .map(CurrencyCode::try_from)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Invalid currency in database: {}", e)))?;

        Ok(Loan {
            id: self.id,
            borrower: Borrower {
                party: PartyRef {
                    kind: borrower_kind,
                    id: self.borrower_id,
                },
                name: self.borrower_name,
                email: self.borrower_email,
            },
            amount_requested: self.amount_requested,
            amount_approved: self.amount_approved,
            currency,
            status,
            loan_term: self.loan_term,
            repayment_schedule,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InstallmentRow {
    loan_id: String,
    due_date: NaiveDate,
    amount: Decimal,
    status: String,
}
