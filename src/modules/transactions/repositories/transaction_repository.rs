use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, PartyKind, PartyRef, Result, ScopeSelector};
use crate::modules::transactions::models::{Transaction, TransactionKind, TransactionStatus};

/// Read-side queries over recorded financial movements
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Completed, non-deleted loan repayments whose payment date falls in
    /// the half-open window `[start, end)`
    async fn repayments_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>>;

    /// Transactions of one kind created on or after `since`, newest first,
    /// capped at `limit`. Mirrors the activity feed's view: settlement
    /// status and the soft-delete flag are not filtered here.
    async fn recent_by_kind(
        &self,
        kind: TransactionKind,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>>;
}

pub struct MySqlTransactionRepository {
    pool: MySqlPool,
}

impl MySqlTransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const TRANSACTION_SELECT: &str = "SELECT t.id, t.kind, t.amount, t.penalty, t.status, t.deleted, \
     t.actor_kind, t.actor_id, COALESCE(m.name, g.name) AS actor_name, \
     t.loan_id, t.payment_date, t.created_at \
     FROM transactions t \
     LEFT JOIN members m ON t.actor_kind = 'member' AND t.actor_id = m.id \
     LEFT JOIN savings_groups g ON t.actor_kind = 'group' AND t.actor_id = g.id";

#[async_trait]
impl TransactionRepository for MySqlTransactionRepository {
    async fn repayments_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }

        let mut sql = format!(
            "{} WHERE t.kind = 'loan_repayment' AND t.status = 'completed' \
             AND t.deleted = FALSE AND t.payment_date >= ? AND t.payment_date < ?",
            TRANSACTION_SELECT
        );
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND t.actor_id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }
        sql.push_str(" ORDER BY t.payment_date");

        let mut query = sqlx::query_as::<_, TransactionRow>(&sql).bind(start).bind(end);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    async fn recent_by_kind(
        &self,
        kind: TransactionKind,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }

        let mut sql = format!(
            "{} WHERE t.kind = ? AND t.created_at >= ?",
            TRANSACTION_SELECT
        );
        if let Some(ids) = scope.restricted_ids() {
            sql.push_str(&format!(
                " AND t.actor_id IN ({})",
                vec!["?"; ids.len()].join(", ")
            ));
        }
        sql.push_str(" ORDER BY t.created_at DESC LIMIT ?");

        let mut query = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(kind.as_str())
            .bind(since);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    kind: String,
    amount: Decimal,
    penalty: Option<Decimal>,
    status: String,
    deleted: bool,
    actor_kind: Option<String>,
    actor_id: Option<String>,
    actor_name: Option<String>,
    loan_id: Option<String>,
    payment_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction> {
        let kind = TransactionKind::try_from(self.kind).map_err(|e| {
            AppError::Internal(format!("Invalid transaction kind in database: {}", e))
        })?;
        let status = TransactionStatus::try_from(self.status).map_err(|e| {
            AppError::Internal(format!("Invalid transaction status in database: {}", e))
        })?;
        let actor = match (self.actor_kind, self.actor_id) {
            (Some(actor_kind), Some(actor_id)) => {
                let kind = PartyKind::try_from(actor_kind).map_err(|e| {
                    AppError::Internal(format!("Invalid actor kind in database: {}", e))
                })?;
                Some(PartyRef {
                    kind,
                    id: actor_id,
                })
            }
            _ => None,
        };

        Ok(Transaction {
            id: self.id,
            kind,
            amount: self.amount,
            penalty: self.penalty,
            status,
            deleted: self.deleted,
            actor,
            actor_name: self.actor_name,
            loan_id: self.loan_id,
            payment_date: self.payment_date,
            created_at: self.created_at,
        })
    }
}
