use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, PartyKind, PartyRef, Result, ScopeSelector};
use crate::modules::savings::models::{Account, AccountKind, AccountStatus};

/// Read-side queries over savings accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Active individual savings accounts owned by the given members
    async fn active_member_savings(&self, member_ids: &[String]) -> Result<Vec<Account>>;

    /// A group's own active group-savings account, if it has one
    async fn group_savings_account(&self, group_id: &str) -> Result<Option<Account>>;

    /// Active accounts visible to the caller: member-owned savings within
    /// the member scope plus group-owned group savings within the group
    /// scope
    async fn active_accounts_in_scope(
        &self,
        member_scope: &ScopeSelector,
        group_scope: &ScopeSelector,
    ) -> Result<Vec<Account>>;
}

pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, owner_kind, owner_id, kind, balance, status, created_at";

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn active_member_savings(&self, member_ids: &[String]) -> Result<Vec<Account>> {
        if member_ids.is_empty() {
            return Ok(vec![]);
        }

        let params = vec!["?"; member_ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM accounts \
             WHERE owner_kind = 'member' AND kind = 'savings' AND status = 'active' \
             AND owner_id IN ({})",
            ACCOUNT_COLUMNS, params
        );

        let mut query = sqlx::query_as::<_, AccountRow>(&sql);
        for id in member_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn group_savings_account(&self, group_id: &str) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT {} FROM accounts \
             WHERE owner_kind = 'group' AND owner_id = ? \
             AND kind = 'group_savings' AND status = 'active' \
             LIMIT 1",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn active_accounts_in_scope(
        &self,
        member_scope: &ScopeSelector,
        group_scope: &ScopeSelector,
    ) -> Result<Vec<Account>> {
        let mut arms: Vec<String> = Vec::new();
        let mut binds: Vec<&String> = Vec::new();

        if !member_scope.matches_none() {
            let mut arm = String::from("(owner_kind = 'member' AND kind = 'savings'");
            if let Some(ids) = member_scope.restricted_ids() {
                arm.push_str(&format!(
                    " AND owner_id IN ({})",
                    vec!["?"; ids.len()].join(", ")
                ));
                binds.extend(ids);
            }
            arm.push(')');
            arms.push(arm);
        }

        if !group_scope.matches_none() {
            let mut arm = String::from("(owner_kind = 'group' AND kind = 'group_savings'");
            if let Some(ids) = group_scope.restricted_ids() {
                arm.push_str(&format!(
                    " AND owner_id IN ({})",
                    vec!["?"; ids.len()].join(", ")
                ));
                binds.extend(ids);
            }
            arm.push(')');
            arms.push(arm);
        }

        if arms.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            "SELECT {} FROM accounts WHERE status = 'active' AND ({})",
            ACCOUNT_COLUMNS,
            arms.join(" OR ")
        );

        let mut query = sqlx::query_as::<_, AccountRow>(&sql);
        for id in binds {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(AccountRow::into_account).collect()
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct AccountRow {
    id: String,
    owner_kind: String,
    owner_id: String,
    kind: String,
    balance: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account> {
        let owner_kind = PartyKind::try_from(self.owner_kind)
            .map_err(|e| AppError::Internal(format!("Invalid owner kind in database: {}", e)))?;
        let kind = AccountKind::try_from(self.kind)
            .map_err(|e| AppError::Internal(format!("Invalid account kind in database: {}", e)))?;
        let status = AccountStatus::try_from(self.status)
            .map_err(|e| AppError::Internal(format!("Invalid account status in database: {}", e)))?;

        Ok(Account {
            id: self.id,
            owner: PartyRef {
                kind: owner_kind,
                id: self.owner_id,
            },
            kind,
            balance: self.balance,
            status,
            created_at: self.created_at,
        })
    }
}
