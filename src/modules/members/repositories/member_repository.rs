use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{Result, ScopeSelector};

/// Read-side queries over registered members
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Count users holding the `member` role within the caller's scope
    async fn count_members(&self, scope: &ScopeSelector) -> Result<i64>;
}

pub struct MySqlMemberRepository {
    pool: MySqlPool,
}

impl MySqlMemberRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for MySqlMemberRepository {
    async fn count_members(&self, scope: &ScopeSelector) -> Result<i64> {
        if scope.matches_none() {
            return Ok(0);
        }

        let mut sql = String::from("SELECT COUNT(*) FROM members WHERE role = 'member'");
        if let Some(ids) = scope.restricted_ids() {
            let params = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND id IN ({})", params));
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
}
