use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{Result, ScopeSelector};
use crate::modules::groups::models::Group;

/// Read-side queries over savings groups and their memberships
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Groups visible to the caller, in storage retrieval order
    async fn find_groups(&self, scope: &ScopeSelector) -> Result<Vec<Group>>;

    /// Distinct ids of members with an active membership in the group
    async fn active_member_ids(&self, group_id: &str) -> Result<Vec<String>>;
}

pub struct MySqlGroupRepository {
    pool: MySqlPool,
}

impl MySqlGroupRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for MySqlGroupRepository {
    async fn find_groups(&self, scope: &ScopeSelector) -> Result<Vec<Group>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }

        let mut sql = String::from("SELECT id, name, created_at FROM savings_groups");
        if let Some(ids) = scope.restricted_ids() {
            let params = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" WHERE id IN ({})", params));
        }

        let mut query = sqlx::query_as::<_, Group>(&sql);
        if let Some(ids) = scope.restricted_ids() {
            for id in ids {
                query = query.bind(id);
            }
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn active_member_ids(&self, group_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT DISTINCT member_id
            FROM group_memberships
            WHERE group_id = ? AND status = 'active'
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
