use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::domains::ProfileDirectory,
};

// The profile table itself belongs to the profile subsystem; this adapter
// only reads the two facts the edge router needs.
#[async_trait]
impl ProfileDirectory for PostgresPersistence {
    async fn username_for_profile(&self, profile_id: Uuid) -> AppResult<Option<String>> {
        let row = sqlx::query("SELECT username FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(self.pool())
            .await
            .map_err(AppError::from)?;
        Ok(row.map(|r| r.get("username")))
    }

    async fn profile_exists(&self, username: &str) -> AppResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM profiles WHERE username = $1) AS found")
            .bind(username)
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)?;
        Ok(row.get("found"))
    }
}
