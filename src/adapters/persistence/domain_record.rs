use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::domain_record::{DomainRecord, DomainStatus},
    use_cases::domains::DomainRepo,
};

const RECORD_COLUMNS: &str =
    "id, profile_id, domain, status, verified_at, created_at, updated_at";

fn row_to_record(row: sqlx::postgres::PgRow) -> DomainRecord {
    DomainRecord {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        domain: row.get("domain"),
        status: DomainStatus::from_str(row.get("status")),
        verified_at: row.get("verified_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl DomainRepo for PostgresPersistence {
    async fn upsert_for_profile(&self, profile_id: Uuid, domain: &str) -> AppResult<DomainRecord> {
        let id = Uuid::new_v4();
        // Keyed on profile_id: changing the domain string replaces the claim
        // and resets verification in the same statement. A unique index on
        // `domain` turns cross-profile claims into a Conflict.
        let row = sqlx::query(&format!(
            r#"
                INSERT INTO custom_domains (id, profile_id, domain, status)
                VALUES ($1, $2, $3, 'pending_dns')
                ON CONFLICT (profile_id) DO UPDATE
                SET domain = EXCLUDED.domain,
                    status = 'pending_dns',
                    verified_at = NULL,
                    updated_at = CURRENT_TIMESTAMP
                RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(profile_id)
        .bind(domain)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row_to_record(row))
    }

    async fn get_by_domain(&self, domain: &str) -> AppResult<Option<DomainRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM custom_domains WHERE domain = $1"
        ))
        .bind(domain)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_record))
    }

    async fn get_for_profile(&self, profile_id: Uuid) -> AppResult<Option<DomainRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM custom_domains WHERE profile_id = $1"
        ))
        .bind(profile_id)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_record))
    }

    async fn mark_verified(&self, domain: &str) -> AppResult<DomainRecord> {
        // Idempotent, and never downgrades a provider-registered claim.
        let row = sqlx::query(&format!(
            r#"
                UPDATE custom_domains
                SET status = CASE
                        WHEN status = 'provider_registered' THEN status
                        ELSE 'dns_verified'
                    END,
                    verified_at = COALESCE(verified_at, CURRENT_TIMESTAMP),
                    updated_at = CURRENT_TIMESTAMP
                WHERE domain = $1
                RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(domain)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row_to_record(row))
    }

    async fn mark_provider_registered(&self, domain: &str) -> AppResult<DomainRecord> {
        let row = sqlx::query(&format!(
            r#"
                UPDATE custom_domains
                SET status = 'provider_registered',
                    updated_at = CURRENT_TIMESTAMP
                WHERE domain = $1
                  AND status IN ('dns_verified', 'provider_registered')
                RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(domain)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row_to_record(row))
    }

    async fn delete_for_profile(&self, profile_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM custom_domains WHERE profile_id = $1")
            .bind(profile_id)
            .execute(self.pool())
            .await
            .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
