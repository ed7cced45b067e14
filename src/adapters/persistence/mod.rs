use sqlx::PgPool;

use crate::app_error::AppError;

pub mod domain_record;
pub mod profile;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                // PostgreSQL unique violation: two profiles racing for the
                // same domain string resolve here, last writer loses.
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    AppError::Conflict("This domain is already connected to another profile".into())
                }
                // PostgreSQL foreign key violation
                else if msg.contains("foreign key") || msg.contains("violates foreign key") {
                    AppError::InvalidInput("Referenced profile not found".into())
                } else {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = ?err, "Database error");
                    AppError::Registry("Database operation failed".into())
                }
            }
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::Registry("Database operation failed".into())
            }
        }
    }
}
