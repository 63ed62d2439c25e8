use async_trait::async_trait;
use sqlx::PgPool;

use super::{check_table_name, StoreError, WaitlistStore};
use crate::domain::WaitlistEmail;

/// Writes straight into the waitlist table of a Postgres database.
#[derive(Debug)]
pub struct PostgresWaitlistStore {
    pool: PgPool,
    insert: String,
}

impl PostgresWaitlistStore {
    pub fn new(pool: PgPool, table: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            pool,
            insert: insert_statement(table).map_err(anyhow::Error::msg)?,
        })
    }
}

fn insert_statement(table: &str) -> Result<String, String> {
    check_table_name(table)?;
    Ok(format!(r#"INSERT INTO "{}" (email) VALUES ($1)"#, table))
}

#[async_trait]
impl WaitlistStore for PostgresWaitlistStore {
    #[tracing::instrument(name = "Saving a waitlist entry in the database", skip(self, email))]
    async fn insert_waitlist_entry(&self, email: &WaitlistEmail) -> Result<(), StoreError> {
        sqlx::query(&self.insert)
            .bind(email.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                // SQLSTATE, e.g. 23505 for a unique violation
                sqlx::Error::Database(db) => {
                    let err = StoreError::rejected(
                        db.code().map(|c| c.into_owned()).unwrap_or_default(),
                        db.message(),
                    );
                    tracing::warn!("The database refused the entry: {}", err);
                    err
                }
                other => {
                    tracing::error!("Failed to execute query: {:?}", other);
                    StoreError::Unavailable(other.into())
                }
            })?;
        Ok(())
    }
}
