//! The hosted table the waitlist writes into.

mod postgres;
mod rest;

use async_trait::async_trait;

use crate::domain::WaitlistEmail;

pub use postgres::PostgresWaitlistStore;
pub use rest::RestWaitlistStore;

/// Capability to append one address to the waitlist table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WaitlistStore {
    async fn insert_waitlist_entry(&self, email: &WaitlistEmail) -> Result<(), StoreError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store answered and refused the row.
    #[error("the store rejected the entry with code `{code}`: {message}")]
    Rejected { code: String, message: String },
    /// The store could not be reached or its answer could not be read.
    #[error("the store is unavailable")]
    Unavailable(#[source] anyhow::Error),
}

impl StoreError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Classification code reported by the store, if it answered at all.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => Some(code),
            Self::Unavailable(_) => None,
        }
    }
}

/// Table names are spliced into statements and URLs, so only plain
/// identifiers are accepted.
pub(crate) fn check_table_name(table: &str) -> Result<(), String> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("{} is not a valid table name", table))
    }
}
