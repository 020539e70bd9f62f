// ABOUTME: Transaction management with an RAII guard for database operations
// ABOUTME: Provides automatic rollback on drop when a reconciliation fails mid-way
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! Transaction management with an RAII guard
//!
//! [`TransactionGuard`] wraps a `SQLx` [`Transaction`] and provides:
//! - Automatic rollback on drop if not explicitly committed
//! - Type-safe commit that consumes the guard (prevents double-commit)
//! - `executor()` handing out the underlying connection for queries
//!
//! ```text
//! let tx = pool.begin().await?;
//! let mut guard = TransactionGuard::new(tx);
//!
//! sqlx::query("INSERT INTO recipes ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO ingredients ...").execute(guard.executor()?).await?;
//!
//! // Explicit commit - if this line isn't reached, the transaction rolls back
//! guard.commit().await?;
//! ```

use sqlx::{Database, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for database transactions ensuring automatic rollback on drop
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Create a new transaction guard from an existing `SQLx` transaction
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("transaction guard created - will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Borrow the underlying connection to execute queries on
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut DB::Connection> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("transaction already consumed"))
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the
    /// database commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                self.committed = true;
                tx.commit()
                    .await
                    .map_err(|e| AppError::database(format!("Failed to commit: {e}")))?;
                debug!("transaction committed");
                Ok(())
            }
            None => Err(AppError::internal("transaction already consumed")),
        }
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        // SQLx rolls the inner transaction back on drop; this is just the audit trail
        if !self.committed && self.transaction.is_some() {
            warn!("transaction guard dropped without commit - rolling back");
        }
    }
}
