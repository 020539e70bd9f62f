// ABOUTME: Database management for recipe storage
// ABOUTME: SqlitePool wrapper with schema migration and connection handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! # Database Management
//!
//! Provides the [`Database`] handle wrapping a `SQLite` connection pool,
//! schema migration, and the per-entity persistence modules. All
//! multi-statement mutations go through [`transactions::TransactionGuard`]
//! so a failure at any point rolls the whole edit back.

pub mod ingredients;
pub mod recipes;
pub mod steps;
pub mod transactions;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Database manager for recipe storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run schema migration.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or
    /// migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !in_memory {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory database exists per connection; pin the pool to a
        // single long-lived connection or every acquire sees an empty schema
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(&connection_options)
                .await
        } else {
            SqlitePool::connect(&connection_options).await
        }
        .map_err(|e| AppError::database(format!("Failed to connect: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema migration
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        debug!("running database schema migration");

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                subject TEXT NOT NULL,
                slug TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                servings TEXT,
                original_url TEXT,
                added TEXT NOT NULL,
                modified TEXT,
                last_made TEXT,
                prep_time INTEGER,
                cook_time INTEGER,
                rest_time INTEGER,
                note TEXT NOT NULL DEFAULT '',
                liked INTEGER NOT NULL DEFAULT 0,
                UNIQUE(subject, slug)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipes table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id TEXT PRIMARY KEY,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                notes TEXT NOT NULL,
                heading INTEGER NOT NULL DEFAULT 0,
                parsed_ingredient TEXT,
                parsed_original_amount REAL,
                parsed_original_unit TEXT,
                original_measurement_system TEXT,
                parsed_converted_amount REAL,
                parsed_converted_unit TEXT,
                converted_measurement_system TEXT,
                order_idx INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredients table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS steps (
                id TEXT PRIMARY KEY,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                heading INTEGER NOT NULL DEFAULT 0,
                order_idx INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create steps table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS step_ingredients (
                id TEXT PRIMARY KEY,
                step_id TEXT NOT NULL REFERENCES steps(id) ON DELETE CASCADE,
                ingredient_id TEXT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                highlight INTEGER NOT NULL DEFAULT 0,
                highlight_start INTEGER NOT NULL DEFAULT 0,
                highlight_end INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create step_ingredients table: {e}")))?;

        for ddl in [
            "CREATE INDEX IF NOT EXISTS idx_recipes_subject ON recipes(subject)",
            "CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id)",
            "CREATE INDEX IF NOT EXISTS idx_steps_recipe ON steps(recipe_id)",
            "CREATE INDEX IF NOT EXISTS idx_step_ingredients_step ON step_ingredients(step_id)",
        ] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create index: {e}")))?;
        }

        Ok(())
    }
}
