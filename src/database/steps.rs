// ABOUTME: Step and step-ingredient link row persistence
// ABOUTME: Links are deleted per-recipe before every rebuild (full-replace, never merged)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Step, StepIngredient};

/// Look up a step by persistent identity. Links are not loaded; the
/// reconciliation path rebuilds them from scratch anyway.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Step>> {
    let row = sqlx::query(
        r"
        SELECT id, recipe_id, description, heading, order_idx
        FROM steps
        WHERE id = $1
        ",
    )
    .bind(id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get step: {e}")))?;

    row.map(|r| row_to_step(&r)).transpose()
}

/// List a recipe's steps in stored order, with their link collections loaded.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn list_for_recipe(conn: &mut SqliteConnection, recipe_id: Uuid) -> AppResult<Vec<Step>> {
    let step_rows = sqlx::query(
        r"
        SELECT id, recipe_id, description, heading, order_idx
        FROM steps
        WHERE recipe_id = $1
        ORDER BY order_idx ASC
        ",
    )
    .bind(recipe_id.to_string())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list steps: {e}")))?;

    let mut steps: Vec<Step> = step_rows
        .iter()
        .map(row_to_step)
        .collect::<AppResult<_>>()?;

    let link_rows = sqlx::query(
        r"
        SELECT si.id, si.step_id, si.ingredient_id, si.highlight,
               si.highlight_start, si.highlight_end
        FROM step_ingredients si
        JOIN steps s ON s.id = si.step_id
        WHERE s.recipe_id = $1
        ",
    )
    .bind(recipe_id.to_string())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list step links: {e}")))?;

    for row in &link_rows {
        let link = row_to_link(row)?;
        if let Some(step) = steps.iter_mut().find(|s| s.id == link.step_id) {
            step.add_linked_ingredient(link);
        }
    }

    Ok(steps)
}

/// Insert or update a step row by id.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn upsert(conn: &mut SqliteConnection, step: &Step) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO steps (id, recipe_id, description, heading, order_idx)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT(id) DO UPDATE SET
            recipe_id = excluded.recipe_id,
            description = excluded.description,
            heading = excluded.heading,
            order_idx = excluded.order_idx
        ",
    )
    .bind(step.id.to_string())
    .bind(step.recipe_id.to_string())
    .bind(&step.description)
    .bind(i64::from(step.heading))
    .bind(i64::from(step.order_idx))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to upsert step: {e}")))?;

    Ok(())
}

/// Insert one step-ingredient link row.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn insert_link(conn: &mut SqliteConnection, link: &StepIngredient) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO step_ingredients (
            id, step_id, ingredient_id, highlight, highlight_start, highlight_end
        ) VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(link.id.to_string())
    .bind(link.step_id.to_string())
    .bind(link.ingredient_id.to_string())
    .bind(i64::from(link.highlight))
    .bind(i64::from(link.highlight_start))
    .bind(i64::from(link.highlight_end))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert step link: {e}")))?;

    Ok(())
}

/// Delete every step-ingredient link belonging to a recipe's steps.
/// Reconciliation always rebuilds the full link set, so no partial
/// link update path exists.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn delete_links_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
) -> AppResult<u64> {
    let result = sqlx::query(
        r"
        DELETE FROM step_ingredients
        WHERE step_id IN (SELECT id FROM steps WHERE recipe_id = $1)
        ",
    )
    .bind(recipe_id.to_string())
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to delete step links: {e}")))?;

    Ok(result.rows_affected())
}

/// Delete a recipe's step rows absent from the rebuilt list.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn delete_absent(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
    keep: &[Uuid],
) -> AppResult<u64> {
    if keep.is_empty() {
        let result = sqlx::query("DELETE FROM steps WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete steps: {e}")))?;
        return Ok(result.rows_affected());
    }

    let placeholders = vec!["?"; keep.len()].join(", ");
    let query = format!("DELETE FROM steps WHERE recipe_id = ? AND id NOT IN ({placeholders})");

    let mut q = sqlx::query(&query).bind(recipe_id.to_string());
    for id in keep {
        q = q.bind(id.to_string());
    }

    let result = q
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete orphaned steps: {e}")))?;

    Ok(result.rows_affected())
}

/// Convert a database row to a [`Step`] with an empty link collection
fn row_to_step(row: &SqliteRow) -> AppResult<Step> {
    let id_str: String = row.get("id");
    let recipe_id_str: String = row.get("recipe_id");
    let heading: i64 = row.get("heading");
    let order_idx: i64 = row.get("order_idx");
    #[allow(clippy::cast_possible_truncation)]
    let order_idx = order_idx as i32;

    Ok(Step::new(
        Uuid::parse_str(&id_str).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        Uuid::parse_str(&recipe_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        row.get("description"),
        heading == 1,
        order_idx,
    ))
}

/// Convert a database row to a [`StepIngredient`]
fn row_to_link(row: &SqliteRow) -> AppResult<StepIngredient> {
    let id_str: String = row.get("id");
    let step_id_str: String = row.get("step_id");
    let ingredient_id_str: String = row.get("ingredient_id");
    let highlight: i64 = row.get("highlight");
    let highlight_start: i64 = row.get("highlight_start");
    let highlight_end: i64 = row.get("highlight_end");

    Ok(StepIngredient {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        step_id: Uuid::parse_str(&step_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        ingredient_id: Uuid::parse_str(&ingredient_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        highlight: highlight == 1,
        #[allow(clippy::cast_possible_truncation)]
        highlight_start: highlight_start as i32,
        #[allow(clippy::cast_possible_truncation)]
        highlight_end: highlight_end as i32,
    })
}
