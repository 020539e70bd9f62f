// ABOUTME: Ingredient row persistence: lookup, upsert, listing, orphan removal
// ABOUTME: delete_absent realizes the cascade-on-replace contract of the aggregate save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, MeasurementSystem};

/// Look up an ingredient by persistent identity.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Ingredient>> {
    let row = sqlx::query(
        r"
        SELECT id, recipe_id, notes, heading, parsed_ingredient,
               parsed_original_amount, parsed_original_unit, original_measurement_system,
               parsed_converted_amount, parsed_converted_unit, converted_measurement_system,
               order_idx
        FROM ingredients
        WHERE id = $1
        ",
    )
    .bind(id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

    row.map(|r| row_to_ingredient(&r)).transpose()
}

/// List a recipe's ingredients in stored order.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn list_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
) -> AppResult<Vec<Ingredient>> {
    let rows = sqlx::query(
        r"
        SELECT id, recipe_id, notes, heading, parsed_ingredient,
               parsed_original_amount, parsed_original_unit, original_measurement_system,
               parsed_converted_amount, parsed_converted_unit, converted_measurement_system,
               order_idx
        FROM ingredients
        WHERE recipe_id = $1
        ORDER BY order_idx ASC
        ",
    )
    .bind(recipe_id.to_string())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

    rows.iter().map(row_to_ingredient).collect()
}

/// Insert or update an ingredient row by id.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn upsert(conn: &mut SqliteConnection, ingredient: &Ingredient) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO ingredients (
            id, recipe_id, notes, heading, parsed_ingredient,
            parsed_original_amount, parsed_original_unit, original_measurement_system,
            parsed_converted_amount, parsed_converted_unit, converted_measurement_system,
            order_idx
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT(id) DO UPDATE SET
            recipe_id = excluded.recipe_id,
            notes = excluded.notes,
            heading = excluded.heading,
            parsed_ingredient = excluded.parsed_ingredient,
            parsed_original_amount = excluded.parsed_original_amount,
            parsed_original_unit = excluded.parsed_original_unit,
            original_measurement_system = excluded.original_measurement_system,
            parsed_converted_amount = excluded.parsed_converted_amount,
            parsed_converted_unit = excluded.parsed_converted_unit,
            converted_measurement_system = excluded.converted_measurement_system,
            order_idx = excluded.order_idx
        ",
    )
    .bind(ingredient.id.to_string())
    .bind(ingredient.recipe_id.to_string())
    .bind(&ingredient.notes)
    .bind(i64::from(ingredient.heading))
    .bind(&ingredient.parsed_ingredient)
    .bind(ingredient.parsed_original_amount)
    .bind(&ingredient.parsed_original_unit)
    .bind(ingredient.original_measurement_system.map(|s| s.as_str()))
    .bind(ingredient.parsed_converted_amount)
    .bind(&ingredient.parsed_converted_unit)
    .bind(ingredient.converted_measurement_system.map(|s| s.as_str()))
    .bind(i64::from(ingredient.order_idx))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to upsert ingredient: {e}")))?;

    Ok(())
}

/// Delete a recipe's ingredient rows absent from the rebuilt list.
///
/// This is the orphan-removal half of the full-replace contract: members
/// not represented in the new desired state are removed, never preserved.
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
        let result = sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredients: {e}")))?;
        return Ok(result.rows_affected());
    }

    let placeholders = vec!["?"; keep.len()].join(", ");
    let query = format!(
        "DELETE FROM ingredients WHERE recipe_id = ? AND id NOT IN ({placeholders})"
    );

    let mut q = sqlx::query(&query).bind(recipe_id.to_string());
    for id in keep {
        q = q.bind(id.to_string());
    }

    let result = q
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete orphaned ingredients: {e}")))?;

    Ok(result.rows_affected())
}

/// Convert a database row to an [`Ingredient`]
fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id_str: String = row.get("id");
    let recipe_id_str: String = row.get("recipe_id");
    let heading: i64 = row.get("heading");
    let original_system: Option<String> = row.get("original_measurement_system");
    let converted_system: Option<String> = row.get("converted_measurement_system");
    let order_idx: i64 = row.get("order_idx");

    Ok(Ingredient {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        recipe_id: Uuid::parse_str(&recipe_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        notes: row.get("notes"),
        heading: heading == 1,
        parsed_ingredient: row.get("parsed_ingredient"),
        parsed_original_amount: row.get("parsed_original_amount"),
        parsed_original_unit: row.get("parsed_original_unit"),
        original_measurement_system: original_system.as_deref().map(MeasurementSystem::parse),
        parsed_converted_amount: row.get("parsed_converted_amount"),
        parsed_converted_unit: row.get("parsed_converted_unit"),
        converted_measurement_system: converted_system.as_deref().map(MeasurementSystem::parse),
        #[allow(clippy::cast_possible_truncation)]
        order_idx: order_idx as i32,
    })
}
