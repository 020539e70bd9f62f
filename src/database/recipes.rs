// ABOUTME: Recipe row persistence and aggregate loading, always scoped by owning subject
// ABOUTME: Deleting a recipe cascades to ingredients, steps, and links explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Recipe;

use super::{ingredients, steps};

/// Insert a new recipe row.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn insert(conn: &mut SqliteConnection, recipe: &Recipe) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO recipes (
            id, subject, slug, title, description, servings, original_url,
            added, modified, last_made, prep_time, cook_time, rest_time, note, liked
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ",
    )
    .bind(recipe.id.to_string())
    .bind(&recipe.subject)
    .bind(&recipe.slug)
    .bind(&recipe.title)
    .bind(&recipe.description)
    .bind(&recipe.servings)
    .bind(&recipe.original_url)
    .bind(recipe.added.to_rfc3339())
    .bind(recipe.modified.map(|dt| dt.to_rfc3339()))
    .bind(recipe.last_made.map(|dt| dt.to_rfc3339()))
    .bind(recipe.prep_time.map(i64::from))
    .bind(recipe.cook_time.map(i64::from))
    .bind(recipe.rest_time.map(i64::from))
    .bind(&recipe.note)
    .bind(i64::from(recipe.liked))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

    Ok(())
}

/// Update a recipe's scalar fields.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn update_scalars(conn: &mut SqliteConnection, recipe: &Recipe) -> AppResult<()> {
    sqlx::query(
        r"
        UPDATE recipes
        SET slug = $1, title = $2, description = $3, servings = $4, original_url = $5,
            modified = $6, last_made = $7, prep_time = $8, cook_time = $9, rest_time = $10,
            note = $11, liked = $12
        WHERE id = $13 AND subject = $14
        ",
    )
    .bind(&recipe.slug)
    .bind(&recipe.title)
    .bind(&recipe.description)
    .bind(&recipe.servings)
    .bind(&recipe.original_url)
    .bind(recipe.modified.map(|dt| dt.to_rfc3339()))
    .bind(recipe.last_made.map(|dt| dt.to_rfc3339()))
    .bind(recipe.prep_time.map(i64::from))
    .bind(recipe.cook_time.map(i64::from))
    .bind(recipe.rest_time.map(i64::from))
    .bind(&recipe.note)
    .bind(i64::from(recipe.liked))
    .bind(recipe.id.to_string())
    .bind(&recipe.subject)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

    Ok(())
}

/// Look up a recipe row by id, scoped to its owning subject. The
/// collections are left empty; use [`load_aggregate`] for the full graph.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn find_row(
    conn: &mut SqliteConnection,
    id: Uuid,
    subject: &str,
) -> AppResult<Option<Recipe>> {
    let row = sqlx::query(
        r"
        SELECT id, subject, slug, title, description, servings, original_url,
               added, modified, last_made, prep_time, cook_time, rest_time, note, liked
        FROM recipes
        WHERE id = $1 AND subject = $2
        ",
    )
    .bind(id.to_string())
    .bind(subject)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

    row.map(|r| row_to_recipe(&r)).transpose()
}

/// Look up a recipe row by slug, scoped to its owning subject.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn find_row_by_slug(
    conn: &mut SqliteConnection,
    slug: &str,
    subject: &str,
) -> AppResult<Option<Recipe>> {
    let row = sqlx::query(
        r"
        SELECT id, subject, slug, title, description, servings, original_url,
               added, modified, last_made, prep_time, cook_time, rest_time, note, liked
        FROM recipes
        WHERE slug = $1 AND subject = $2
        ",
    )
    .bind(slug)
    .bind(subject)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get recipe by slug: {e}")))?;

    row.map(|r| row_to_recipe(&r)).transpose()
}

/// List a subject's recipes, newest first. Collections are not loaded.
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn list_by_subject(conn: &mut SqliteConnection, subject: &str) -> AppResult<Vec<Recipe>> {
    let rows = sqlx::query(
        r"
        SELECT id, subject, slug, title, description, servings, original_url,
               added, modified, last_made, prep_time, cook_time, rest_time, note, liked
        FROM recipes
        WHERE subject = $1
        ORDER BY added DESC
        ",
    )
    .bind(subject)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

    rows.iter().map(row_to_recipe).collect()
}

/// Load the full aggregate: recipe row plus ordered ingredients and
/// ordered steps with their link collections.
///
/// # Errors
///
/// Returns an error if any database operation fails
pub async fn load_aggregate(
    conn: &mut SqliteConnection,
    id: Uuid,
    subject: &str,
) -> AppResult<Option<Recipe>> {
    let Some(mut recipe) = find_row(&mut *conn, id, subject).await? else {
        return Ok(None);
    };

    for ingredient in ingredients::list_for_recipe(&mut *conn, recipe.id).await? {
        recipe.add_ingredient(ingredient);
    }
    for step in steps::list_for_recipe(&mut *conn, recipe.id).await? {
        recipe.add_step(step);
    }

    Ok(Some(recipe))
}

/// Delete a recipe and cascade to its ingredients, steps, and links.
///
/// The cascade is explicit rather than relying on foreign-key pragmas:
/// links first, then steps and ingredients, then the recipe row.
///
/// # Errors
///
/// Returns an error if any database operation fails
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<()> {
    steps::delete_links_for_recipe(&mut *conn, id).await?;
    steps::delete_absent(&mut *conn, id, &[]).await?;
    ingredients::delete_absent(&mut *conn, id, &[]).await?;

    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

    Ok(())
}

/// Convert a database row to a [`Recipe`] with empty collections
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let added_str: String = row.get("added");
    let modified_str: Option<String> = row.get("modified");
    let last_made_str: Option<String> = row.get("last_made");
    let prep_time: Option<i64> = row.get("prep_time");
    let cook_time: Option<i64> = row.get("cook_time");
    let rest_time: Option<i64> = row.get("rest_time");
    let liked: i64 = row.get("liked");

    let mut recipe = Recipe::new(
        Uuid::parse_str(&id_str).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        row.get("subject"),
        row.get("slug"),
        row.get("title"),
    );
    recipe.description = row.get("description");
    recipe.servings = row.get("servings");
    recipe.original_url = row.get("original_url");
    recipe.added = DateTime::parse_from_rfc3339(&added_str)
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
        .with_timezone(&Utc);
    recipe.modified = modified_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    recipe.last_made = last_made_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    #[allow(clippy::cast_possible_truncation)]
    {
        recipe.prep_time = prep_time.map(|t| t as i32);
        recipe.cook_time = cook_time.map(|t| t as i32);
        recipe.rest_time = rest_time.map(|t| t as i32);
    }
    recipe.note = row.get("note");
    recipe.liked = liked == 1;

    Ok(recipe)
}
