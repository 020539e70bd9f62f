// ABOUTME: Single-ingredient append path
// ABOUTME: Appends one new ingredient at the end of a recipe's list (order = list length)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use tracing::debug;
use uuid::Uuid;

use crate::database::{ingredients as ingredients_db, recipes as recipes_db, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{CreateIngredientRequest, Ingredient};
use crate::reconcile::identity;

/// Ingredient operations outside the bulk reconciliation path
#[derive(Clone)]
pub struct IngredientService {
    db: Database,
}

impl IngredientService {
    /// Create a new ingredient service
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append one new ingredient to the end of the recipe's list.
    ///
    /// Shares the order-index invariant with the bulk path: the new
    /// record's index is the current list length, keeping the sequence
    /// dense without renumbering the rest.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn add_ingredient_to_recipe(
        &self,
        recipe_id: Uuid,
        subject: &str,
        request: &CreateIngredientRequest,
    ) -> AppResult<Vec<Ingredient>> {
        let mut conn = self
            .db
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        let mut recipe = recipes_db::load_aggregate(&mut conn, recipe_id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let order_idx = recipe.ingredients().len() as i32;

        let ingredient = Ingredient {
            id: identity::mint_id(),
            recipe_id: Uuid::nil(),
            notes: request.notes.clone(),
            heading: request.heading.unwrap_or(false),
            parsed_ingredient: request.parsed_ingredient.clone(),
            parsed_original_amount: request.parsed_original_amount,
            parsed_original_unit: request.parsed_original_unit.clone(),
            original_measurement_system: request.original_measurement_system,
            parsed_converted_amount: None,
            parsed_converted_unit: None,
            converted_measurement_system: None,
            order_idx,
        };

        let attached = recipe.add_ingredient(ingredient);
        ingredients_db::upsert(&mut conn, attached).await?;

        debug!(recipe_id = %recipe_id, ingredient_id = %attached.id, "ingredient appended");
        Ok(recipe.ingredients().to_vec())
    }

    /// Get the recipe's ingredient list in stored order.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn get_ingredients_from_recipe(
        &self,
        recipe_id: Uuid,
        subject: &str,
    ) -> AppResult<Vec<Ingredient>> {
        let mut conn = self
            .db
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        recipes_db::find_row(&mut conn, recipe_id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

        ingredients_db::list_for_recipe(&mut conn, recipe_id).await
    }
}
