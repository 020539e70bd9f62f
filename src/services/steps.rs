// ABOUTME: Single-step append path and linking one ingredient to one step
// ABOUTME: Append-path link creation accepts persistent identifiers only (no placeholders)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use tracing::debug;
use uuid::Uuid;

use crate::database::{recipes as recipes_db, steps as steps_db, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{CreateStepLinkRequest, CreateStepRequest, Step, StepIngredient};
use crate::reconcile::identity;

/// Step operations outside the bulk reconciliation path
#[derive(Clone)]
pub struct StepService {
    db: Database,
}

impl StepService {
    /// Create a new step service
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append one new step to the end of the recipe's list.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn add_step_to_recipe(
        &self,
        recipe_id: Uuid,
        subject: &str,
        request: &CreateStepRequest,
    ) -> AppResult<Vec<Step>> {
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
        let order_idx = recipe.steps().len() as i32;

        let step = Step::new(
            identity::mint_id(),
            Uuid::nil(),
            request.description.clone(),
            request.heading.unwrap_or(false),
            order_idx,
        );

        let attached = recipe.add_step(step);
        steps_db::upsert(&mut conn, attached).await?;

        debug!(recipe_id = %recipe_id, step_id = %attached.id, "step appended");
        Ok(recipe.steps().to_vec())
    }

    /// Get the recipe's step list in stored order, links loaded.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn get_steps_from_recipe(
        &self,
        recipe_id: Uuid,
        subject: &str,
    ) -> AppResult<Vec<Step>> {
        let mut conn = self
            .db
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        recipes_db::find_row(&mut conn, recipe_id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

        steps_db::list_for_recipe(&mut conn, recipe_id).await
    }

    /// Link one existing ingredient to one existing step of the recipe.
    ///
    /// Unlike the bulk reconciliation path, this accepts only persistent
    /// identifiers: both the step and the referenced ingredient must
    /// already exist within the recipe.
    ///
    /// # Errors
    ///
    /// - `INVALID_FORMAT` when the ingredient identifier is not a UUID
    /// - `RESOURCE_NOT_FOUND` when the recipe, step, or ingredient does
    ///   not exist for the subject
    pub async fn add_ingredient_to_step(
        &self,
        recipe_id: Uuid,
        step_id: Uuid,
        subject: &str,
        request: &CreateStepLinkRequest,
    ) -> AppResult<Step> {
        let ingredient_id = Uuid::try_parse(&request.ingredient_id).map_err(|_| {
            AppError::invalid_format(format!(
                "ingredientId must be a UUID, got '{}'",
                request.ingredient_id
            ))
        })?;

        let mut conn = self
            .db
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        let mut recipe = recipes_db::load_aggregate(&mut conn, recipe_id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

        recipe
            .find_step(step_id)
            .ok_or_else(|| AppError::not_found(format!("step {step_id}")))?;
        recipe
            .find_ingredient(ingredient_id)
            .ok_or_else(|| AppError::not_found(format!("ingredient {ingredient_id}")))?;

        let link = StepIngredient {
            id: identity::mint_id(),
            step_id: Uuid::nil(),
            ingredient_id,
            highlight: request.highlight,
            highlight_start: request.highlight_start,
            highlight_end: request.highlight_end,
        };

        // find_step above guarantees the step is present
        let step = recipe
            .add_step_link(step_id, link)
            .ok_or_else(|| AppError::internal_consistency(step_id))?;

        let attached = step
            .linked_ingredients()
            .last()
            .ok_or_else(|| AppError::internal_consistency(step_id))?;
        steps_db::insert_link(&mut conn, attached).await?;

        debug!(step_id = %step_id, ingredient_id = %ingredient_id, "step link created");
        Ok(step.clone())
    }
}
