// ABOUTME: Recipe service: CRUD, slug lookup, and the transactional full-recipe update
// ABOUTME: update_recipe is the reconciliation entry point - one transaction, full rollback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::limits;
use crate::database::transactions::TransactionGuard;
use crate::database::{
    ingredients as ingredients_db, recipes as recipes_db, steps as steps_db, Database,
};
use crate::errors::{AppError, AppResult};
use crate::models::{CreateRecipeRequest, Recipe, UpdateRecipeRequest};
use crate::reconcile::identity;
use crate::reconcile::ingredients::reconcile_ingredients;
use crate::reconcile::steps::reconcile_steps;

/// Recipe operations, always scoped by the owning subject
#[derive(Clone)]
pub struct RecipeService {
    db: Database,
}

impl RecipeService {
    /// Create a new recipe service
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new recipe. Mints a UUIDv7 identity and generates a
    /// random slug when the request does not supply one.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including slug collisions)
    pub async fn create_recipe(
        &self,
        subject: &str,
        request: &CreateRecipeRequest,
    ) -> AppResult<Recipe> {
        let slug = request.slug.clone().unwrap_or_else(generate_slug);

        let mut recipe = Recipe::new(
            identity::mint_id(),
            subject.to_owned(),
            slug,
            request.title.clone(),
        );
        recipe.description.clone_from(&request.description);
        recipe.servings.clone_from(&request.servings);
        recipe.original_url.clone_from(&request.original_url);
        recipe.prep_time = request.prep_time;
        recipe.cook_time = request.cook_time;
        recipe.rest_time = request.rest_time;
        if let Some(note) = &request.note {
            recipe.note.clone_from(note);
        }

        let mut conn = self.acquire().await?;
        recipes_db::insert(&mut conn, &recipe).await?;

        info!(recipe_id = %recipe.id, "recipe created");
        Ok(recipe)
    }

    /// Get the full recipe aggregate by id.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist or belongs to
    /// a different subject
    pub async fn get_recipe(&self, id: Uuid, subject: &str) -> AppResult<Recipe> {
        let mut conn = self.acquire().await?;
        recipes_db::load_aggregate(&mut conn, id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")).with_subject(subject))
    }

    /// Get the full recipe aggregate by slug.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when no recipe with this slug exists for the subject
    pub async fn get_recipe_by_slug(&self, slug: &str, subject: &str) -> AppResult<Recipe> {
        let mut conn = self.acquire().await?;
        let row = recipes_db::find_row_by_slug(&mut conn, slug, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe with slug {slug}")))?;

        recipes_db::load_aggregate(&mut conn, row.id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe with slug {slug}")))
    }

    /// List the subject's recipes, newest first, collections not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_recipes(&self, subject: &str) -> AppResult<Vec<Recipe>> {
        let mut conn = self.acquire().await?;
        recipes_db::list_by_subject(&mut conn, subject).await
    }

    /// Flip the recipe's liked flag.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn toggle_like(&self, id: Uuid, subject: &str) -> AppResult<Recipe> {
        let mut conn = self.acquire().await?;
        let mut recipe = recipes_db::find_row(&mut conn, id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")))?;

        recipe.liked = !recipe.liked;
        recipe.modified = Some(Utc::now());
        recipes_db::update_scalars(&mut conn, &recipe).await?;

        Ok(recipe)
    }

    /// Delete a recipe, cascading to its ingredients, steps, and links.
    ///
    /// # Errors
    ///
    /// `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    pub async fn delete_recipe(&self, id: Uuid, subject: &str) -> AppResult<()> {
        let mut guard = TransactionGuard::new(
            self.db
                .pool()
                .begin()
                .await
                .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?,
        );
        let conn = guard.executor()?;

        recipes_db::find_row(&mut *conn, id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")))?;
        recipes_db::delete(&mut *conn, id).await?;

        guard.commit().await?;
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    /// Full-recipe update: scalar fields plus complete reconciliation of
    /// the ingredient and step lists against the submitted desired state.
    ///
    /// Runs as one transaction: ingredient pass, step pass (consuming the
    /// placeholder mapping), orphan removal, recipe save. A failure at
    /// any point rolls the whole edit back — no ingredient, step, or
    /// link from the attempt is persisted.
    ///
    /// No optimistic-lock version check is performed: concurrent edits
    /// of the same recipe race and the last write wins.
    ///
    /// # Errors
    ///
    /// - `RESOURCE_NOT_FOUND` when the recipe does not exist for the subject
    /// - `STALE_REFERENCE`, `DANGLING_LINK_REFERENCE`, `INTERNAL_CONSISTENCY`
    ///   from the reconciliation passes
    /// - `INVALID_INPUT` when a submitted list exceeds the entry limit
    pub async fn update_recipe(
        &self,
        id: Uuid,
        subject: &str,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Recipe> {
        if request.ingredients.len() > limits::MAX_LIST_ENTRIES
            || request.steps.len() > limits::MAX_LIST_ENTRIES
        {
            return Err(AppError::invalid_input(format!(
                "list exceeds {} entries",
                limits::MAX_LIST_ENTRIES
            )));
        }

        debug!(
            recipe_id = %id,
            ingredients = request.ingredients.len(),
            steps = request.steps.len(),
            "starting full-recipe reconciliation"
        );

        let mut guard = TransactionGuard::new(
            self.db
                .pool()
                .begin()
                .await
                .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?,
        );
        let conn = guard.executor()?;

        let mut recipe = recipes_db::load_aggregate(&mut *conn, id, subject)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")).with_subject(subject))?;

        recipe.apply_update(request);

        // Links are rebuilt in full every reconciliation; drop them up
        // front so orphaned steps and ingredients can be removed freely.
        steps_db::delete_links_for_recipe(&mut *conn, recipe.id).await?;

        let mapping = reconcile_ingredients(&mut *conn, &mut recipe, &request.ingredients).await?;
        reconcile_steps(&mut *conn, &mut recipe, &request.steps, &mapping).await?;

        // Orphan removal: anything absent from the rebuilt collections goes
        let keep_steps: Vec<Uuid> = recipe.steps().iter().map(|s| s.id).collect();
        let keep_ingredients: Vec<Uuid> = recipe.ingredients().iter().map(|i| i.id).collect();
        steps_db::delete_absent(&mut *conn, recipe.id, &keep_steps).await?;
        ingredients_db::delete_absent(&mut *conn, recipe.id, &keep_ingredients).await?;

        recipe.modified = Some(Utc::now());
        recipes_db::update_scalars(&mut *conn, &recipe).await?;

        guard.commit().await?;

        info!(
            recipe_id = %recipe.id,
            ingredients = recipe.ingredients().len(),
            steps = recipe.steps().len(),
            "full-recipe reconciliation committed"
        );

        Ok(recipe)
    }

    async fn acquire(&self) -> AppResult<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        self.db
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))
    }
}

/// Generate a random mixed-case alphanumeric slug
fn generate_slug() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(limits::SLUG_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_length_and_charset() {
        let slug = generate_slug();
        assert_eq!(slug.len(), limits::SLUG_LENGTH);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_slug_keeps_mixed_case() {
        // 200 characters drawn from [0-9a-zA-Z]; the odds of never seeing
        // an uppercase letter are negligible
        let slugs: String = (0..20).map(|_| generate_slug()).collect();
        assert!(slugs.chars().any(|c| c.is_ascii_uppercase()));
    }
}
